//! Brick Pong - single-player Pong with destructible blocks
//!
//! Core modules:
//! - `sim`: Simulation (geometry, collisions, game state, update loop)
//! - `platform`: Input source and clock seams
//! - `settings`: Data-driven field geometry and tuning
//! - `error`: Error types

pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::{GeometryError, SettingsError};
pub use settings::{ScoreMode, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use std::f32::consts::PI;

    /// Play field defaults (pixels, y grows downward)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
    pub const BORDER: f32 = 20.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_START_SPEED: f32 = 200.0;
    /// Launch angle spread either side of straight at the back wall
    pub const SPAWN_ANGLE_SPREAD: f32 = PI / 6.0;

    /// Paddle defaults - paddle guards the right edge
    pub const PADDLE_WIDTH: f32 = 15.0;
    pub const PADDLE_HEIGHT: f32 = 100.0;
    pub const PADDLE_MARGIN: f32 = 30.0;

    /// Paddle rebound tuning
    pub const MAX_REBOUND_ANGLE: f32 = PI / 3.0;
    pub const MIN_REBOUND_SPEED: f32 = 100.0;
    pub const REBOUND_JITTER_MIN: i32 = -25;
    pub const REBOUND_JITTER_MAX: i32 = 50;

    /// Horizontal kick added after a back wall bounce
    pub const BACK_WALL_KICK_MIN: i32 = 50;
    pub const BACK_WALL_KICK_MAX: i32 = 100;

    /// Block grid defaults
    pub const BLOCK_ROWS: u32 = 5;
    pub const BLOCK_COLUMNS: u32 = 3;
    pub const BLOCK_WIDTH: f32 = 30.0;
    pub const BLOCK_HEIGHT: f32 = 60.0;
    pub const BLOCK_GAP: f32 = 10.0;
    pub const BLOCK_LEFT: f32 = 200.0;

    /// Points per wall bounce
    pub const WALL_BOUNCE_POINTS: u64 = 1;
}

/// Convert polar (r, theta) to cartesian (x, y)
///
/// A negative `r` points the result opposite to `theta`.
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Unit vector in the direction of `v`, or `Vec2::ZERO` when `v` has no length
#[inline]
pub fn normalise(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

//! Simulation module
//!
//! All gameplay logic lives here. No rendering, windowing or system clock:
//! - Input comes through `platform::InputSource`
//! - Time comes through `platform::Clock`
//! - Randomness comes from a caller-supplied `rand::Rng`

pub mod collision;
pub mod hitbox;
pub mod movable;
pub mod plane;
pub mod state;
pub mod tick;

pub use collision::{
    BlockFace, back_wall_kick, block_bounce, block_face_normal, paddle_bounce, wall_bounce,
};
pub use hitbox::{Circle, Rect};
pub use movable::{Movable, advance, next_position};
pub use plane::OrientedPlane;
pub use state::{Ball, Block, Field, GameEvent, GamePhase, GameState, Paddle, Wall};
pub use tick::{Obstacles, TickOutcome, update_ball, update_game_state, update_paddle};

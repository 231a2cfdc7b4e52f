//! Game state and core simulation types
//!
//! `GameState` owns every entity for its whole lifetime and is the only
//! thing the update loop mutates.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::hitbox::{Circle, Rect};
use super::movable::{Movable, take_elapsed};
use crate::consts::*;
use crate::error::SettingsError;
use crate::polar_to_cartesian;
use crate::settings::{ScoreMode, Settings};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// At least one ball in play
    Running,
    /// Last ball left the field
    GameOver,
}

/// Things that happened during the last tick, for renderers and audio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BallSpawned { ball_id: u32 },
    BallLost { ball_id: u32 },
    BlockDestroyed { block_id: u32, pos: Vec2 },
    PaddleHit { ball_id: u32 },
    WallBounce { ball_id: u32, wall: Wall },
    GameOver { score: u64 },
}

/// The three bouncing borders; the right edge is open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wall {
    Back,
    Top,
    Bottom,
}

/// Play field geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
    /// Thickness of the back, top and bottom borders
    pub border: f32,
}

impl Field {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            width: settings.field_width,
            height: settings.field_height,
            border: settings.border,
        }
    }
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub colour: [u8; 3],
    /// Clock reading at the last update; `None` until the first tick
    pub last_update: Option<f64>,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            pos,
            vel,
            radius: BALL_RADIUS,
            colour: [255, 255, 255],
            last_update: None,
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn hitbox(&self) -> Circle {
        Circle::new(self.pos, self.radius)
    }

    pub fn randomize_colour<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.colour = [rng.random(), rng.random(), rng.random()];
    }

    /// Seconds since the last update; zero on a fresh ball's first tick
    pub fn take_elapsed(&mut self, now: f64) -> f32 {
        take_elapsed(&mut self.last_update, now)
    }
}

impl Movable for Ball {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    fn velocity(&self) -> Vec2 {
        self.vel
    }

    fn set_velocity(&mut self, vel: Vec2) {
        self.vel = vel;
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Vertical speed implied by the last pointer move
    pub vel: Vec2,
    pub last_update: Option<f64>,
}

impl Paddle {
    /// Paddle vertically centred against the right edge of `field`
    pub fn new(field: &Field, width: f32, height: f32, margin: f32) -> Self {
        Self {
            pos: Vec2::new(
                field.width - margin - width,
                (field.height - height) * 0.5,
            ),
            width,
            height,
            vel: Vec2::ZERO,
            last_update: None,
        }
    }

    pub fn hitbox(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    pub fn take_elapsed(&mut self, now: f64) -> f32 {
        take_elapsed(&mut self.last_update, now)
    }

    /// Vertical centre of mass, whole-pixel half height
    pub fn centre_of_mass(&self) -> f32 {
        self.pos.y + (self.height * 0.5).trunc()
    }
}

impl Movable for Paddle {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn set_position(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    fn velocity(&self) -> Vec2 {
        self.vel
    }

    fn set_velocity(&mut self, vel: Vec2) {
        self.vel = vel;
    }
}

/// A destructible block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    pub rect: Rect,
}

impl Block {
    pub fn new(id: u32, rect: Rect) -> Self {
        Self { id, rect }
    }

    pub fn hitbox(&self) -> &Rect {
        &self.rect
    }

    pub fn centre(&self) -> Vec2 {
        self.rect.centre()
    }

    pub fn dimensions(&self) -> Vec2 {
        self.rect.dimensions()
    }

    pub fn height(&self) -> f32 {
        self.rect.height
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub field: Field,
    pub score: u64,
    pub score_mode: ScoreMode,
    pub phase: GamePhase,
    /// Ticks run so far
    pub time_ticks: u64,
    pub paddle: Paddle,
    /// Live balls
    pub balls: Vec<Ball>,
    /// Live blocks, in collision priority order
    pub blocks: Vec<Block>,
    /// Events raised by the last tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    ball_radius: f32,
    ball_start_speed: f32,
    next_id: u32,
}

impl GameState {
    /// Fresh game: paddle centred, block grid laid out, one ball in play.
    ///
    /// Fails with `SettingsError::Invalid` if the settings do not describe a
    /// playable field.
    pub fn new<R: Rng + ?Sized>(
        settings: &Settings,
        rng: &mut R,
    ) -> Result<Self, SettingsError> {
        let mut state = Self::empty(settings)?;
        state.build_blocks(settings);
        state.spawn_new_ball(rng);
        log::info!(
            "New game: {}x{} field, {} blocks",
            state.field.width,
            state.field.height,
            state.blocks.len()
        );
        Ok(state)
    }

    /// Paddle and field only: no balls, no blocks
    pub fn empty(settings: &Settings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let field = Field::from_settings(settings);
        Ok(Self {
            field,
            score: 0,
            score_mode: settings.score_mode,
            phase: GamePhase::Running,
            time_ticks: 0,
            paddle: Paddle::new(
                &field,
                settings.paddle_width,
                settings.paddle_height,
                settings.paddle_margin,
            ),
            balls: Vec::new(),
            blocks: Vec::new(),
            events: Vec::new(),
            ball_radius: settings.ball_radius,
            ball_start_speed: settings.ball_start_speed,
            next_id: 1,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Lay out the block grid, vertically centred, columns left to right
    fn build_blocks(&mut self, settings: &Settings) {
        let top = (self.field.height - settings.block_grid_height()) * 0.5;
        for column in 0..settings.block_columns {
            let x =
                settings.block_left + column as f32 * (settings.block_width + settings.block_gap);
            for row in 0..settings.block_rows {
                let y = top + row as f32 * (settings.block_height + settings.block_gap);
                let id = self.next_entity_id();
                self.blocks.push(Block::new(
                    id,
                    Rect::new(x, y, settings.block_width, settings.block_height),
                ));
            }
        }
    }

    /// Add a ball at the middle of the open side of the field, heading for
    /// the back wall at a random angle
    pub fn spawn_new_ball<R: Rng + ?Sized>(&mut self, rng: &mut R) -> u32 {
        let id = self.next_entity_id();
        let pos = Vec2::new(self.field.width * 0.75, self.field.height * 0.5);
        let angle = rng.random_range(-SPAWN_ANGLE_SPREAD..=SPAWN_ANGLE_SPREAD);
        let vel = polar_to_cartesian(-self.ball_start_speed, angle);

        let mut ball = Ball::new(id, pos, vel).with_radius(self.ball_radius);
        ball.randomize_colour(rng);
        self.balls.push(ball);
        self.events.push(GameEvent::BallSpawned { ball_id: id });
        log::debug!("Spawned ball {} at {:?} with velocity {:?}", id, pos, vel);
        id
    }

    /// Enter `GameOver`; returns false if the game was already over
    pub fn set_game_over(&mut self) -> bool {
        if self.phase == GamePhase::GameOver {
            return false;
        }
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver { score: self.score });
        log::info!("Game over with score {}", self.score);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_new_game_layout() {
        let settings = Settings::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let state = GameState::new(&settings, &mut rng).expect("valid settings");

        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.balls.len(), 1);
        assert_eq!(
            state.blocks.len(),
            (settings.block_rows * settings.block_columns) as usize
        );
        assert_eq!(state.score, 0);

        // Blocks never overlap each other
        for (i, a) in state.blocks.iter().enumerate() {
            for b in &state.blocks[i + 1..] {
                assert!(!a.rect.overlaps(&b.rect));
            }
        }

        // Paddle sits against the right edge
        let paddle = state.paddle.hitbox();
        assert_eq!(paddle.right(), settings.field_width - settings.paddle_margin);
    }

    #[test]
    fn test_spawned_ball_heads_for_back_wall() {
        let settings = Settings::default();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut state = GameState::empty(&settings).expect("valid settings");

        for _ in 0..20 {
            state.spawn_new_ball(&mut rng);
        }
        for ball in &state.balls {
            assert!(ball.vel.x < 0.0);
            assert!((ball.vel.length() - settings.ball_start_speed).abs() < 0.01);
            assert!(ball.last_update.is_none());
            assert_eq!(ball.radius, settings.ball_radius);
        }

        // IDs are unique
        let mut ids: Vec<u32> = state.balls.iter().map(|b| b.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn test_new_rejects_paddle_taller_than_field() {
        let settings = Settings {
            paddle_height: 700.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let err = GameState::new(&settings, &mut rng).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        let err = GameState::empty(&settings).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn test_take_elapsed() {
        let mut ball = Ball::new(1, Vec2::ZERO, Vec2::ZERO);
        assert_eq!(ball.take_elapsed(10.0), 0.0);
        assert_eq!(ball.take_elapsed(10.5), 0.5);
        // Clock going backwards never yields negative time
        assert_eq!(ball.take_elapsed(10.0), 0.0);
        assert_eq!(ball.last_update, Some(10.0));
    }

    #[test]
    fn test_game_over_only_once() {
        let mut state = GameState::empty(&Settings::default()).expect("valid settings");
        assert!(state.set_game_over());
        assert!(!state.set_game_over());
        let game_overs = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_paddle_centre_of_mass() {
        let field = Field {
            width: 800.0,
            height: 600.0,
            border: 20.0,
        };
        let mut paddle = Paddle::new(&field, 15.0, 101.0, 30.0);
        paddle.pos.y = 200.0;
        // Half height is truncated to a whole pixel
        assert_eq!(paddle.centre_of_mass(), 250.0);
    }

    #[test]
    fn test_state_serializes() {
        let mut rng = Pcg32::seed_from_u64(3);
        let state = GameState::new(&Settings::default(), &mut rng).expect("valid settings");
        let json = serde_json::to_string(&state).expect("serialize");
        let back: GameState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.balls.len(), state.balls.len());
        assert_eq!(back.blocks.len(), state.blocks.len());
        assert_eq!(back.phase, state.phase);
    }
}

//! Collision response
//!
//! Everything here is a total function of its inputs: degenerate geometry
//! is reported, never panicked on.

use glam::Vec2;
use rand::Rng;

use super::movable::Movable;
use super::plane::OrientedPlane;
use super::state::{Ball, Block, Paddle};
use crate::consts::*;
use crate::error::GeometryError;
use crate::{normalise, polar_to_cartesian};

/// Send the ball back off the paddle.
///
/// The rebound angle depends on where the ball struck relative to the
/// paddle's centre of mass: dead centre goes straight back, the ends deflect
/// by up to `MAX_REBOUND_ANGLE`. Speed gets a random integer jitter and never
/// drops below `MIN_REBOUND_SPEED`.
pub fn paddle_bounce<R: Rng + ?Sized>(ball: &mut Ball, paddle: &Paddle, rng: &mut R) {
    let com = paddle.centre_of_mass();
    let speed = ball.velocity().length();
    let jitter = rng.random_range(REBOUND_JITTER_MIN..=REBOUND_JITTER_MAX);
    let new_speed = (speed.trunc() + jitter as f32).max(MIN_REBOUND_SPEED);

    let offset = -(com - ball.pos.y) * 2.0 / paddle.height;
    let rebound_angle = offset * MAX_REBOUND_ANGLE;

    ball.set_velocity(polar_to_cartesian(-new_speed, -rebound_angle));
}

/// Reflect a body's velocity off `plane`; speed is unchanged
pub fn wall_bounce<M: Movable + ?Sized>(body: &mut M, plane: &OrientedPlane) {
    let velocity = plane.reflect(body.velocity());
    body.set_velocity(velocity);
}

/// Extra horizontal speed after a back wall bounce
pub fn back_wall_kick<R: Rng + ?Sized>(ball: &mut Ball, rng: &mut R) {
    ball.vel.x += rng.random_range(BACK_WALL_KICK_MIN..=BACK_WALL_KICK_MAX) as f32;
}

/// Which face of a block the ball struck, named after the axis of the
/// face normal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockFace {
    /// Top or bottom face; the ball's vertical velocity flips
    NormalY,
    /// Left or right face; the ball's horizontal velocity flips
    NormalX,
}

/// Classify the struck face and return its normal, pointing toward the ball.
///
/// Estimates how far the ball sits vertically from the block's centre using
/// half the block diagonal and the angle of the ball offset from the x axis.
/// If that exceeds half the block height the hit counts as a top/bottom face
/// hit. Near the corners this disagrees with exact edge geometry. The half
/// lengths are whole pixels.
///
/// The normal is zero when the ball centre lies exactly on the block's
/// horizontal or vertical centre line along the chosen axis.
pub fn block_face_normal(ball_pos: Vec2, block: &Block) -> (BlockFace, Vec2) {
    let delta = ball_pos - block.centre();
    let cos_theta = normalise(delta).x.clamp(-1.0, 1.0);
    let theta = cos_theta.acos();
    let vertical_extent = (block.dimensions().length() / 2.0).floor() * theta.sin();

    if vertical_extent.abs() > (block.height() / 2.0).floor() {
        (BlockFace::NormalY, normalise(Vec2::new(0.0, delta.y)))
    } else {
        (BlockFace::NormalX, normalise(Vec2::new(delta.x, 0.0)))
    }
}

/// Bounce a ball off the face of `block` it is overlapping.
///
/// Returns `Err(ZeroLength)` without touching the velocity if no face normal
/// could be determined.
pub fn block_bounce(ball: &mut Ball, block: &Block) -> Result<BlockFace, GeometryError> {
    let (face, normal) = block_face_normal(ball.pos, block);
    let plane = OrientedPlane::new(normal)?;
    wall_bounce(ball, &plane);
    Ok(face)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::hitbox::Rect;
    use crate::sim::state::Field;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn paddle_at(y: f32) -> Paddle {
        let field = Field {
            width: 800.0,
            height: 600.0,
            border: 20.0,
        };
        let mut paddle = Paddle::new(&field, 15.0, 100.0, 30.0);
        paddle.pos.y = y;
        paddle
    }

    fn assert_close(a: Vec2, b: Vec2) {
        assert!((a - b).length() < 1e-5, "{:?} != {:?}", a, b);
    }

    fn block() -> Block {
        // 30x60, centre (215, 230), half diagonal floors to 33
        Block::new(1, Rect::new(200.0, 200.0, 30.0, 60.0))
    }

    #[test]
    fn test_paddle_bounce_centre_goes_straight_back() {
        let paddle = paddle_at(200.0);
        let mut rng = Pcg32::seed_from_u64(5);
        let com = paddle.centre_of_mass();
        let mut ball = Ball::new(1, Vec2::new(745.0, com), Vec2::new(300.0, 0.0));

        paddle_bounce(&mut ball, &paddle, &mut rng);

        assert!(ball.vel.x < 0.0);
        assert!(ball.vel.y.abs() < 1e-3);
        let speed = ball.vel.length();
        assert!((275.0..=350.0).contains(&speed), "speed {}", speed);
    }

    #[test]
    fn test_paddle_bounce_lower_half_deflects_down() {
        let paddle = paddle_at(200.0);
        let mut rng = Pcg32::seed_from_u64(5);
        // Bottom end of the paddle: offset 1, full deflection
        let mut ball = Ball::new(1, Vec2::new(745.0, 300.0), Vec2::new(300.0, 0.0));

        paddle_bounce(&mut ball, &paddle, &mut rng);

        assert!(ball.vel.x < 0.0);
        assert!(ball.vel.y > 0.0);
        let angle = (ball.vel.y / -ball.vel.x).atan();
        assert!((angle - MAX_REBOUND_ANGLE).abs() < 1e-3);
    }

    #[test]
    fn test_paddle_bounce_upper_half_deflects_up() {
        let paddle = paddle_at(200.0);
        let mut rng = Pcg32::seed_from_u64(6);
        let mut ball = Ball::new(1, Vec2::new(745.0, 225.0), Vec2::new(300.0, 40.0));

        paddle_bounce(&mut ball, &paddle, &mut rng);

        assert!(ball.vel.x < 0.0);
        assert!(ball.vel.y < 0.0);
    }

    #[test]
    fn test_paddle_bounce_speed_floor() {
        let paddle = paddle_at(200.0);
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..200 {
            let mut ball = Ball::new(1, Vec2::new(745.0, 260.0), Vec2::new(10.0, 0.0));
            paddle_bounce(&mut ball, &paddle, &mut rng);
            assert!(ball.vel.length() >= MIN_REBOUND_SPEED - 1e-3);
        }
    }

    #[test]
    fn test_wall_bounce_preserves_speed() {
        let mut ball = Ball::new(1, Vec2::new(50.0, 15.0), Vec2::new(120.0, -90.0));
        wall_bounce(&mut ball, &OrientedPlane::TOP_WALL);
        assert_eq!(ball.vel, Vec2::new(120.0, 90.0));
    }

    #[test]
    fn test_back_wall_kick_range() {
        let mut rng = Pcg32::seed_from_u64(2);
        for _ in 0..100 {
            let mut ball = Ball::new(1, Vec2::ZERO, Vec2::new(50.0, 0.0));
            back_wall_kick(&mut ball, &mut rng);
            assert!((100.0..=150.0).contains(&ball.vel.x));
            assert_eq!(ball.vel.y, 0.0);
        }
    }

    #[test]
    fn test_block_face_from_above() {
        let (face, normal) = block_face_normal(Vec2::new(215.0, 190.0), &block());
        assert_eq!(face, BlockFace::NormalY);
        assert_close(normal, Vec2::NEG_Y);
    }

    #[test]
    fn test_block_face_from_below() {
        let (face, normal) = block_face_normal(Vec2::new(220.0, 268.0), &block());
        assert_eq!(face, BlockFace::NormalY);
        assert_close(normal, Vec2::Y);
    }

    #[test]
    fn test_block_face_from_left() {
        let (face, normal) = block_face_normal(Vec2::new(192.0, 230.0), &block());
        assert_eq!(face, BlockFace::NormalX);
        assert_close(normal, Vec2::NEG_X);
    }

    #[test]
    fn test_block_face_from_right_near_corner() {
        // 33 * sin(atan2(25, 25)) ~= 23.3, under the 30 threshold
        let (face, normal) = block_face_normal(Vec2::new(240.0, 255.0), &block());
        assert_eq!(face, BlockFace::NormalX);
        assert_close(normal, Vec2::X);
    }

    #[test]
    fn test_block_bounce_reflects_off_face() {
        let mut ball = Ball::new(1, Vec2::new(192.0, 230.0), Vec2::new(80.0, 20.0));
        let face = block_bounce(&mut ball, &block()).expect("face normal");
        assert_eq!(face, BlockFace::NormalX);
        assert_close(ball.vel, Vec2::new(-80.0, 20.0));
    }

    #[test]
    fn test_block_bounce_off_top_flips_vertical_velocity() {
        let mut ball = Ball::new(1, Vec2::new(215.0, 190.0), Vec2::new(30.0, 70.0));
        let face = block_bounce(&mut ball, &block()).expect("face normal");
        assert_eq!(face, BlockFace::NormalY);
        assert_close(ball.vel, Vec2::new(30.0, -70.0));
    }

    #[test]
    fn test_block_bounce_at_centre_is_degenerate() {
        let mut ball = Ball::new(1, Vec2::new(215.0, 230.0), Vec2::new(80.0, 20.0));
        assert_eq!(block_bounce(&mut ball, &block()), Err(GeometryError::ZeroLength));
        assert_eq!(ball.vel, Vec2::new(80.0, 20.0));
    }
}

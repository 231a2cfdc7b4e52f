//! Per-tick simulation update
//!
//! Core game loop. Input, randomness and time are all injected so a tick is
//! reproducible given the same sources.

use glam::Vec2;
use rand::Rng;

use super::collision::{back_wall_kick, block_bounce, paddle_bounce, wall_bounce};
use super::movable::{Movable, advance, next_position};
use super::plane::OrientedPlane;
use super::state::{Ball, Block, Field, GameEvent, GameState, Paddle, Wall};
use crate::consts::WALL_BOUNCE_POINTS;
use crate::platform::{Clock, InputEvent, InputSource, Key};
use crate::settings::ScoreMode;

/// What the host loop should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// Quit was requested; stop driving ticks
    Quit,
}

/// What a ball can run into, besides the other balls
pub struct Obstacles<'a> {
    pub field: &'a Field,
    pub paddle: &'a Paddle,
    pub blocks: &'a mut Vec<Block>,
}

/// Advance the game state by one tick
pub fn update_game_state<I, R, C>(
    state: &mut GameState,
    input: &mut I,
    rng: &mut R,
    clock: &C,
) -> TickOutcome
where
    I: InputSource + ?Sized,
    R: Rng + ?Sized,
    C: Clock + ?Sized,
{
    state.events.clear();
    state.time_ticks += 1;

    let event = input.poll_event();
    let outcome = if event == Some(InputEvent::Quit) {
        log::info!("Quit requested at tick {}", state.time_ticks);
        TickOutcome::Quit
    } else {
        TickOutcome::Continue
    };

    // A finished game stays finished
    if !state.is_game_over() {
        if event == Some(InputEvent::KeyDown(Key::Space)) {
            state.spawn_new_ball(rng);
        }
        if input.is_key_pressed(Key::Return) {
            state.spawn_new_ball(rng);
        }
    }

    remove_off_field_balls(state);

    if state.balls.is_empty() {
        state.set_game_over();
    }

    update_balls(state, rng, clock);

    let pointer_y = input.pointer_position().y;
    update_paddle(&mut state.paddle, &state.field, pointer_y, clock.now());

    outcome
}

/// Drop balls that left through the open right edge
fn remove_off_field_balls(state: &mut GameState) {
    let width = state.field.width;
    let events = &mut state.events;
    state.balls.retain(|ball| {
        if ball.pos.x > width {
            log::debug!("Ball {} left the field at {:?}", ball.id, ball.pos);
            events.push(GameEvent::BallLost { ball_id: ball.id });
            false
        } else {
            true
        }
    });
}

/// Update every live ball and fold the wall hits into the score
fn update_balls<R, C>(state: &mut GameState, rng: &mut R, clock: &C)
where
    R: Rng + ?Sized,
    C: Clock + ?Sized,
{
    let GameState {
        field,
        paddle,
        balls,
        blocks,
        events,
        score,
        score_mode,
        ..
    } = state;

    let start_score = *score;
    let mut obstacles = Obstacles {
        field,
        paddle,
        blocks,
    };

    for ball in balls.iter_mut() {
        let points = update_ball(ball, &mut obstacles, events, rng, clock.now());
        match score_mode {
            ScoreMode::Accumulate => *score += points,
            ScoreMode::LastBallWins => *score = start_score + points,
        }
    }
}

/// Move one ball through one tick and resolve its collisions.
///
/// Wall checks use where the ball is about to be, block and paddle checks use
/// where it is now. Returns the points scored.
pub fn update_ball<R: Rng + ?Sized>(
    ball: &mut Ball,
    obstacles: &mut Obstacles<'_>,
    events: &mut Vec<GameEvent>,
    rng: &mut R,
    now: f64,
) -> u64 {
    let dt = ball.take_elapsed(now);
    let next = next_position(ball, dt);
    let mut points = 0;

    let hit = ball
        .hitbox()
        .first_overlap(obstacles.blocks.iter().map(Block::hitbox));
    if let Some(index) = hit {
        let block = obstacles.blocks.remove(index);
        match block_bounce(ball, &block) {
            Ok(face) => log::debug!("Ball {} hit {:?} face of block {}", ball.id, face, block.id),
            Err(e) => log::warn!("Ball {} hit block {} without a face: {}", ball.id, block.id, e),
        }
        events.push(GameEvent::BlockDestroyed {
            block_id: block.id,
            pos: block.centre(),
        });
    }

    if ball.hitbox().overlaps_rect(&obstacles.paddle.hitbox()) {
        paddle_bounce(ball, obstacles.paddle, rng);
        events.push(GameEvent::PaddleHit { ball_id: ball.id });
    }

    let field = obstacles.field;
    let reach = field.border + ball.radius;

    if next.x < reach {
        points += WALL_BOUNCE_POINTS;
        wall_bounce(ball, &OrientedPlane::BACK_WALL);
        back_wall_kick(ball, rng);
        events.push(GameEvent::WallBounce {
            ball_id: ball.id,
            wall: Wall::Back,
        });
    }

    if next.y < reach {
        points += WALL_BOUNCE_POINTS;
        wall_bounce(ball, &OrientedPlane::TOP_WALL);
        events.push(GameEvent::WallBounce {
            ball_id: ball.id,
            wall: Wall::Top,
        });
    }

    if next.y > field.height - reach {
        points += WALL_BOUNCE_POINTS;
        wall_bounce(ball, &OrientedPlane::BOTTOM_WALL);
        log::debug!("Ball {} bounced off the bottom wall at {:?}", ball.id, ball.pos);
        events.push(GameEvent::WallBounce {
            ball_id: ball.id,
            wall: Wall::Bottom,
        });
    }

    advance(ball, dt);

    points
}

/// Follow the pointer, keeping the paddle between the top and bottom borders
pub fn update_paddle(paddle: &mut Paddle, field: &Field, pointer_y: f32, now: f64) {
    let half_height = paddle.height * 0.5;
    let upper_bound = half_height + field.border;
    let lower_bound = field.height - half_height - field.border;
    debug_assert!(
        upper_bound <= lower_bound,
        "paddle height {} does not fit between borders of {} in a field of height {}",
        paddle.height,
        field.border,
        field.height
    );

    let centre_y = match (pointer_y < upper_bound, pointer_y > lower_bound) {
        (false, false) => pointer_y,
        (true, false) => upper_bound,
        (false, true) => lower_bound,
        (true, true) => unreachable!(
            "pointer y {} is above {} and below {}; paddle does not fit the field",
            pointer_y, upper_bound, lower_bound
        ),
    };

    let dt = paddle.take_elapsed(now);
    let old_y = paddle.pos.y;
    let new_y = centre_y - half_height;
    paddle.set_position(Vec2::new(paddle.pos.x, new_y));

    let vel = if dt > 0.0 {
        Vec2::new(0.0, (new_y - old_y) / dt)
    } else {
        Vec2::ZERO
    };
    paddle.set_velocity(vel);
}

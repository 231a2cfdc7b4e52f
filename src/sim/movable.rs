//! Shared motion capability for balls and the paddle

use glam::Vec2;

/// Anything with a position and a velocity
pub trait Movable {
    fn position(&self) -> Vec2;
    fn set_position(&mut self, pos: Vec2);
    fn velocity(&self) -> Vec2;
    fn set_velocity(&mut self, vel: Vec2);
}

/// Where `body` will be after `dt` seconds at its current velocity
#[inline]
pub fn next_position<M: Movable + ?Sized>(body: &M, dt: f32) -> Vec2 {
    body.position() + body.velocity() * dt
}

/// Seconds since `*last_update`, recording `now` in its place.
///
/// Never-updated bodies report zero, as does a clock that ran backwards.
pub fn take_elapsed(last_update: &mut Option<f64>, now: f64) -> f32 {
    let elapsed = match *last_update {
        Some(then) => (now - then).max(0.0),
        None => 0.0,
    };
    *last_update = Some(now);
    elapsed as f32
}

/// Integrate `body` forward by `dt` seconds
pub fn advance<M: Movable + ?Sized>(body: &mut M, dt: f32) {
    let pos = next_position(body, dt);
    body.set_position(pos);
}

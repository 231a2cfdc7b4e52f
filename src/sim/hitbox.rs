//! Hitbox primitives
//!
//! Screen-space geometry with y growing downward:
//! - `Rect`: axis-aligned rectangle anchored at its top-left corner
//! - `Circle`: centre + radius
//!
//! Overlap tests are strict, so shapes that only touch along an edge do not
//! collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    pub fn centre(&self) -> Vec2 {
        self.pos + self.dimensions() * 0.5
    }

    /// (width, height) as a vector; its length is the diagonal
    pub fn dimensions(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Closest point inside the rectangle to `p`
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.left(), self.right()),
            p.y.clamp(self.top(), self.bottom()),
        )
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Circular hitbox
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub centre: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(centre: Vec2, radius: f32) -> Self {
        Self { centre, radius }
    }

    /// Circle/rectangle overlap via the rectangle's closest point
    pub fn overlaps_rect(&self, rect: &Rect) -> bool {
        let closest = rect.clamp_point(self.centre);
        self.centre.distance_squared(closest) < self.radius * self.radius
    }

    /// Index of the first rectangle this circle overlaps, in slice order
    pub fn first_overlap<'a, I>(&self, rects: I) -> Option<usize>
    where
        I: IntoIterator<Item = &'a Rect>,
    {
        rects.into_iter().position(|r| self.overlaps_rect(r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_centre_and_dimensions() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.centre(), Vec2::new(25.0, 40.0));
        assert_eq!(rect.dimensions().length(), 50.0);
    }

    #[test]
    fn test_rect_overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let touching = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&touching));
    }

    #[test]
    fn test_circle_rect_overlap() {
        let rect = Rect::new(100.0, 100.0, 50.0, 50.0);

        // Centre inside
        assert!(Circle::new(Vec2::new(120.0, 120.0), 1.0).overlaps_rect(&rect));
        // Poking in from the left
        assert!(Circle::new(Vec2::new(95.0, 125.0), 8.0).overlaps_rect(&rect));
        // Near the corner but outside the rounded reach
        assert!(!Circle::new(Vec2::new(94.0, 94.0), 8.0).overlaps_rect(&rect));
        // Exactly touching
        assert!(!Circle::new(Vec2::new(90.0, 125.0), 10.0).overlaps_rect(&rect));
    }

    #[test]
    fn test_first_overlap_prefers_collection_order() {
        let rects = [
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(20.0, 0.0, 10.0, 10.0),
            Rect::new(12.0, 0.0, 6.0, 10.0),
        ];
        // Overlaps both index 1 and 2; index 1 comes first
        let circle = Circle::new(Vec2::new(19.0, 5.0), 3.0);
        assert_eq!(circle.first_overlap(&rects), Some(1));

        let far = Circle::new(Vec2::new(500.0, 500.0), 3.0);
        assert_eq!(far.first_overlap(&rects), None);
    }
}

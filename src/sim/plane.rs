//! Oriented planes for reflection
//!
//! A plane is just its unit normal. Walls are fixed planes; block faces get a
//! plane built from the face normal at the moment of impact.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// A plane through the origin, described by its unit normal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedPlane {
    normal: Vec2,
}

impl OrientedPlane {
    /// Left border, facing into the field
    pub const BACK_WALL: OrientedPlane = OrientedPlane::from_unit(Vec2::X);
    /// Top border, facing down into the field (y grows downward)
    pub const TOP_WALL: OrientedPlane = OrientedPlane::from_unit(Vec2::Y);
    /// Bottom border, facing up into the field
    pub const BOTTOM_WALL: OrientedPlane = OrientedPlane::from_unit(Vec2::NEG_Y);

    /// Build a plane from any non-zero normal
    pub fn new(normal: Vec2) -> Result<Self, GeometryError> {
        normal
            .try_normalize()
            .map(|normal| Self { normal })
            .ok_or(GeometryError::ZeroLength)
    }

    /// Build a plane from a normal that is already unit length
    pub const fn from_unit(normal: Vec2) -> Self {
        Self { normal }
    }

    #[inline]
    pub fn normal(&self) -> Vec2 {
        self.normal
    }

    /// Standard reflection: v' = v - 2(v·n)n
    #[inline]
    pub fn reflect(&self, velocity: Vec2) -> Vec2 {
        velocity - 2.0 * velocity.dot(self.normal) * self.normal
    }
}

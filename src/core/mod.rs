//! Core value types shared by the environment, grid, and algorithms.

pub mod geometry;

pub use geometry::{Circle, Rect, Vec2};

use serde::{Deserialize, Serialize};

/// The cleaning robot.
///
/// Mutated only by [`RoomEnvironment`](crate::environment::RoomEnvironment)
/// in response to accepted movement events.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Robot {
    /// Center position in room pixels
    pub position: Vec2,
    /// Footprint radius in pixels
    pub radius: f32,
    /// Heading in radians (from +X toward +Y)
    pub heading: f32,
    /// Forward step length per tick in pixels
    pub speed: f32,
    /// Cumulative dirt collected (dirt-per-cover per newly visited tile)
    pub dirt_collected: u64,
}

impl Robot {
    /// Create a robot at a position with zero heading and no dirt collected.
    pub fn new(position: Vec2, radius: f32, speed: f32) -> Self {
        Self {
            position,
            radius,
            heading: 0.0,
            speed,
            dirt_collected: 0,
        }
    }

    /// Footprint circle at the current position
    #[inline]
    pub fn footprint(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }

    /// Footprint circle at a candidate position
    #[inline]
    pub fn footprint_at(&self, position: Vec2) -> Circle {
        Circle::new(position, self.radius)
    }
}

/// Normalize an angle to [-π, π]
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle;
    while a > std::f32::consts::PI {
        a -= 2.0 * std::f32::consts::PI;
    }
    while a < -std::f32::consts::PI {
        a += 2.0 * std::f32::consts::PI;
    }
    a
}

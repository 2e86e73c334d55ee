//! Geometry primitives for collision and bounds testing.
//!
//! All values are in room pixels with the origin at the top-left corner,
//! X growing right and Y growing down. These are pure value types: every
//! placement and movement validation in the environment goes through the
//! tests defined here.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// 2D vector / point in room pixels
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// X coordinate (right)
    pub x: f32,
    /// Y coordinate (down)
    pub y: f32,
}

impl Vec2 {
    /// Create a new vector
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Zero vector (origin)
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    /// Unit vector at a given angle (radians, measured from +X toward +Y)
    #[inline]
    pub fn from_angle(angle: f32) -> Vec2 {
        Vec2::new(angle.cos(), angle.sin())
    }

    /// Angle of this vector (radians, from +X toward +Y)
    #[inline]
    pub fn angle(&self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: &Vec2) -> f32 {
        (*self - *other).length()
    }

    /// Squared distance (avoids sqrt)
    #[inline]
    pub fn distance_squared(&self, other: &Vec2) -> f32 {
        let d = *self - *other;
        d.x * d.x + d.y * d.y
    }

    /// Length (magnitude)
    #[inline]
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Normalize to unit length; returns self unchanged when zero
    #[inline]
    pub fn normalize(&self) -> Vec2 {
        let len = self.length();
        if len > 0.0 {
            Vec2::new(self.x / len, self.y / len)
        } else {
            *self
        }
    }

    /// Dot product
    #[inline]
    pub fn dot(&self, other: &Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Reflect this vector about a unit normal
    #[inline]
    pub fn reflect(&self, normal: &Vec2) -> Vec2 {
        *self - *normal * (2.0 * self.dot(normal))
    }
}

impl Add for Vec2 {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Vec2::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f32) -> Self {
        Vec2::new(self.x * scalar, self.y * scalar)
    }
}

/// Axis-aligned rectangle (obstacles, tiles, room interior)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width (non-negative)
    pub width: f32,
    /// Height (non-negative)
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether a point lies inside this rectangle (edges exclusive on
    /// right/bottom so adjacent tiles never share a point)
    #[inline]
    pub fn contains_point(&self, p: &Vec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Whether another rectangle lies entirely inside this one
    #[inline]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Whether two rectangles overlap (shared edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Closest point inside this rectangle to `p` (clamp per axis)
    #[inline]
    pub fn clamp_point(&self, p: &Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.x, self.right()),
            p.y.clamp(self.y, self.bottom()),
        )
    }
}

/// Circle (the robot's footprint)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Center point
    pub center: Vec2,
    /// Radius (positive)
    pub radius: f32,
}

impl Circle {
    /// Create a new circle
    #[inline]
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Whether this circle intersects a rectangle.
    ///
    /// Clamps the center onto the rectangle and compares the squared
    /// clamped distance to the squared radius. Touching (distance ==
    /// radius) counts as intersecting.
    #[inline]
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        let closest = rect.clamp_point(&self.center);
        self.center.distance_squared(&closest) <= self.radius * self.radius
    }

    /// Whether this circle lies entirely inside a rectangle
    #[inline]
    pub fn inside_rect(&self, rect: &Rect) -> bool {
        self.center.x - self.radius >= rect.x
            && self.center.y - self.radius >= rect.y
            && self.center.x + self.radius <= rect.right()
            && self.center.y + self.radius <= rect.bottom()
    }

    /// Contact normal from a rectangle toward this circle's center.
    ///
    /// Unit vector pointing from the closest point on the rectangle to the
    /// circle center. Falls back to the center-to-center direction when the
    /// circle center is inside the rectangle.
    pub fn contact_normal(&self, rect: &Rect) -> Vec2 {
        let closest = rect.clamp_point(&self.center);
        let out = self.center - closest;
        if out.length() > f32::EPSILON {
            out.normalize()
        } else {
            (self.center - rect.center()).normalize()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circle_rect_intersection_clamped_distance() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);

        // Clearly outside
        assert!(!Circle::new(Vec2::new(50.0, 50.0), 5.0).intersects_rect(&rect));
        // Touching the right edge
        assert!(Circle::new(Vec2::new(35.0, 20.0), 5.0).intersects_rect(&rect));
        // Center inside
        assert!(Circle::new(Vec2::new(20.0, 20.0), 1.0).intersects_rect(&rect));
        // Near the corner: diagonal distance matters, not per-axis
        assert!(!Circle::new(Vec2::new(34.0, 34.0), 5.0).intersects_rect(&rect));
        assert!(Circle::new(Vec2::new(33.0, 33.0), 5.0).intersects_rect(&rect));
    }

    #[test]
    fn rect_overlap_excludes_shared_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        let c = Rect::new(5.0, 5.0, 10.0, 10.0);

        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&a));
    }

    #[test]
    fn circle_inside_rect_requires_full_containment() {
        let room = Rect::new(0.0, 0.0, 800.0, 600.0);

        assert!(Circle::new(Vec2::new(30.0, 30.0), 30.0).inside_rect(&room));
        assert!(!Circle::new(Vec2::new(29.0, 30.0), 30.0).inside_rect(&room));
        assert!(!Circle::new(Vec2::new(780.0, 300.0), 30.0).inside_rect(&room));
    }

    #[test]
    fn contact_normal_points_away_from_rect() {
        let rect = Rect::new(100.0, 100.0, 50.0, 50.0);

        // Approaching from the left: normal points in -X
        let n = Circle::new(Vec2::new(90.0, 125.0), 12.0).contact_normal(&rect);
        assert!((n.x - (-1.0)).abs() < 1e-6);
        assert!(n.y.abs() < 1e-6);

        // Approaching from above: normal points in -Y
        let n = Circle::new(Vec2::new(125.0, 90.0), 12.0).contact_normal(&rect);
        assert!(n.x.abs() < 1e-6);
        assert!((n.y - (-1.0)).abs() < 1e-6);
    }

    #[test]
    fn reflect_mirrors_about_normal() {
        let d = Vec2::new(1.0, 1.0).normalize();
        let n = Vec2::new(-1.0, 0.0);
        let r = d.reflect(&n);
        assert!((r.x - (-d.x)).abs() < 1e-6);
        assert!((r.y - d.y).abs() < 1e-6);
    }
}

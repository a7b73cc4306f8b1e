//! Axis-aligned rectangles and circles for collision tests
//!
//! Screen space: origin at the top-left corner, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Normal used when a contact direction is degenerate (straight up)
pub const FALLBACK_NORMAL: Vec2 = Vec2::new(0.0, -1.0);

/// An axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square bounding box of a circle
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self::new(
            center.x - radius,
            center.y - radius,
            radius * 2.0,
            radius * 2.0,
        )
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Closest point inside the rectangle to `p` (per-axis clamp)
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.left(), self.right()),
            p.y.clamp(self.top(), self.bottom()),
        )
    }

    /// Strict overlap test: rectangles that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }
}

/// A circle given by center and radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Reflect velocity off a surface
///
/// Standard specular reflection: v' = v - 2(v·n)n, with `normal` of unit length.
#[inline]
pub fn reflect(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Unit normal pointing from `surface` toward `center`
///
/// Returns the distance between the two points alongside the normal. A zero
/// distance yields [`FALLBACK_NORMAL`] instead of dividing by zero.
pub fn contact_normal(center: Vec2, surface: Vec2) -> (Vec2, f32) {
    let delta = center - surface;
    let dist = delta.length();
    if dist > 0.0 {
        (delta / dist, dist)
    } else {
        (FALLBACK_NORMAL, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reflect_off_top_wall_normal() {
        let reflected = reflect(Vec2::new(3.0, 4.0), FALLBACK_NORMAL);
        assert!((reflected.x - 3.0).abs() < 1e-6);
        assert!((reflected.y + 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_reflect_diagonal_normal() {
        let n = Vec2::new(1.0, -1.0).normalize();
        let reflected = reflect(Vec2::new(0.0, 5.0), n);
        assert!((reflected.x - 5.0).abs() < 1e-5);
        assert!(reflected.y.abs() < 1e-5);
    }

    #[test]
    fn test_closest_point_outside_and_inside() {
        let rect = Rect::new(10.0, 10.0, 20.0, 40.0);
        assert_eq!(rect.closest_point(Vec2::new(0.0, 0.0)), Vec2::new(10.0, 10.0));
        assert_eq!(rect.closest_point(Vec2::new(50.0, 30.0)), Vec2::new(30.0, 30.0));
        // Inside: the point itself
        assert_eq!(rect.closest_point(Vec2::new(15.0, 20.0)), Vec2::new(15.0, 20.0));
    }

    #[test]
    fn test_intersects_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let touching = Rect::new(10.0, 0.0, 10.0, 10.0);
        let overlapping = Rect::new(9.5, 9.5, 10.0, 10.0);
        assert!(!a.intersects(&touching));
        assert!(a.intersects(&overlapping));
        assert!(overlapping.intersects(&a));
    }

    #[test]
    fn test_contact_normal_fallback() {
        let p = Vec2::new(5.0, 5.0);
        let (n, dist) = contact_normal(p, p);
        assert_eq!(n, FALLBACK_NORMAL);
        assert_eq!(dist, 0.0);

        let (n, dist) = contact_normal(Vec2::new(5.0, 0.0), Vec2::new(5.0, 4.0));
        assert_eq!(n, Vec2::new(0.0, -1.0));
        assert!((dist - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_around_circle() {
        let r = Rect::around_circle(Vec2::new(100.0, 50.0), 10.0);
        assert_eq!(r, Rect::new(90.0, 40.0, 20.0, 20.0));
        assert_eq!(r.center(), Vec2::new(100.0, 50.0));
    }
}

//! Axis-aligned rectangles for visible-bounds collision
//!
//! Sprites are described by their center and display size. Collision works on
//! the visible rectangle shrunk toward its center, since the art leaves empty
//! margins inside every sprite.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle stored as min/max corners (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// Rectangle of `size` centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    /// Shrink toward the center by independent x/y factors (1.0 = unchanged)
    pub fn shrunk(&self, factor: Vec2) -> Self {
        Self::from_center(self.center(), self.size() * factor)
    }

    /// Strict overlap test; rectangles that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shrink_keeps_center() {
        let r = Rect::from_center(Vec2::new(50.0, 20.0), Vec2::new(100.0, 40.0));
        let s = r.shrunk(Vec2::new(0.5, 0.75));
        assert_eq!(s.center(), r.center());
        assert!((s.size().x - 50.0).abs() < 1e-4);
        assert!((s.size().y - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_intersects() {
        let a = Rect::from_center(Vec2::ZERO, Vec2::splat(10.0));
        let b = Rect::from_center(Vec2::new(8.0, 0.0), Vec2::splat(10.0));
        let c = Rect::from_center(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        assert!(a.intersects(&b));
        // Touching edges only
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_shrink_separates_near_miss() {
        let a = Rect::from_center(Vec2::ZERO, Vec2::splat(20.0));
        let b = Rect::from_center(Vec2::new(18.0, 0.0), Vec2::splat(20.0));
        assert!(a.intersects(&b));
        assert!(!a.shrunk(Vec2::splat(0.85)).intersects(&b.shrunk(Vec2::splat(0.85))));
    }
}

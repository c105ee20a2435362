//! Axis-aligned rectangle geometry for the player, drops and buttons
//!
//! Screen space: origin at the top-left corner, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Rectangle of the given size centered on a point
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            pos: center - size / 2.0,
            size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Center of the top edge (where feedback popups start)
    pub fn top_center(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y)
    }

    /// Overlap test; rectangles that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Point containment, inclusive of the top/left edges only
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Clamp the horizontal position so the rect stays within `[min_x, max_x]`
    pub fn clamp_x(&mut self, min_x: f32, max_x: f32) {
        let max_left = (max_x - self.size.x).max(min_x);
        self.pos.x = self.pos.x.clamp(min_x, max_left);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_and_center() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.center(), Vec2::new(25.0, 40.0));
        assert_eq!(r.top_center(), Vec2::new(25.0, 20.0));
    }

    #[test]
    fn test_intersects_overlap() {
        let a = Rect::new(0.0, 0.0, 40.0, 40.0);
        let b = Rect::new(30.0, 30.0, 40.0, 40.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 40.0, 40.0);
        let right = Rect::new(40.0, 0.0, 40.0, 40.0);
        let below = Rect::new(0.0, 40.0, 40.0, 40.0);
        assert!(!a.intersects(&right));
        assert!(!a.intersects(&below));
    }

    #[test]
    fn test_contains_point() {
        let r = Rect::centered(Vec2::new(100.0, 100.0), Vec2::new(20.0, 10.0));
        assert!(r.contains_point(Vec2::new(100.0, 100.0)));
        assert!(r.contains_point(Vec2::new(90.0, 95.0)));
        assert!(!r.contains_point(Vec2::new(110.0, 100.0)));
        assert!(!r.contains_point(Vec2::new(100.0, 80.0)));
    }

    #[test]
    fn test_clamp_x() {
        let mut r = Rect::new(-15.0, 0.0, 60.0, 80.0);
        r.clamp_x(0.0, 800.0);
        assert_eq!(r.left(), 0.0);

        r.pos.x = 790.0;
        r.clamp_x(0.0, 800.0);
        assert_eq!(r.right(), 800.0);
    }
}

//! Axis-aligned rectangle geometry and random helpers
//!
//! Every entity is tested for contact through its bounding rectangle. Overlap
//! is strict: rectangles that only share an edge do not touch.

use glam::Vec2;
use rand::Rng;

/// An axis-aligned rectangle in canvas space (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
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

    /// Geometric center
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict intersection on both axes (shared edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Free-function form of [`Rect::overlaps`]
#[inline]
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.overlaps(b)
}

/// Clamp `value` into `[min, max]`.
///
/// Unlike `f32::clamp` this never panics: when `min > max` the lower bound wins.
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    min.max(max.min(value))
}

/// Uniform integer in `[lo, hi]` (both inclusive). A reversed range collapses to `lo`.
pub fn rand_int<R: Rng + ?Sized>(rng: &mut R, lo: i32, hi: i32) -> i32 {
    if hi <= lo {
        return lo;
    }
    rng.random_range(lo..=hi)
}

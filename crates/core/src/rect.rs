//! Axis-aligned rectangles on a sheet.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tolerance for comparisons of linear dimensions (millimetres).
pub const EPSILON: f64 = 1e-9;

/// Axis-aligned rectangle with its origin at the top-left corner.
///
/// `x` runs along the sheet length, `y` along the sheet width.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Extent along the sheet length.
    pub width: f64,
    /// Extent along the sheet width.
    pub height: f64,
}

impl Rect {
    /// Creates a new rectangle.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (`x + width`).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Returns the area.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Shorter side.
    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }

    /// Longer side.
    pub fn max_side(&self) -> f64 {
        self.width.max(self.height)
    }

    /// Returns true if either side is (numerically) zero or negative.
    pub fn is_degenerate(&self) -> bool {
        self.width <= EPSILON || self.height <= EPSILON
    }

    /// Returns true if a `width` x `height` box fits inside.
    pub fn fits(&self, width: f64, height: f64) -> bool {
        width <= self.width + EPSILON && height <= self.height + EPSILON
    }

    /// Returns true if `other` lies entirely inside this rectangle.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x - EPSILON
            && other.y >= self.y - EPSILON
            && other.right() <= self.right() + EPSILON
            && other.bottom() <= self.bottom() + EPSILON
    }

    /// Returns true if the interiors overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right() - EPSILON
            && other.x < self.right() - EPSILON
            && self.y < other.bottom() - EPSILON
            && other.y < self.bottom() - EPSILON
    }

    /// Returns the intersection if the interiors overlap.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        Some(Rect::new(
            x,
            y,
            self.right().min(other.right()) - x,
            self.bottom().min(other.bottom()) - y,
        ))
    }

    /// Grows the rectangle by `margin` on every side.
    pub fn expand(&self, margin: f64) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    /// Removes a trailing kerf strip from the right and bottom edges.
    ///
    /// Returns `None` if nothing physical remains.
    pub fn trim_trailing(&self, kerf: f64) -> Option<Rect> {
        let trimmed = Rect::new(self.x, self.y, self.width - kerf, self.height - kerf);
        if trimmed.is_degenerate() {
            None
        } else {
            Some(trimmed)
        }
    }
}

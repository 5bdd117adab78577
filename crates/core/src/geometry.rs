//! Screen geometry in CSS pixels, origin at the viewport's top-left corner.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle as reported by a bounding-box query.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    #[must_use]
    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Grow the rectangle by `amount` on every side.
    #[must_use]
    pub fn inflate(&self, amount: f64) -> Self {
        Self {
            top: self.top - amount,
            left: self.left - amount,
            width: self.width + amount * 2.0,
            height: self.height + amount * 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Top-left corner of the tooltip box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TooltipPlacement {
    pub top: f64,
    pub left: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_edges() {
        let rect = Rect::new(100.0, 50.0, 100.0, 40.0);
        assert_eq!(rect.right(), 150.0);
        assert_eq!(rect.bottom(), 140.0);
        assert_eq!(rect.center_x(), 100.0);
        assert_eq!(rect.center_y(), 120.0);
    }

    #[test]
    fn inflate_grows_each_side() {
        let rect = Rect::new(100.0, 50.0, 100.0, 40.0).inflate(4.0);
        assert_eq!(rect, Rect::new(96.0, 46.0, 108.0, 48.0));
    }
}

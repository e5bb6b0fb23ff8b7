#![forbid(unsafe_code)]

//! Logical geometry value types and their scaled counterparts.
//!
//! All types here are expressed in device-independent units. Applying
//! [`scaled`](Size::scaled) converts to physical units for a given factor
//! using the shared half-away-from-zero rounding rule, so a `Size`, an
//! `Insets`, and a constraint-string literal all round identically.

use serde::{Deserialize, Serialize};

use crate::factor::scale_len;

/// A width/height pair.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// Create a size.
    #[inline]
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// This size rendered at `factor`.
    #[inline]
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            width: scale_len(self.width, factor),
            height: scale_len(self.height, factor),
        }
    }
}

/// An x/y position.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a point.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// This point rendered at `factor`.
    #[inline]
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            x: scale_len(self.x, factor),
            y: scale_len(self.y, factor),
        }
    }
}

/// Per-edge spacing (top, left, bottom, right).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub struct Insets {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl Insets {
    /// Create insets from the four edges.
    #[inline]
    #[must_use]
    pub const fn new(top: i32, left: i32, bottom: i32, right: i32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// The same spacing on every edge.
    #[inline]
    #[must_use]
    pub const fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value)
    }

    /// These insets rendered at `factor`.
    #[inline]
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            top: scale_len(self.top, factor),
            left: scale_len(self.left, factor),
            bottom: scale_len(self.bottom, factor),
            right: scale_len(self.right, factor),
        }
    }
}

/// A position plus a size.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Create a rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// This rectangle rendered at `factor`. Position and size both scale.
    #[inline]
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            x: scale_len(self.x, factor),
            y: scale_len(self.y, factor),
            width: scale_len(self.width, factor),
            height: scale_len(self.height, factor),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_scales_both_axes() {
        assert_eq!(Size::new(16, 16).scaled(2.0), Size::new(32, 32));
        assert_eq!(Size::new(5, 3).scaled(1.5), Size::new(8, 5));
    }

    #[test]
    fn insets_scale_every_edge() {
        let insets = Insets::new(1, 2, 3, 4).scaled(2.0);
        assert_eq!(insets, Insets::new(2, 4, 6, 8));
    }

    #[test]
    fn uniform_insets() {
        assert_eq!(Insets::uniform(5), Insets::new(5, 5, 5, 5));
    }

    #[test]
    fn rect_scales_position_and_size() {
        assert_eq!(
            Rect::new(10, 20, 30, 40).scaled(1.5),
            Rect::new(15, 30, 45, 60)
        );
    }

    #[test]
    fn point_scales() {
        assert_eq!(Point::new(3, -3).scaled(1.5), Point::new(5, -5));
    }

    #[test]
    fn identity_factor_is_noop() {
        let size = Size::new(17, 23);
        assert_eq!(size.scaled(1.0), size);
    }
}

//! Pixel geometry.

use serde::{Deserialize, Serialize};

/// CSS pixels. Fractional values occur once scroll offsets and insets are
/// involved, so this is a float rather than the integer pixel type used by
/// raster code.
pub type Px = f64;

/// An axis-aligned box.
///
/// Used both for offset boxes (relative to the offset parent, like
/// `offsetLeft`/`offsetTop`) and for viewport-relative client rects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: Px,
    pub top: Px,
    pub width: Px,
    pub height: Px,
}

impl Rect {
    pub const fn new(left: Px, top: Px, width: Px, height: Px) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge (`left + width`).
    pub fn right(&self) -> Px {
        self.left + self.width
    }

    /// Bottom edge (`top + height`).
    pub fn bottom(&self) -> Px {
        self.top + self.height
    }

    /// Return a copy moved by `(dx, dy)`.
    pub fn translated(&self, dx: Px, dy: Px) -> Self {
        Self::new(self.left + dx, self.top + dy, self.width, self.height)
    }
}

/// Format a pixel value the way inline style variables carry it.
///
/// Whole values print without a fraction (`"120px"`), others keep it
/// (`"12.5px"`).
pub fn px(value: Px) -> String {
    if value.fract() == 0.0 {
        format!("{}px", value as i64)
    } else {
        format!("{value}px")
    }
}

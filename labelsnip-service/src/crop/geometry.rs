//! Rectangle types for crop regions.
//!
//! `Rectangle` lives in PDF points (origin bottom-left, y up); `PixelBox` is
//! an axis-aligned region of a rendered bitmap (origin top-left, y down).

/// Rectangle in PDF points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Rectangle {
    pub fn width(&self) -> f64 {
        (self.x2 - self.x1).abs()
    }

    pub fn height(&self) -> f64 {
        (self.y2 - self.y1).abs()
    }

    /// Min/max union of two rectangles
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        Rectangle {
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }

    /// Grow the rectangle by `padding` points on every side
    pub fn expand(&self, padding: f64) -> Rectangle {
        Rectangle {
            x1: self.x1 - padding,
            y1: self.y1 - padding,
            x2: self.x2 + padding,
            y2: self.y2 + padding,
        }
    }

    /// Clamp the rectangle to the bounds of another (typically the page rect)
    pub fn clamp_to(&self, bounds: &Rectangle) -> Rectangle {
        Rectangle {
            x1: self.x1.max(bounds.x1),
            y1: self.y1.max(bounds.y1),
            x2: self.x2.min(bounds.x2),
            y2: self.y2.min(bounds.y2),
        }
    }
}

/// Crop region in bitmap pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelBox {
    /// Expand by `padding` pixels on every side, clamped to an
    /// `image_width` x `image_height` bitmap.
    pub fn pad_and_clamp(&self, padding: u32, image_width: u32, image_height: u32) -> PixelBox {
        let x = self.x.saturating_sub(padding);
        let y = self.y.saturating_sub(padding);
        let width = (self.width + 2 * padding).min(image_width.saturating_sub(x)).max(1);
        let height = (self.height + 2 * padding).min(image_height.saturating_sub(y)).max(1);
        PixelBox {
            x,
            y,
            width,
            height,
        }
    }
}

//! Pixel-space geometry for chart layout.
//!
//! All coordinates are integer pixels with the origin at the top-left of
//! the canvas, y growing downwards.

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    /// Left edge (inclusive).
    pub x: u32,
    /// Top edge (inclusive).
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Build from inclusive-exclusive corner coordinates.
    #[must_use]
    pub fn from_edges(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self::new(left, top, right.saturating_sub(left), bottom.saturating_sub(top))
    }

    /// Exclusive right edge.
    #[must_use]
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// True if the rectangle covers no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Grow by `pad` pixels on every side, clamped to `[0, max_w) x [0, max_h)`.
    #[must_use]
    pub fn expand(&self, pad: u32, max_w: u32, max_h: u32) -> Self {
        Self::from_edges(
            self.x.saturating_sub(pad),
            self.y.saturating_sub(pad),
            (self.right() + pad).min(max_w),
            (self.bottom() + pad).min(max_h),
        )
    }
}

//! Core framebuffer for pixel rendering.
//!
//! Provides a SIMD-aligned RGBA pixel buffer. Reports the trueno backend
//! selected for the host.

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::geometry::PixelRect;
use trueno::Backend;

/// Alignment for SIMD operations (64 bytes for AVX-512).
const SIMD_ALIGNMENT: usize = 64;

/// SIMD-aligned framebuffer for efficient pixel operations.
///
/// Rows are padded to a multiple of 64 bytes; use [`Framebuffer::to_compact_pixels`]
/// when a tightly packed buffer is needed.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    /// Width in pixels.
    width: u32,
    /// Height in pixels.
    height: u32,
    /// RGBA pixels in row-major order.
    pixels: Vec<u8>,
    /// Stride in bytes (may include padding for alignment).
    stride: usize,
}

impl Framebuffer {
    /// Create a new framebuffer with the given dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use engagement_heatmap::framebuffer::Framebuffer;
    ///
    /// let fb = Framebuffer::new(512, 512).unwrap();
    /// assert_eq!(fb.width(), 512);
    /// assert_eq!(fb.height(), 512);
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        let row_bytes = (width as usize) * 4;
        let stride = (row_bytes + SIMD_ALIGNMENT - 1) & !(SIMD_ALIGNMENT - 1);

        Ok(Self { width, height, pixels: vec![0; stride * (height as usize)], stride })
    }

    /// Get the width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The whole canvas as a rectangle.
    #[must_use]
    pub const fn bounds(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width, self.height)
    }

    /// Get a row of pixels as a slice.
    #[must_use]
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = (y as usize) * self.stride;
        Some(&self.pixels[start..start + (self.width as usize) * 4])
    }

    /// Clear the framebuffer to a solid color.
    pub fn clear(&mut self, color: Rgba) {
        let [r, g, b, a] = color.to_array();
        let row_bytes = (self.width as usize) * 4;

        for y in 0..self.height as usize {
            let row_start = y * self.stride;
            for chunk in self.pixels[row_start..row_start + row_bytes].chunks_exact_mut(4) {
                chunk.copy_from_slice(&[r, g, b, a]);
            }
        }
    }

    /// Fill a rectangular region with a solid color.
    ///
    /// Coordinates are clamped to framebuffer bounds.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba) {
        let x1 = x.min(self.width);
        let y1 = y.min(self.height);
        let x2 = x.saturating_add(w).min(self.width);
        let y2 = y.saturating_add(h).min(self.height);

        if x1 >= x2 || y1 >= y2 {
            return;
        }

        let [r, g, b, a] = color.to_array();
        let rect_width = (x2 - x1) as usize;

        for row_y in y1..y2 {
            let row_start = (row_y as usize) * self.stride + (x1 as usize) * 4;
            let row = &mut self.pixels[row_start..row_start + rect_width * 4];

            for chunk in row.chunks_exact_mut(4) {
                chunk.copy_from_slice(&[r, g, b, a]);
            }
        }
    }

    /// Get the color at a specific pixel coordinate.
    ///
    /// Returns `None` if the coordinates are out of bounds.
    #[must_use]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let idx = self.pixel_index(x, y);
        Some(Rgba::from_array([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]))
    }

    /// Set the color at a specific pixel coordinate.
    ///
    /// Does nothing if the coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }

        let idx = self.pixel_index(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_array());
    }

    /// Set a pixel given signed coordinates, ignoring anything off-canvas.
    pub fn set_pixel_i32(&mut self, x: i32, y: i32, color: Rgba) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as u32, y as u32, color);
        }
    }

    /// Smallest rectangle containing every pixel that differs from `background`.
    ///
    /// Returns `None` for a blank canvas.
    #[must_use]
    pub fn content_bounds(&self, background: Rgba) -> Option<PixelRect> {
        let bg = background.to_array();
        let mut left = u32::MAX;
        let mut top = u32::MAX;
        let mut right = 0;
        let mut bottom = 0;

        for y in 0..self.height {
            let Some(row) = self.row(y) else { continue };
            for (x, px) in row.chunks_exact(4).enumerate() {
                if px != bg.as_slice() {
                    let x = x as u32;
                    left = left.min(x);
                    right = right.max(x + 1);
                    top = top.min(y);
                    bottom = bottom.max(y + 1);
                }
            }
        }

        (left < right).then(|| PixelRect::from_edges(left, top, right, bottom))
    }

    /// Copy out a sub-rectangle as a new framebuffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the rectangle is empty or extends past the canvas.
    pub fn crop(&self, rect: PixelRect) -> Result<Self> {
        if rect.is_empty() || rect.right() > self.width || rect.bottom() > self.height {
            return Err(Error::InvalidDimensions { width: rect.width, height: rect.height });
        }

        let mut out = Self::new(rect.width, rect.height)?;
        let bytes = (rect.width as usize) * 4;
        for dy in 0..rect.height {
            let src = self.pixel_index(rect.x, rect.y + dy);
            let dst = (dy as usize) * out.stride;
            out.pixels[dst..dst + bytes].copy_from_slice(&self.pixels[src..src + bytes]);
        }
        Ok(out)
    }

    /// Calculate the byte index for a pixel coordinate.
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * self.stride + (x as usize) * 4
    }

    /// Get pixel data as a compact buffer without stride padding.
    ///
    /// PNG expects tightly-packed rows.
    #[must_use]
    pub fn to_compact_pixels(&self) -> Vec<u8> {
        let row_bytes = (self.width as usize) * 4;

        if self.stride == row_bytes {
            return self.pixels.clone();
        }

        let mut compact = Vec::with_capacity(row_bytes * (self.height as usize));
        for y in 0..self.height as usize {
            let start = y * self.stride;
            compact.extend_from_slice(&self.pixels[start..start + row_bytes]);
        }
        compact
    }

    /// Get the selected SIMD backend.
    #[must_use]
    pub fn backend() -> Backend {
        Backend::select_best()
    }
}

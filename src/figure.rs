//! Figure size and output layout policy.

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use serde::{Deserialize, Serialize};

/// How the final image size is decided.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum LayoutPolicy {
    /// Canvas is exactly `width_in * dpi` by `height_in * dpi`, no padding.
    #[default]
    ExactPixel,
    /// Canvas is cropped to the drawn content plus `pad_inches` on each side.
    ContentFitCrop {
        /// Padding kept around the content, in inches.
        #[serde(default = "default_pad_inches")]
        pad_inches: f32,
    },
}

fn default_pad_inches() -> f32 {
    0.1
}

/// Largest accepted resolution.
pub const MAX_DPI: u32 = 1200;

/// Largest accepted canvas side, in pixels.
pub const MAX_CANVAS_PX: u32 = 16_384;

/// Physical figure size and resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Figure {
    /// Width in inches.
    pub width_in: f32,
    /// Height in inches.
    pub height_in: f32,
    /// Dots per inch.
    pub dpi: u32,
    /// Output size policy.
    pub layout: LayoutPolicy,
}

impl Default for Figure {
    fn default() -> Self {
        Self { width_in: 8.0, height_in: 8.0, dpi: 64, layout: LayoutPolicy::ExactPixel }
    }
}

impl Figure {
    /// Canvas size in pixels.
    ///
    /// # Errors
    ///
    /// Returns an error if either side is not finite, rounds to zero pixels
    /// or exceeds [`MAX_CANVAS_PX`].
    pub fn pixel_size(&self) -> Result<(u32, u32)> {
        let to_px = |inches: f32| -> Option<u32> {
            let px = (inches * self.dpi as f32).round();
            (px.is_finite() && px >= 1.0 && px <= MAX_CANVAS_PX as f32).then_some(px as u32)
        };

        match (to_px(self.width_in), to_px(self.height_in)) {
            (Some(w), Some(h)) => Ok((w, h)),
            _ => Err(Error::InvalidDimensions {
                width: (self.width_in.max(0.0) * self.dpi as f32) as u32,
                height: (self.height_in.max(0.0) * self.dpi as f32) as u32,
            }),
        }
    }

    /// Check resolution, canvas size and padding together.
    ///
    /// # Errors
    ///
    /// Returns an error if `dpi` is outside `1..=MAX_DPI`, the canvas is
    /// invalid, or the content-fit padding is negative, not finite, or
    /// leaves no room for content.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_DPI).contains(&self.dpi) {
            return Err(Error::InvalidParameter {
                name: "dpi",
                message: format!("must be between 1 and {MAX_DPI}, got {}", self.dpi),
            });
        }
        let (width, height) = self.pixel_size()?;

        if let LayoutPolicy::ContentFitCrop { pad_inches } = self.layout {
            if !pad_inches.is_finite() || pad_inches < 0.0 {
                return Err(Error::InvalidParameter {
                    name: "pad_inches",
                    message: format!("must be a finite value >= 0, got {pad_inches}"),
                });
            }
            let pad = (pad_inches * self.dpi as f32).round();
            if 2.0 * pad >= width.min(height) as f32 {
                return Err(Error::InvalidParameter {
                    name: "pad_inches",
                    message: format!("{pad_inches}in of padding leaves no room on a {width}x{height} canvas"),
                });
            }
        }
        Ok(())
    }

    /// Blank border to leave around the drawing, in pixels.
    ///
    /// Content-fit output reserves its padding up front so cropping never
    /// has to grow the canvas.
    #[must_use]
    pub fn margin_px(&self) -> u32 {
        match self.layout {
            LayoutPolicy::ExactPixel => 0,
            LayoutPolicy::ContentFitCrop { pad_inches } => {
                (pad_inches.max(0.0) * self.dpi as f32).round() as u32
            }
        }
    }

    /// Apply the layout policy to a rendered canvas.
    ///
    /// `ExactPixel` returns the canvas untouched. `ContentFitCrop` trims
    /// everything that is still `background`, keeping the padding.
    pub fn finish(&self, fb: Framebuffer, background: Rgba) -> Result<Framebuffer> {
        match self.layout {
            LayoutPolicy::ExactPixel => Ok(fb),
            LayoutPolicy::ContentFitCrop { pad_inches } => {
                if !pad_inches.is_finite() || pad_inches < 0.0 {
                    return Err(Error::InvalidParameter {
                        name: "pad_inches",
                        message: format!("must be a finite value >= 0, got {pad_inches}"),
                    });
                }
                let Some(content) = fb.content_bounds(background) else {
                    return Ok(fb);
                };
                let pad = (pad_inches * self.dpi as f32).round() as u32;
                fb.crop(content.expand(pad, fb.width(), fb.height()))
            }
        }
    }
}

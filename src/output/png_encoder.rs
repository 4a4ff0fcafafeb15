//! PNG output encoder.
//!
//! Pure Rust PNG encoding using the `png` crate. When a resolution is set,
//! it is recorded in a `pHYs` chunk so viewers know the physical size.

use crate::error::Result;
use crate::framebuffer::Framebuffer;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const METERS_PER_INCH: f64 = 0.0254;

/// PNG encoder for framebuffer output.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngEncoder {
    dpi: Option<u32>,
}

impl PngEncoder {
    /// Encoder without resolution metadata.
    #[must_use]
    pub const fn new() -> Self {
        Self { dpi: None }
    }

    /// Record `dpi` in the output's physical pixel dimensions.
    #[must_use]
    pub const fn dpi(mut self, dpi: u32) -> Self {
        self.dpi = Some(dpi);
        self
    }

    /// Pixels per meter for the configured resolution.
    #[must_use]
    pub fn pixels_per_meter(&self) -> Option<u32> {
        self.dpi.map(|dpi| (f64::from(dpi) / METERS_PER_INCH).round() as u32)
    }

    /// Encode a framebuffer into any writer.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding or writing fails.
    pub fn encode<W: Write>(&self, fb: &Framebuffer, out: W) -> Result<()> {
        let mut encoder = png::Encoder::new(out, fb.width(), fb.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        if let Some(ppm) = self.pixels_per_meter() {
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: ppm,
                yppu: ppm,
                unit: png::Unit::Meter,
            }));
        }

        let mut writer = encoder.write_header()?;
        // Compact pixels drop the stride padding
        writer.write_image_data(&fb.to_compact_pixels())?;
        writer.finish()?;
        Ok(())
    }

    /// Write a framebuffer to a PNG file, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if file creation or PNG encoding fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, fb: &Framebuffer, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.encode(fb, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use std::io::Cursor;

    fn encode_to_vec(encoder: PngEncoder, fb: &Framebuffer) -> Vec<u8> {
        let mut bytes = Vec::new();
        encoder.encode(fb, &mut bytes).unwrap();
        bytes
    }

    fn decode_info(bytes: &[u8]) -> (u32, u32, Option<png::PixelDimensions>) {
        let reader = png::Decoder::new(Cursor::new(bytes)).read_info().unwrap();
        let info = reader.info();
        (info.width, info.height, info.pixel_dims)
    }

    #[test]
    fn test_png_encode_header() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.clear(Rgba::rgb(255, 0, 0));

        let bytes = encode_to_vec(PngEncoder::new(), &fb);
        // PNG magic bytes
        assert_eq!(&bytes[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
        let (w, h, dims) = decode_info(&bytes);
        assert_eq!((w, h), (10, 10));
        assert!(dims.is_none());
    }

    #[test]
    fn test_dpi_written_as_phys() {
        let fb = Framebuffer::new(4, 3).unwrap();
        let bytes = encode_to_vec(PngEncoder::new().dpi(64), &fb);
        let (_, _, dims) = decode_info(&bytes);
        let dims = dims.unwrap();
        assert_eq!(dims.xppu, 2520);
        assert_eq!(dims.yppu, 2520);
        assert_eq!(dims.unit, png::Unit::Meter);
    }

    #[test]
    fn test_pixels_roundtrip_without_stride_padding() {
        let mut fb = Framebuffer::new(3, 2).unwrap();
        fb.clear(Rgba::WHITE);
        fb.set_pixel(2, 1, Rgba::rgb(1, 2, 3));

        let bytes = encode_to_vec(PngEncoder::new(), &fb);
        let mut reader = png::Decoder::new(Cursor::new(bytes)).read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        reader.next_frame(&mut buf).unwrap();
        assert_eq!(buf.len(), 3 * 2 * 4);
        assert_eq!(&buf[20..24], &[1, 2, 3, 255]);
    }

    #[test]
    fn test_write_to_file_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        std::fs::write(&path, b"stale").unwrap();

        let fb = Framebuffer::new(8, 8).unwrap();
        PngEncoder::new().write_to_file(&fb, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}

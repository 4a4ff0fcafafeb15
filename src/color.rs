//! Color types used by the chart renderer.
//!
//! Colors are 8-bit RGBA. Greys can be built from a lightness fraction, the
//! way plotting styles usually name them (`".15"` is 15% lightness).

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Opaque grey from a lightness fraction in `[0, 1]`.
    #[must_use]
    pub fn grey(lightness: f32) -> Self {
        let v = (lightness.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgb(v, v, v)
    }

    /// Convert to array representation.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Create from array representation.
    #[must_use]
    pub const fn from_array(arr: [u8; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    /// Relative luminance (ITU-R BT.709 weights) on a 0-255 scale.
    #[must_use]
    pub fn luminance(self) -> f32 {
        0.2126 * f32::from(self.r) + 0.7152 * f32::from(self.g) + 0.0722 * f32::from(self.b)
    }

    /// Linear interpolation between two colors, rounded to the nearest level.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round().clamp(0.0, 255.0) as u8
        };

        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_constants() {
        assert_eq!(Rgba::BLACK, Rgba::rgb(0, 0, 0));
        assert_eq!(Rgba::WHITE, Rgba::rgb(255, 255, 255));
    }

    #[test]
    fn test_rgba_lerp() {
        let mid = Rgba::BLACK.lerp(Rgba::WHITE, 0.5);
        assert_eq!(mid, Rgba::rgb(128, 128, 128));
    }

    #[test]
    fn test_lerp_boundaries() {
        let black = Rgba::BLACK;
        let white = Rgba::WHITE;

        assert_eq!(black.lerp(white, 0.0), black);
        assert_eq!(black.lerp(white, 1.0), white);
        // t clamped to [0, 1]
        assert_eq!(black.lerp(white, -0.5), black);
        assert_eq!(black.lerp(white, 1.5), white);
    }

    #[test]
    fn test_grey_levels() {
        assert_eq!(Rgba::grey(0.0), Rgba::BLACK);
        assert_eq!(Rgba::grey(1.0), Rgba::WHITE);
        assert_eq!(Rgba::grey(0.15), Rgba::rgb(38, 38, 38));
        assert_eq!(Rgba::grey(0.8), Rgba::rgb(204, 204, 204));
    }

    #[test]
    fn test_luminance_orders_black_and_white() {
        assert!(Rgba::BLACK.luminance() < 1.0);
        assert!(Rgba::WHITE.luminance() > 254.0);
    }

    #[test]
    fn test_rgba_to_array_from_array() {
        let color = Rgba::new(10, 20, 30, 40);
        assert_eq!(Rgba::from_array(color.to_array()), color);
    }
}

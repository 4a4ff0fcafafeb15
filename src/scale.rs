//! Scale functions for data-to-visual mappings.
//!
//! Scales transform data values to visual properties (position, color).
//! Based on the Grammar of Graphics [Wilkinson 2005].

use crate::color::Rgba;
use crate::error::{Error, Result};

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Linear scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    domain_min: f32,
    domain_max: f32,
    range_min: f32,
    range_max: f32,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// # Errors
    ///
    /// Returns an error if domain_min equals domain_max.
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Result<Self> {
        if (domain.0 - domain.1).abs() < f32::EPSILON {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self { domain_min: domain.0, domain_max: domain.1, range_min: range.0, range_max: range.1 })
    }

    /// Invert the scale (range to domain).
    #[must_use]
    pub fn invert(&self, value: f32) -> f32 {
        let t = (value - self.range_min) / (self.range_max - self.range_min);
        self.domain_min + t * (self.domain_max - self.domain_min)
    }
}

impl Scale<f32, f32> for LinearScale {
    fn scale(&self, value: f32) -> f32 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f32, f32) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f32, f32) {
        (self.range_min, self.range_max)
    }
}

/// Control points of the "rocket" sequential map, dark to light.
///
/// Sampled at eight evenly spaced positions of the 256-entry table.
const ROCKET: [Rgba; 8] = [
    Rgba::rgb(3, 5, 26),
    Rgba::rgb(53, 25, 62),
    Rgba::rgb(112, 31, 87),
    Rgba::rgb(173, 23, 89),
    Rgba::rgb(225, 51, 66),
    Rgba::rgb(243, 118, 81),
    Rgba::rgb(246, 180, 143),
    Rgba::rgb(250, 235, 221),
];

/// Color scale for mapping values to colors.
///
/// Colors are evenly spaced across the domain and linearly interpolated.
#[derive(Debug, Clone)]
pub struct ColorScale {
    colors: Vec<Rgba>,
    domain_min: f32,
    domain_max: f32,
}

impl ColorScale {
    /// Create a new color scale.
    ///
    /// # Errors
    ///
    /// Returns an error if colors is empty or domain is invalid.
    pub fn new(colors: Vec<Rgba>, domain: (f32, f32)) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::ScaleDomain("Color scale requires at least one color".to_string()));
        }

        if (domain.0 - domain.1).abs() < f32::EPSILON {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self { colors, domain_min: domain.0, domain_max: domain.1 })
    }

    /// Rocket: perceptually uniform, dark purple to cream.
    pub fn rocket(domain: (f32, f32)) -> Result<Self> {
        Self::new(ROCKET.to_vec(), domain)
    }

    /// Viridis (perceptually uniform, colorblind-safe).
    pub fn viridis(domain: (f32, f32)) -> Result<Self> {
        Self::new(
            vec![
                Rgba::rgb(68, 1, 84),
                Rgba::rgb(59, 82, 139),
                Rgba::rgb(33, 145, 140),
                Rgba::rgb(94, 201, 98),
                Rgba::rgb(253, 231, 37),
            ],
            domain,
        )
    }

    /// Magma (sequential, perceptually uniform).
    pub fn magma(domain: (f32, f32)) -> Result<Self> {
        Self::new(
            vec![
                Rgba::rgb(0, 0, 4),
                Rgba::rgb(81, 18, 124),
                Rgba::rgb(183, 55, 121),
                Rgba::rgb(252, 137, 97),
                Rgba::rgb(252, 253, 191),
            ],
            domain,
        )
    }

    /// Sequential blues.
    pub fn blues(domain: (f32, f32)) -> Result<Self> {
        Self::new(
            vec![
                Rgba::rgb(247, 251, 255),
                Rgba::rgb(198, 219, 239),
                Rgba::rgb(107, 174, 214),
                Rgba::rgb(33, 113, 181),
                Rgba::rgb(8, 48, 107),
            ],
            domain,
        )
    }

    /// Greyscale, black to white.
    pub fn greyscale(domain: (f32, f32)) -> Result<Self> {
        Self::new(vec![Rgba::BLACK, Rgba::WHITE], domain)
    }

    /// Same colors in the opposite order (the `_r` variant of a named map).
    #[must_use]
    pub fn reversed(mut self) -> Self {
        self.colors.reverse();
        self
    }

    /// Color stops, low end first.
    #[must_use]
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }
}

impl Scale<f32, Rgba> for ColorScale {
    fn scale(&self, value: f32) -> Rgba {
        let t = ((value - self.domain_min) / (self.domain_max - self.domain_min)).clamp(0.0, 1.0);

        if self.colors.len() == 1 {
            return self.colors[0];
        }

        let segment_count = self.colors.len() - 1;
        let segment = (t * segment_count as f32).floor() as usize;
        let segment = segment.min(segment_count - 1);

        let local_t = t * segment_count as f32 - segment as f32;

        self.colors[segment].lerp(self.colors[segment + 1], local_t)
    }

    fn domain(&self) -> (f32, f32) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (Rgba, Rgba) {
        (*self.colors.first().unwrap_or(&Rgba::BLACK), *self.colors.last().unwrap_or(&Rgba::WHITE))
    }
}

/// Round tick positions covering `[min, max]` with at most `max_count` ticks.
///
/// Steps are drawn from 1, 2, 2.5 and 5 times a power of ten. Only ticks
/// inside the interval are returned.
#[must_use]
pub fn nice_ticks(min: f32, max: f32, max_count: usize) -> Vec<f32> {
    if !min.is_finite() || !max.is_finite() || max <= min || max_count == 0 {
        return Vec::new();
    }

    let raw_step = (max - min) / max_count as f32;
    let magnitude = 10f32.powf(raw_step.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|&s| s >= raw_step)
        .unwrap_or(10.0 * magnitude);

    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;

    (first..=last).map(|k| k as f32 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_scale() {
        let scale = LinearScale::new((0.0, 100.0), (0.0, 1.0)).expect("operation should succeed");
        assert_relative_eq!(scale.scale(0.0), 0.0);
        assert_relative_eq!(scale.scale(50.0), 0.5);
        assert_relative_eq!(scale.scale(100.0), 1.0);
    }

    #[test]
    fn test_linear_scale_inverted_range() {
        // Colorbars map high values to the top (small y)
        let scale = LinearScale::new((0.0, 10.0), (100.0, 0.0)).expect("operation should succeed");
        assert_relative_eq!(scale.scale(10.0), 0.0);
        assert_relative_eq!(scale.invert(50.0), 5.0);
    }

    #[test]
    fn test_linear_scale_equal_domain() {
        assert!(LinearScale::new((1.0, 1.0), (0.0, 1.0)).is_err());
    }

    #[test]
    fn test_color_scale_endpoints() {
        let scale = ColorScale::rocket((0.0, 1.0)).expect("rocket should build");
        assert_eq!(scale.scale(0.0), ROCKET[0]);
        assert_eq!(scale.scale(1.0), ROCKET[7]);
        // Out-of-domain values clamp
        assert_eq!(scale.scale(-5.0), ROCKET[0]);
        assert_eq!(scale.scale(5.0), ROCKET[7]);
    }

    #[test]
    fn test_reversed_rocket_darkens_with_value() {
        let scale = ColorScale::rocket((0.0, 100.0)).expect("rocket should build").reversed();
        let mut previous = f32::INFINITY;
        for v in (0..=100).step_by(5) {
            let lum = scale.scale(v as f32).luminance();
            assert!(lum <= previous + 1.0, "luminance rose at {v}: {lum} > {previous}");
            previous = lum;
        }
        assert_eq!(scale.range().0, ROCKET[7]);
    }

    #[test]
    fn test_color_scale_requires_colors() {
        assert!(ColorScale::new(vec![], (0.0, 1.0)).is_err());
        assert!(ColorScale::new(vec![Rgba::BLACK], (2.0, 2.0)).is_err());
    }

    #[test]
    fn test_single_color_scale() {
        let scale = ColorScale::new(vec![Rgba::WHITE], (0.0, 1.0)).expect("should build");
        assert_eq!(scale.scale(0.3), Rgba::WHITE);
    }

    #[test]
    fn test_nice_ticks_engagement_range() {
        let ticks = nice_ticks(61.0, 1383.0, 8);
        assert_eq!(ticks, vec![200.0, 400.0, 600.0, 800.0, 1000.0, 1200.0]);
    }

    #[test]
    fn test_nice_ticks_small_range() {
        let ticks = nice_ticks(0.0, 10.0, 5);
        assert_eq!(ticks, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn test_nice_ticks_degenerate() {
        assert!(nice_ticks(1.0, 1.0, 5).is_empty());
        assert!(nice_ticks(0.0, f32::NAN, 5).is_empty());
        assert!(nice_ticks(0.0, 1.0, 0).is_empty());
    }
}

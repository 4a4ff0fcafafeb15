//! Property-based tests for synthesis, scales and layout.
//!
//! Run: cargo test --test property_test

#![allow(clippy::unwrap_used, missing_docs)]

use approx::assert_relative_eq;
use proptest::prelude::*;

use engagement_heatmap::color::Rgba;
use engagement_heatmap::figure::{Figure, LayoutPolicy};
use engagement_heatmap::framebuffer::Framebuffer;
use engagement_heatmap::scale::nice_ticks;
use engagement_heatmap::synth::{synthesize, SynthesisParams, BASE_ENGAGEMENT};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Clipping keeps every cell non-negative whatever the seed or noise level.
    #[test]
    fn prop_cells_never_negative(seed in any::<u64>(), noise_std in 0.0f64..2.0) {
        let table = synthesize(&SynthesisParams { seed, noise_std, scale: 1200.0 }).unwrap();
        prop_assert_eq!(table.values().len(), 24 * 7);
        prop_assert!(table.values().iter().all(|&v| v >= 0.0));
    }

    /// With the noise fixed by the seed, the multiplier scales every cell linearly.
    #[test]
    fn prop_scale_is_linear(seed in any::<u64>(), scale in 0.0f64..5000.0) {
        let reference = synthesize(&SynthesisParams { seed, scale: 1200.0, ..SynthesisParams::default() }).unwrap();
        let scaled = synthesize(&SynthesisParams { seed, scale, ..SynthesisParams::default() }).unwrap();
        for (a, b) in reference.values().iter().zip(scaled.values()) {
            assert_relative_eq!(a * scale / 1200.0, *b, epsilon = 1e-9, max_relative = 1e-12);
        }
    }

    /// The same seed always yields the same table.
    #[test]
    fn prop_seed_is_deterministic(seed in any::<u64>()) {
        let params = SynthesisParams { seed, ..SynthesisParams::default() };
        prop_assert_eq!(synthesize(&params).unwrap(), synthesize(&params).unwrap());
    }

    /// Without noise the table is the clipped base matrix times the scale.
    #[test]
    fn prop_zero_noise_is_base(seed in any::<u64>()) {
        let table = synthesize(&SynthesisParams { seed, noise_std: 0.0, scale: 1200.0 }).unwrap();
        for (hour, row) in BASE_ENGAGEMENT.iter().enumerate() {
            for (day, base) in row.iter().enumerate() {
                assert_relative_eq!(table.value(hour, day).unwrap(), base.max(0.0) * 1200.0);
            }
        }
    }

    /// Ticks ascend and stay within the requested range.
    #[test]
    fn prop_nice_ticks_in_range(min in -1000.0f32..1000.0, span in 0.01f32..5000.0, count in 2usize..12) {
        let max = min + span;
        let ticks = nice_ticks(min, max, count);
        prop_assert!(ticks.len() <= count + 1);
        let slack = span * 1e-3 + min.abs().max(max.abs()) * 1e-5;
        for t in &ticks {
            prop_assert!(*t >= min - slack && *t <= max + slack, "tick {} outside [{}, {}]", t, min, max);
        }
        prop_assert!(ticks.windows(2).all(|w| w[1] > w[0]));
    }

    /// Content-fit output never exceeds the canvas and keeps the ink.
    #[test]
    fn prop_content_fit_within_canvas(x in 0u32..60, y in 0u32..60, w in 1u32..20, h in 1u32..20) {
        let mut fb = Framebuffer::new(64, 64).unwrap();
        fb.clear(Rgba::WHITE);
        fb.fill_rect(x, y, w, h, Rgba::BLACK);

        let figure = Figure { width_in: 1.0, height_in: 1.0, dpi: 64, layout: LayoutPolicy::ContentFitCrop { pad_inches: 0.1 } };
        let out = figure.finish(fb, Rgba::WHITE).unwrap();
        prop_assert!(out.width() <= 64 && out.height() <= 64);
        prop_assert!(out.content_bounds(Rgba::WHITE).is_some());
    }
}

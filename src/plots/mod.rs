//! High-level plot types.
//!
//! Provides ready-to-use visualization types with builder APIs.

mod heatmap;

pub use heatmap::{HAlign, Heatmap, HeatmapLayout, HeatmapPalette, TickLabelStyle};

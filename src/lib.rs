//! # engagement-heatmap
//!
//! Deterministic synthetic engagement data rendered as an annotated heatmap
//! PNG, in pure Rust.
//!
//! A fixed 24x7 table of hourly engagement rates (hours x weekdays) gets
//! seeded Gaussian noise, is clipped at zero and scaled to "visits per 1000
//! users". The result is drawn transposed (days as rows, hours as columns)
//! with a reversed rocket colormap and a colorbar, then saved as a PNG.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use engagement_heatmap::prelude::*;
//!
//! let report = engagement_heatmap::pipeline::run(&ChartConfig::default())?;
//! assert_eq!((report.width, report.height), (512, 512));
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel`: Enable parallel SIMD reductions in trueno

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types.
pub mod color;

/// Core framebuffer for pixel rendering.
pub mod framebuffer;

/// Pixel rectangles.
pub mod geometry;

/// Scale functions for data-to-visual mappings.
pub mod scale;

/// Embedded bitmap font and text drawing.
pub mod text;

// ============================================================================
// Data
// ============================================================================

/// Synthetic engagement table.
pub mod synth;

// ============================================================================
// Visualization Modules
// ============================================================================

/// Styles, contexts and resolved themes.
pub mod theme;

/// Figure size, DPI and layout policy.
pub mod figure;

/// High-level plot types.
pub mod plots;

/// Output encoders.
pub mod output;

// ============================================================================
// Application
// ============================================================================

/// YAML chart configuration.
pub mod config;

/// Synthesize, render and save.
pub mod pipeline;

/// Stderr debug logging.
pub mod debug;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for engagement-heatmap operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust,ignore
/// use engagement_heatmap::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color::Rgba;
    pub use crate::config::ChartConfig;
    pub use crate::error::{Error, Result};
    pub use crate::figure::{Figure, LayoutPolicy};
    pub use crate::framebuffer::Framebuffer;
    pub use crate::output::PngEncoder;
    pub use crate::pipeline::RenderReport;
    pub use crate::plots::{Heatmap, HeatmapPalette};
    pub use crate::scale::{ColorScale, LinearScale, Scale};
    pub use crate::synth::{synthesize, EngagementTable, SynthesisParams};
    pub use crate::theme::{Context, Style, Theme};
}

// ============================================================================
// Re-exports
// ============================================================================

/// Re-export trueno for direct access to SIMD operations.
pub use trueno;

//! Chart themes.
//!
//! A theme combines a named [`Style`] (colors and decorations) with a named
//! [`Context`] (font sizing), mirroring the style/context split common in
//! statistical plotting. Themes only change appearance, never data.

use crate::color::Rgba;
use serde::{Deserialize, Serialize};

/// Named visual style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// White background, no grid.
    White,
    /// White background with light grey grid.
    #[default]
    WhiteGrid,
    /// Blue-grey background, no grid.
    Dark,
    /// Blue-grey background with white grid.
    DarkGrid,
    /// White background with visible tick marks.
    Ticks,
}

/// Named font-scaling context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Context {
    /// Smallest text (0.8x).
    Paper,
    /// Reference size (1.0x).
    Notebook,
    /// Presentation size (1.5x).
    #[default]
    Talk,
    /// Largest text (2.0x).
    Poster,
}

impl Context {
    /// Multiplier relative to the notebook context.
    #[must_use]
    pub const fn factor(self) -> f32 {
        match self {
            Self::Paper => 0.8,
            Self::Notebook => 1.0,
            Self::Talk => 1.5,
            Self::Poster => 2.0,
        }
    }
}

/// Base font sizes (points) of the notebook context.
const BASE_FONT_PT: f32 = 12.0;
const BASE_TICK_PT: f32 = 11.0;

/// Resolved theme: colors plus scaled font sizes.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Style this theme was built from.
    pub style: Style,
    /// Context this theme was built from.
    pub context: Context,
    /// Extra multiplier applied on top of the context.
    pub font_scale: f32,
    /// Figure background.
    pub background: Rgba,
    /// Axes (panel) background.
    pub panel_background: Rgba,
    /// Text and tick color.
    pub text_color: Rgba,
    /// Tick mark length in points (0 hides ticks).
    pub tick_length: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(Style::default(), Context::default(), 0.9)
    }
}

impl Theme {
    /// Build a theme from a style, a context and a font scale.
    #[must_use]
    pub fn new(style: Style, context: Context, font_scale: f32) -> Self {
        // Heatmaps hide grid lines, so the grid variants only differ in name here.
        let panel_background = match style {
            Style::White | Style::WhiteGrid | Style::Ticks => Rgba::WHITE,
            Style::Dark | Style::DarkGrid => Rgba::rgb(234, 234, 242),
        };

        Self {
            style,
            context,
            font_scale: font_scale.max(0.1),
            background: Rgba::WHITE,
            panel_background,
            text_color: Rgba::grey(0.15),
            tick_length: if style == Style::Ticks { 6.0 } else { 0.0 },
        }
    }

    /// Overall font multiplier.
    #[must_use]
    pub fn font_factor(&self) -> f32 {
        self.context.factor() * self.font_scale
    }

    /// Title size in points.
    #[must_use]
    pub fn title_points(&self) -> f32 {
        BASE_FONT_PT * self.font_factor()
    }

    /// Axis label size in points.
    #[must_use]
    pub fn label_points(&self) -> f32 {
        BASE_FONT_PT * self.font_factor()
    }

    /// Default tick label size in points.
    #[must_use]
    pub fn tick_points(&self) -> f32 {
        BASE_TICK_PT * self.font_factor()
    }
}

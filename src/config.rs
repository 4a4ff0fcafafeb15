//! Chart configuration.
//!
//! Every field is optional in YAML; the defaults reproduce the stock chart
//! (seed 42, 8x8 inches at 64 dpi, whitegrid/talk, `rocket_r`).
//! Precedence is CLI > file > defaults.

use crate::error::{Error, Result};
use crate::figure::Figure;
use crate::plots::HeatmapPalette;
use crate::synth::SynthesisParams;
use crate::theme::{Context, Style, Theme};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Theme and palette selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Named style.
    #[serde(default)]
    pub style: Style,

    /// Named font-scaling context.
    #[serde(default)]
    pub context: Context,

    /// Multiplier on top of the context.
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,

    /// Cell colormap.
    #[serde(default)]
    pub palette: HeatmapPalette,

    /// Width of the lines between cells, in points.
    #[serde(default = "default_separator_points")]
    pub separator_points: f32,
}

fn default_font_scale() -> f32 {
    0.9
}
fn default_separator_points() -> f32 {
    0.5
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            style: Style::default(),
            context: Context::default(),
            font_scale: default_font_scale(),
            palette: HeatmapPalette::default(),
            separator_points: default_separator_points(),
        }
    }
}

impl ThemeConfig {
    /// Resolve into a [`Theme`].
    #[must_use]
    pub fn to_theme(&self) -> Theme {
        Theme::new(self.style, self.context, self.font_scale)
    }
}

/// Text drawn around the heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelConfig {
    /// Chart title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Gap between title and grid, in points.
    #[serde(default = "default_title_pad")]
    pub title_pad: f32,

    /// Horizontal axis label.
    #[serde(default = "default_x_label")]
    pub x_label: String,

    /// Vertical axis label.
    #[serde(default = "default_y_label")]
    pub y_label: String,

    /// Colorbar label.
    #[serde(default = "default_colorbar_label")]
    pub colorbar_label: String,

    /// Hour tick label size, in points.
    #[serde(default = "default_x_tick_points")]
    pub x_tick_points: f32,

    /// Day tick label size, in points.
    #[serde(default = "default_y_tick_points")]
    pub y_tick_points: f32,
}

fn default_title() -> String {
    "Hourly Customer Engagement by Day (Synthetic Data)".to_string()
}
fn default_title_pad() -> f32 {
    16.0
}
fn default_x_label() -> String {
    "Hour of Day".to_string()
}
fn default_y_label() -> String {
    "Day of Week".to_string()
}
fn default_colorbar_label() -> String {
    "Engagement (visits per 1000 users)".to_string()
}
fn default_x_tick_points() -> f32 {
    7.0
}
fn default_y_tick_points() -> f32 {
    10.0
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            title_pad: default_title_pad(),
            x_label: default_x_label(),
            y_label: default_y_label(),
            colorbar_label: default_colorbar_label(),
            x_tick_points: default_x_tick_points(),
            y_tick_points: default_y_tick_points(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Where the PNG is written.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Data synthesis parameters.
    #[serde(default)]
    pub synthesis: SynthesisParams,

    /// Figure size, resolution and layout policy.
    #[serde(default)]
    pub figure: Figure,

    /// Theme and palette.
    #[serde(default)]
    pub theme: ThemeConfig,

    /// Title and axis text.
    #[serde(default)]
    pub labels: LabelConfig,
}

fn default_version() -> u32 {
    1
}
fn default_output() -> PathBuf {
    PathBuf::from("chart.png")
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            output: default_output(),
            synthesis: SynthesisParams::default(),
            figure: Figure::default(),
            theme: ThemeConfig::default(),
            labels: LabelConfig::default(),
        }
    }
}

impl ChartConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed; the error carries the line.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            Error::ConfigParse { line, message: e.to_string() }
        })
    }

    /// Check every value the renderer depends on.
    ///
    /// # Errors
    ///
    /// Returns the first invalid parameter found.
    pub fn validate(&self) -> Result<()> {
        self.synthesis.validate()?;
        self.figure.validate()?;

        let positive = [
            ("theme.font_scale", self.theme.font_scale),
            ("labels.x_tick_points", self.labels.x_tick_points),
            ("labels.y_tick_points", self.labels.y_tick_points),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidParameter { name, message: format!("must be > 0, got {value}") });
            }
        }

        let non_negative = [
            ("theme.separator_points", self.theme.separator_points),
            ("labels.title_pad", self.labels.title_pad),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidParameter { name, message: format!("must be >= 0, got {value}") });
            }
        }

        Ok(())
    }
}

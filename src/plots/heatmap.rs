//! Annotated heatmap for 2D data matrices.
//!
//! Renders a grid of values as colored cells, with row/column tick labels,
//! axis labels, a title and a colorbar legend. Placement of every element is
//! computed up front by [`Heatmap::layout`], so the cell grid always fills
//! whatever the text leaves over.

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::geometry::PixelRect;
use crate::scale::{nice_ticks, ColorScale, LinearScale, Scale};
use crate::text::{self, Rotation, TextStyle};
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use trueno::Vector;

/// Gap between tick labels and the axis, in points.
const TICK_PAD_PT: f32 = 3.5;
/// Gap between axis labels and tick labels, in points.
const LABEL_PAD_PT: f32 = 4.0;
/// Gap between the cell grid and the colorbar, in points.
const COLORBAR_PAD_PT: f32 = 14.0;
/// Colorbar thickness, in points.
const COLORBAR_WIDTH_PT: f32 = 18.0;
/// Upper bound on colorbar ticks.
const COLORBAR_MAX_TICKS: usize = 8;
const SEPARATOR_COLOR: Rgba = Rgba::WHITE;

/// Color palette type for heatmaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatmapPalette {
    /// Rocket, dark for low values.
    Rocket,
    /// Reversed rocket, dark for high values.
    #[default]
    RocketR,
    /// Viridis (perceptually uniform, colorblind-safe).
    Viridis,
    /// Magma (perceptually uniform).
    Magma,
    /// Sequential blues.
    Blues,
    /// Greyscale.
    Greyscale,
}

impl HeatmapPalette {
    fn color_scale(self, domain: (f32, f32)) -> Result<ColorScale> {
        match self {
            Self::Rocket => ColorScale::rocket(domain),
            Self::RocketR => ColorScale::rocket(domain).map(ColorScale::reversed),
            Self::Viridis => ColorScale::viridis(domain),
            Self::Magma => ColorScale::magma(domain),
            Self::Blues => ColorScale::blues(domain),
            Self::Greyscale => ColorScale::greyscale(domain),
        }
    }
}

/// Horizontal anchoring of a tick label relative to its tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    /// Label starts at the tick.
    Left,
    /// Label is centered on the tick.
    #[default]
    Center,
    /// Label ends at the tick.
    Right,
}

/// Appearance of one axis's tick labels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickLabelStyle {
    /// Font size in points; `None` uses the theme's tick size.
    pub points: Option<f32>,
    /// Label rotation.
    pub rotation: Rotation,
    /// Anchoring relative to the tick.
    pub align: HAlign,
}

/// Pixel placement of every heatmap element.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapLayout {
    /// Cell grid area.
    pub plot: PixelRect,
    /// Colorbar gradient area, if shown.
    pub colorbar: Option<PixelRect>,
    /// Top-left of the title text.
    pub title: Option<(i32, i32)>,
    /// Top-left of the x-axis label.
    pub x_label: Option<(i32, i32)>,
    /// Top-left of the (vertical) y-axis label.
    pub y_label: Option<(i32, i32)>,
    /// Top-left of the (vertical) colorbar label.
    pub colorbar_label: Option<(i32, i32)>,
    /// Distance from an axis to its tick labels, in pixels.
    pub tick_pad: u32,
}

/// Font styles resolved against the theme and DPI.
struct TextStyles {
    title: TextStyle,
    label: TextStyle,
    vertical_label: TextStyle,
    x_tick: TextStyle,
    y_tick: TextStyle,
    colorbar_tick: TextStyle,
}

/// Builder for creating heatmaps.
#[derive(Debug, Clone)]
pub struct Heatmap {
    /// 2D data matrix in row-major order.
    data: Vec<f32>,
    rows: usize,
    cols: usize,
    row_labels: Vec<String>,
    col_labels: Vec<String>,
    palette: HeatmapPalette,
    width: u32,
    height: u32,
    dpi: u32,
    /// Blank border around everything, in pixels.
    margin: u32,
    theme: Theme,
    separators: bool,
    separator_points: f32,
    title: Option<String>,
    title_pad_points: f32,
    x_label: Option<String>,
    y_label: Option<String>,
    show_colorbar: bool,
    colorbar_label: Option<String>,
    x_ticks: TickLabelStyle,
    y_ticks: TickLabelStyle,
}

impl Default for Heatmap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heatmap {
    /// Create a new heatmap builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            rows: 0,
            cols: 0,
            row_labels: Vec::new(),
            col_labels: Vec::new(),
            palette: HeatmapPalette::default(),
            width: 512,
            height: 512,
            dpi: 64,
            margin: 0,
            theme: Theme::default(),
            separators: true,
            separator_points: 0.5,
            title: None,
            title_pad_points: 6.0,
            x_label: None,
            y_label: None,
            show_colorbar: true,
            colorbar_label: None,
            x_ticks: TickLabelStyle::default(),
            y_ticks: TickLabelStyle::default(),
        }
    }

    /// Set the 2D data matrix.
    ///
    /// Data should be provided in row-major order.
    #[must_use]
    pub fn data(mut self, data: &[f32], rows: usize, cols: usize) -> Self {
        self.data = data.to_vec();
        self.rows = rows;
        self.cols = cols;
        self
    }

    /// Labels drawn left of each row, top to bottom.
    #[must_use]
    pub fn row_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.row_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Labels drawn under each column, left to right.
    #[must_use]
    pub fn col_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.col_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Set the color palette.
    #[must_use]
    pub fn palette(mut self, palette: HeatmapPalette) -> Self {
        self.palette = palette;
        self
    }

    /// Set the canvas dimensions in pixels.
    #[must_use]
    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the resolution used to convert point sizes to pixels.
    #[must_use]
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi.max(1);
        self
    }

    /// Set the blank border around the whole chart.
    #[must_use]
    pub fn margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    /// Set the theme.
    #[must_use]
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Enable or disable separator lines between cells.
    #[must_use]
    pub fn separators(mut self, show: bool) -> Self {
        self.separators = show;
        self
    }

    /// Set the separator width in points.
    #[must_use]
    pub fn separator_width(mut self, points: f32) -> Self {
        self.separator_points = points;
        self
    }

    /// Set the title and its distance from the grid, in points.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>, pad_points: f32) -> Self {
        self.title = Some(title.into());
        self.title_pad_points = pad_points;
        self
    }

    /// Set the x-axis label.
    #[must_use]
    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = Some(label.into());
        self
    }

    /// Set the y-axis label.
    #[must_use]
    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }

    /// Show or hide the colorbar.
    #[must_use]
    pub fn colorbar(mut self, show: bool) -> Self {
        self.show_colorbar = show;
        self
    }

    /// Set the colorbar label.
    #[must_use]
    pub fn colorbar_label(mut self, label: impl Into<String>) -> Self {
        self.colorbar_label = Some(label.into());
        self
    }

    /// Set the x tick label style.
    #[must_use]
    pub fn x_tick_labels(mut self, style: TickLabelStyle) -> Self {
        self.x_ticks = style;
        self
    }

    /// Set the y tick label style.
    #[must_use]
    pub fn y_tick_labels(mut self, style: TickLabelStyle) -> Self {
        self.y_ticks = style;
        self
    }

    /// Build and validate the heatmap.
    ///
    /// # Errors
    ///
    /// Returns an error if data is empty, dimensions don't match, labels
    /// don't match the matrix shape, or a value is not finite.
    pub fn build(self) -> Result<Self> {
        if self.data.is_empty() {
            return Err(Error::EmptyData);
        }

        if self.rows == 0 || self.cols == 0 {
            return Err(Error::InvalidDimensions { width: self.cols as u32, height: self.rows as u32 });
        }

        let expected = self.rows * self.cols;
        if self.data.len() != expected {
            return Err(Error::DataLengthMismatch { expected, actual: self.data.len() });
        }

        if !self.row_labels.is_empty() && self.row_labels.len() != self.rows {
            return Err(Error::DataLengthMismatch { expected: self.rows, actual: self.row_labels.len() });
        }

        if !self.col_labels.is_empty() && self.col_labels.len() != self.cols {
            return Err(Error::DataLengthMismatch { expected: self.cols, actual: self.col_labels.len() });
        }

        if self.data.iter().any(|v| !v.is_finite()) {
            return Err(Error::Rendering("heatmap values must be finite".to_string()));
        }

        Ok(self)
    }

    /// Get the data extent (min, max) with SIMD reductions.
    fn data_extent(&self) -> (f32, f32) {
        let vec = Vector::from_slice(&self.data);
        let min = vec.min().unwrap_or(0.0);
        let max = vec.max().unwrap_or(0.0);

        // All-equal data still needs a non-empty domain
        if (max - min).abs() < f32::EPSILON {
            (min - 0.5, max + 0.5)
        } else {
            (min, max)
        }
    }

    fn create_color_scale(&self) -> Result<ColorScale> {
        self.palette.color_scale(self.data_extent())
    }

    fn px(&self, points: f32) -> u32 {
        (points * self.dpi as f32 / 72.0).round().max(0.0) as u32
    }

    fn text_styles(&self) -> TextStyles {
        let color = self.theme.text_color;
        let sized = |points: f32| TextStyle::new(color, text::scale_for_points(points, self.dpi));
        let tick = |style: &TickLabelStyle| {
            sized(style.points.unwrap_or_else(|| self.theme.tick_points())).rotated(style.rotation)
        };

        TextStyles {
            title: sized(self.theme.title_points()),
            label: sized(self.theme.label_points()),
            vertical_label: sized(self.theme.label_points()).rotated(Rotation::Deg90),
            x_tick: tick(&self.x_ticks),
            y_tick: tick(&self.y_ticks),
            colorbar_tick: sized(self.theme.tick_points()),
        }
    }

    /// Colorbar tick values and their labels.
    fn colorbar_ticks(&self) -> Vec<(f32, String)> {
        let (min, max) = self.data_extent();
        let ticks = nice_ticks(min, max, COLORBAR_MAX_TICKS);
        let step = if ticks.len() > 1 { ticks[1] - ticks[0] } else { max - min };
        ticks.into_iter().map(|t| (t, format_tick(t, step))).collect()
    }

    /// Compute where every element goes.
    ///
    /// # Errors
    ///
    /// Returns an error if the text leaves no room for at least one pixel
    /// per cell.
    pub fn layout(&self) -> Result<HeatmapLayout> {
        let styles = self.text_styles();
        let tick_len = self.px(self.theme.tick_length);
        let tick_pad = self.px(TICK_PAD_PT) + tick_len;
        let label_pad = self.px(LABEL_PAD_PT);

        let title_extent = self.title.as_deref().map(|t| text::extent(t, &styles.title));

        let y_tick_w = self.row_labels.iter().map(|l| text::extent(l, &styles.y_tick).0).max().unwrap_or(0);
        let x_tick_h = self.col_labels.iter().map(|l| text::extent(l, &styles.x_tick).1).max().unwrap_or(0);

        let x_label_extent = self.x_label.as_deref().map(|l| text::extent(l, &styles.label));
        let y_label_extent = self.y_label.as_deref().map(|l| text::extent(l, &styles.vertical_label));
        let cbar_label_extent =
            self.colorbar_label.as_deref().map(|l| text::extent(l, &styles.vertical_label));

        let cbar_tick_w = if self.show_colorbar {
            self.colorbar_ticks()
                .iter()
                .map(|(_, label)| text::extent(label, &styles.colorbar_tick).0)
                .max()
                .unwrap_or(0)
        } else {
            0
        };
        let cbar_pad = self.px(COLORBAR_PAD_PT);
        let cbar_w = self.px(COLORBAR_WIDTH_PT).max(1);

        // Edges are summed in u64 so oversized margins or pads fail the fit check
        let wide = u64::from;
        let title_block = title_extent.map_or(0, |(_, h)| wide(h) + wide(self.px(self.title_pad_points)));
        let margin = wide(self.margin);
        let left = margin + y_label_extent.map_or(0, |(w, _)| wide(w) + wide(label_pad)) + wide(y_tick_w) + wide(tick_pad);
        let top = margin + title_block;
        let bottom = margin
            + wide(tick_pad)
            + wide(x_tick_h)
            + x_label_extent.map_or(0, |(_, h)| wide(h) + wide(label_pad));
        let right = margin
            + if self.show_colorbar {
                wide(cbar_pad)
                    + wide(cbar_w)
                    + wide(tick_pad)
                    + wide(cbar_tick_w)
                    + cbar_label_extent.map_or(0, |(w, _)| wide(w) + wide(label_pad))
            } else {
                0
            };

        let too_small = left + right + self.cols as u64 > wide(self.width)
            || top + bottom + self.rows as u64 > wide(self.height);
        if too_small {
            return Err(Error::Rendering(format!(
                "canvas {}x{} too small for a {}x{} heatmap with labels",
                self.width, self.height, self.rows, self.cols
            )));
        }

        // Every edge now fits inside the canvas
        let narrow = |v: u64| v as u32;
        let plot = PixelRect::from_edges(
            narrow(left),
            narrow(top),
            self.width - narrow(right),
            self.height - narrow(bottom),
        );
        let center_x = |w: u32| plot.x as i32 + (plot.width as i32 - w as i32) / 2;
        let center_y = |h: u32| plot.y as i32 + (plot.height as i32 - h as i32) / 2;

        let colorbar = self
            .show_colorbar
            .then(|| PixelRect::new(plot.right() + cbar_pad, plot.y, cbar_w, plot.height));

        Ok(HeatmapLayout {
            plot,
            colorbar,
            title: title_extent.map(|(w, _)| (center_x(w), self.margin as i32)),
            x_label: x_label_extent.map(|(w, _)| {
                (center_x(w), (plot.bottom() + tick_pad + x_tick_h + label_pad) as i32)
            }),
            y_label: y_label_extent.map(|(_, h)| (self.margin as i32, center_y(h))),
            colorbar_label: colorbar.zip(cbar_label_extent).map(|(bar, (_, h))| {
                ((bar.right() + tick_pad + cbar_tick_w + label_pad) as i32, center_y(h))
            }),
            tick_pad,
        })
    }

    /// Pixel rectangle of one cell within a layout.
    #[must_use]
    pub fn cell_rect(&self, layout: &HeatmapLayout, row: usize, col: usize) -> PixelRect {
        let plot = layout.plot;
        let edge = |i: usize, n: usize, len: u32| -> u32 { ((i as u64 * u64::from(len)) / n as u64) as u32 };
        PixelRect::from_edges(
            plot.x + edge(col, self.cols, plot.width),
            plot.y + edge(row, self.rows, plot.height),
            plot.x + edge(col + 1, self.cols, plot.width),
            plot.y + edge(row + 1, self.rows, plot.height),
        )
    }

    /// Render the heatmap to a framebuffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout does not fit or the color scale is invalid.
    pub fn render(&self, fb: &mut Framebuffer) -> Result<()> {
        let layout = self.layout()?;
        let color_scale = self.create_color_scale()?;
        let styles = self.text_styles();
        let plot = layout.plot;

        fb.fill_rect(plot.x, plot.y, plot.width, plot.height, self.theme.panel_background);

        for row in 0..self.rows {
            for col in 0..self.cols {
                let value = self.data[row * self.cols + col];
                let cell = self.cell_rect(&layout, row, col);
                fb.fill_rect(cell.x, cell.y, cell.width, cell.height, color_scale.scale(value));
            }
        }

        if self.separators {
            self.draw_separators(fb, &layout);
        }

        self.draw_tick_labels(fb, &layout, &styles);

        if let (Some(title), Some((x, y))) = (self.title.as_deref(), layout.title) {
            text::draw_text(fb, x, y, title, &styles.title);
        }
        if let (Some(label), Some((x, y))) = (self.x_label.as_deref(), layout.x_label) {
            text::draw_text(fb, x, y, label, &styles.label);
        }
        if let (Some(label), Some((x, y))) = (self.y_label.as_deref(), layout.y_label) {
            text::draw_text(fb, x, y, label, &styles.vertical_label);
        }

        if let Some(bar) = layout.colorbar {
            self.draw_colorbar(fb, &layout, bar, &color_scale, &styles)?;
        }

        Ok(())
    }

    /// Draw lines between adjacent cells.
    fn draw_separators(&self, fb: &mut Framebuffer, layout: &HeatmapLayout) {
        let lw = self.px(self.separator_points).max(1);
        let plot = layout.plot;
        let half = lw / 2;

        for col in 1..self.cols {
            let x = self.cell_rect(layout, 0, col).x;
            fb.fill_rect(x.saturating_sub(half), plot.y, lw, plot.height, SEPARATOR_COLOR);
        }
        for row in 1..self.rows {
            let y = self.cell_rect(layout, row, 0).y;
            fb.fill_rect(plot.x, y.saturating_sub(half), plot.width, lw, SEPARATOR_COLOR);
        }
    }

    fn draw_tick_labels(&self, fb: &mut Framebuffer, layout: &HeatmapLayout, styles: &TextStyles) {
        let plot = layout.plot;
        let tick_len = self.px(self.theme.tick_length);
        let ink = self.theme.text_color;

        for (col, label) in self.col_labels.iter().enumerate() {
            let cell = self.cell_rect(layout, 0, col);
            let center = (cell.x + cell.width / 2) as i32;
            let (w, _) = text::extent(label, &styles.x_tick);
            let x = match self.x_ticks.align {
                HAlign::Left => center,
                HAlign::Center => center - w as i32 / 2,
                HAlign::Right => center - w as i32,
            };
            if tick_len > 0 {
                fb.fill_rect(center as u32, plot.bottom(), 1, tick_len, ink);
            }
            text::draw_text(fb, x, (plot.bottom() + layout.tick_pad) as i32, label, &styles.x_tick);
        }

        for (row, label) in self.row_labels.iter().enumerate() {
            let cell = self.cell_rect(layout, row, 0);
            let center = (cell.y + cell.height / 2) as i32;
            let (w, h) = text::extent(label, &styles.y_tick);
            if tick_len > 0 {
                fb.fill_rect(plot.x.saturating_sub(tick_len), center as u32, tick_len, 1, ink);
            }
            let x = plot.x as i32 - layout.tick_pad as i32 - w as i32;
            text::draw_text(fb, x, center - h as i32 / 2, label, &styles.y_tick);
        }
    }

    fn draw_colorbar(
        &self,
        fb: &mut Framebuffer,
        layout: &HeatmapLayout,
        bar: PixelRect,
        color_scale: &ColorScale,
        styles: &TextStyles,
    ) -> Result<()> {
        let (min, max) = self.data_extent();
        // Top row shows the maximum
        let to_y = LinearScale::new((min, max), ((bar.bottom() - 1) as f32, bar.y as f32))?;

        for y in bar.y..bar.bottom() {
            let value = to_y.invert(y as f32 + 0.5);
            fb.fill_rect(bar.x, y, bar.width, 1, color_scale.scale(value));
        }

        let tick_len = self.px(self.theme.tick_length);
        for (value, label) in self.colorbar_ticks() {
            let y = to_y.scale(value).round() as i32;
            if tick_len > 0 {
                fb.fill_rect(bar.right(), y as u32, tick_len, 1, self.theme.text_color);
            }
            let (_, h) = text::extent(&label, &styles.colorbar_tick);
            let x = (bar.right() + layout.tick_pad) as i32;
            text::draw_text(fb, x, y - h as i32 / 2, &label, &styles.colorbar_tick);
        }

        if let (Some(label), Some((x, y))) = (self.colorbar_label.as_deref(), layout.colorbar_label) {
            text::draw_text(fb, x, y, label, &styles.vertical_label);
        }

        Ok(())
    }

    /// Render to a new framebuffer cleared to the theme background.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn to_framebuffer(&self) -> Result<Framebuffer> {
        let mut fb = Framebuffer::new(self.width, self.height)?;
        fb.clear(self.theme.background);
        self.render(&mut fb)?;
        Ok(fb)
    }

    /// Background color the chart is drawn on.
    #[must_use]
    pub fn background(&self) -> Rgba {
        self.theme.background
    }

    /// Get the number of rows.
    #[must_use]
    pub const fn row_count(&self) -> usize {
        self.rows
    }

    /// Get the number of columns.
    #[must_use]
    pub const fn col_count(&self) -> usize {
        self.cols
    }
}

/// Format a tick value with just enough decimals for the tick step.
fn format_tick(value: f32, step: f32) -> String {
    let decimals = (0..=6)
        .find(|&d| {
            let scaled = step * 10f32.powi(d);
            (scaled - scaled.round()).abs() < 1e-3
        })
        .unwrap_or(6) as usize;
    format!("{value:.decimals$}")
}

//! End-to-end chart generation: synthesize, render, encode, write.

use crate::config::ChartConfig;
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::output::PngEncoder;
use crate::plots::{HAlign, Heatmap, TickLabelStyle};
use crate::synth::{self, EngagementTable, TableSummary};
use crate::text::Rotation;
use std::path::PathBuf;

const COMPONENT: &str = "pipeline";

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    /// File that was written.
    pub path: PathBuf,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Statistics of the plotted values.
    pub summary: TableSummary,
    /// Size of the encoded PNG.
    pub bytes: usize,
}

/// Configure a heatmap for `table` with days as rows and hours as columns.
///
/// # Errors
///
/// Returns an error if the figure size is invalid or the table is empty.
pub fn build_heatmap(table: &EngagementTable, config: &ChartConfig) -> Result<Heatmap> {
    let (width, height) = config.figure.pixel_size()?;
    let labels = &config.labels;

    Heatmap::new()
        .data(&table.transposed(), table.cols(), table.rows())
        .row_labels(table.day_labels().iter().cloned())
        .col_labels(table.hour_labels().iter().cloned())
        .palette(config.theme.palette)
        .theme(config.theme.to_theme())
        .dimensions(width, height)
        .dpi(config.figure.dpi)
        .margin(config.figure.margin_px())
        .separator_width(config.theme.separator_points)
        .title(labels.title.as_str(), labels.title_pad)
        .x_label(labels.x_label.as_str())
        .y_label(labels.y_label.as_str())
        .colorbar_label(labels.colorbar_label.as_str())
        .x_tick_labels(TickLabelStyle {
            points: Some(labels.x_tick_points),
            rotation: Rotation::Deg45,
            align: HAlign::Right,
        })
        .y_tick_labels(TickLabelStyle {
            points: Some(labels.y_tick_points),
            rotation: Rotation::None,
            align: HAlign::Center,
        })
        .build()
}

/// Render `table` and apply the figure's layout policy.
///
/// # Errors
///
/// Returns an error if the heatmap cannot be laid out or cropped.
pub fn render_chart(table: &EngagementTable, config: &ChartConfig) -> Result<Framebuffer> {
    crate::time_scope!(COMPONENT, "render_chart");

    let heatmap = build_heatmap(table, config)?;
    let fb = heatmap.to_framebuffer()?;
    crate::debug!(
        COMPONENT,
        "{}x{} cells on a {}x{} canvas (backend {:?})",
        heatmap.row_count(),
        heatmap.col_count(),
        fb.width(),
        fb.height(),
        Framebuffer::backend()
    );

    config.figure.finish(fb, heatmap.background())
}

/// Run the whole pipeline and write the PNG to `config.output`.
///
/// An existing file at the output path is replaced.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, rendering fails or
/// the file cannot be written.
pub fn run(config: &ChartConfig) -> Result<RenderReport> {
    crate::time_scope!(COMPONENT, "run");
    config.validate()?;

    let table = synth::synthesize(&config.synthesis)?;
    let summary = table.summary();
    crate::info!(
        COMPONENT,
        "synthesized {}x{} table (seed {}): min {:.1} max {:.1} mean {:.1}",
        table.rows(),
        table.cols(),
        config.synthesis.seed,
        summary.min,
        summary.max,
        summary.mean
    );

    let fb = render_chart(&table, config)?;
    PngEncoder::new().dpi(config.figure.dpi).write_to_file(&fb, &config.output)?;
    let bytes = std::fs::metadata(&config.output)?.len() as usize;
    crate::info!(COMPONENT, "wrote {} ({} bytes)", config.output.display(), bytes);

    Ok(RenderReport {
        path: config.output.clone(),
        width: fb.width(),
        height: fb.height(),
        summary,
        bytes,
    })
}

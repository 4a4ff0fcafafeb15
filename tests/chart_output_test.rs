//! End-to-end chart output tests.
//!
//! Each test runs the full pipeline into a temporary directory and checks
//! the written PNG.
//!
//! Run: cargo test --test chart_output_test

#![allow(clippy::unwrap_used, missing_docs)]

use std::fs;
use std::io::Cursor;
use std::path::Path;

use engagement_heatmap::config::ChartConfig;
use engagement_heatmap::figure::LayoutPolicy;
use engagement_heatmap::pipeline::{self, build_heatmap, render_chart};
use engagement_heatmap::synth::{self, DAYS_PER_WEEK, HOURS_PER_DAY};

fn config_in(dir: &Path) -> ChartConfig {
    ChartConfig { output: dir.join("chart.png"), ..ChartConfig::default() }
}

/// Decode a PNG file into (width, height, pixels-per-meter, rgba bytes).
fn decode(path: &Path) -> (u32, u32, Option<u32>, Vec<u8>) {
    let bytes = fs::read(path).unwrap();
    let mut reader = png::Decoder::new(Cursor::new(bytes)).read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf).unwrap();
    buf.truncate(frame.buffer_size());
    let info = reader.info();
    (info.width, info.height, info.pixel_dims.map(|d| d.xppu), buf)
}

#[test]
fn default_run_writes_512_square_png() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let report = pipeline::run(&config).unwrap();
    let (width, height, ppm, pixels) = decode(&report.path);

    assert_eq!((width, height), (512, 512));
    assert_eq!((report.width, report.height), (512, 512));
    // 64 dpi
    assert_eq!(ppm, Some(2520));
    assert_eq!(pixels.len(), 512 * 512 * 4);
    // Corners are figure background
    assert_eq!(&pixels[0..4], &[255, 255, 255, 255]);
}

#[test]
fn repeated_runs_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let first = config_in(dir.path());
    let second = ChartConfig { output: dir.path().join("again.png"), ..first.clone() };

    pipeline::run(&first).unwrap();
    pipeline::run(&second).unwrap();

    assert_eq!(fs::read(&first.output).unwrap(), fs::read(&second.output).unwrap());
}

#[test]
fn existing_output_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::write(&config.output, vec![0u8; 4_000_000]).unwrap();

    let report = pipeline::run(&config).unwrap();
    assert_eq!(fs::metadata(&config.output).unwrap().len() as usize, report.bytes);
}

#[test]
fn different_seed_changes_image() {
    let dir = tempfile::tempdir().unwrap();
    let base = config_in(dir.path());
    let mut other = ChartConfig { output: dir.path().join("seed7.png"), ..base.clone() };
    other.synthesis.seed = 7;

    pipeline::run(&base).unwrap();
    pipeline::run(&other).unwrap();

    assert_ne!(fs::read(&base.output).unwrap(), fs::read(&other.output).unwrap());
}

#[test]
fn content_fit_crop_keeps_padding() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.figure.layout = LayoutPolicy::ContentFitCrop { pad_inches: 0.1 };

    let report = pipeline::run(&config).unwrap();
    let (width, height, _, pixels) = decode(&report.path);

    assert!(width <= 512 && height <= 512);

    // The outermost 6px (0.1in at 64dpi) ring is background
    let pad = 6usize;
    let w = width as usize;
    for y in 0..height as usize {
        for x in 0..w {
            let inside_pad = x < pad || y < pad || x >= w - pad || y >= height as usize - pad;
            if inside_pad {
                let i = (y * w + x) * 4;
                assert_eq!(&pixels[i..i + 4], &[255, 255, 255, 255], "ink at ({x},{y})");
            }
        }
    }
}

#[test]
fn darker_cells_have_higher_values() {
    let config = ChartConfig::default();
    let table = synth::synthesize(&config.synthesis).unwrap();
    let heatmap = build_heatmap(&table, &config).unwrap();
    let layout = heatmap.layout().unwrap();
    let fb = render_chart(&table, &config).unwrap();

    // (value, luminance) for every cell, read at the cell center
    let mut cells = Vec::new();
    for day in 0..DAYS_PER_WEEK {
        for hour in 0..HOURS_PER_DAY {
            let rect = heatmap.cell_rect(&layout, day, hour);
            let color = fb.get_pixel(rect.x + rect.width / 2, rect.y + rect.height / 2).unwrap();
            cells.push((table.value(hour, day).unwrap(), color.luminance()));
        }
    }

    for &(v1, l1) in &cells {
        for &(v2, l2) in &cells {
            if v1 > v2 + 100.0 {
                assert!(l1 < l2, "value {v1:.1} (lum {l1:.1}) not darker than {v2:.1} (lum {l2:.1})");
            }
        }
    }
}

#[test]
fn chart_has_text_outside_the_grid() {
    let config = ChartConfig::default();
    let table = synth::synthesize(&config.synthesis).unwrap();
    let heatmap = build_heatmap(&table, &config).unwrap();
    let layout = heatmap.layout().unwrap();
    let fb = render_chart(&table, &config).unwrap();

    let text = config.theme.to_theme().text_color;
    let count_ink = |x0: u32, y0: u32, x1: u32, y1: u32| {
        (y0..y1).flat_map(|y| (x0..x1).map(move |x| (x, y))).filter(|&(x, y)| fb.get_pixel(x, y) == Some(text)).count()
    };

    let plot = layout.plot;
    // Title band, hour labels band, day labels band
    assert!(count_ink(0, 0, 512, plot.y) > 0);
    assert!(count_ink(0, plot.bottom(), 512, 512) > 0);
    assert!(count_ink(0, plot.y, plot.x, plot.bottom()) > 0);
    // Nothing but cells and separators inside the grid
    assert_eq!(count_ink(plot.x, plot.y, plot.right(), plot.bottom()), 0);
}

#[test]
fn invalid_output_directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = ChartConfig { output: dir.path().join("missing/dir/chart.png"), ..ChartConfig::default() };

    let err = pipeline::run(&config).unwrap_err();
    assert!(matches!(err, engagement_heatmap::Error::Io(_)));
}

#[test]
fn yaml_config_drives_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("chart.yaml");
    let output = dir.path().join("small.png");
    fs::write(
        &config_path,
        format!(
            "output: {}\nfigure:\n  width_in: 6.0\n  height_in: 5.0\n  dpi: 100\ntheme:\n  style: ticks\n  palette: viridis\n",
            output.display()
        ),
    )
    .unwrap();

    let config = ChartConfig::load(&config_path).unwrap();
    let report = pipeline::run(&config).unwrap();
    assert_eq!((report.width, report.height), (600, 500));

    let (_, _, ppm, _) = decode(&output);
    assert_eq!(ppm, Some(3937));
}

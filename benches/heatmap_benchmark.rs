#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]
//! Benchmark for synthesis, heatmap rendering and PNG encoding.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use engagement_heatmap::pipeline::render_chart;
use engagement_heatmap::prelude::*;

fn synthesis_benchmark(c: &mut Criterion) {
    c.bench_function("synthesize_seed_42", |b| {
        let params = SynthesisParams::default();
        b.iter(|| synthesize(black_box(&params)).expect("synthesis should succeed"));
    });
}

fn render_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_chart");
    let table = synthesize(&SynthesisParams::default()).expect("synthesis should succeed");

    for dpi in [64, 100, 150] {
        let mut config = ChartConfig::default();
        config.figure.dpi = dpi;

        group.bench_with_input(BenchmarkId::from_parameter(format!("{dpi}dpi")), &config, |b, config| {
            b.iter(|| render_chart(black_box(&table), config).expect("render should succeed"));
        });
    }

    group.finish();
}

fn palette_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("heatmap_palette");
    let table = synthesize(&SynthesisParams::default()).expect("synthesis should succeed");

    for palette in [HeatmapPalette::RocketR, HeatmapPalette::Viridis, HeatmapPalette::Greyscale] {
        let mut config = ChartConfig::default();
        config.theme.palette = palette;

        group.bench_with_input(BenchmarkId::from_parameter(format!("{palette:?}")), &config, |b, config| {
            b.iter(|| render_chart(black_box(&table), config).expect("render should succeed"));
        });
    }

    group.finish();
}

fn encode_benchmark(c: &mut Criterion) {
    let config = ChartConfig::default();
    let table = synthesize(&config.synthesis).expect("synthesis should succeed");
    let fb = render_chart(&table, &config).expect("render should succeed");
    let encoder = PngEncoder::new().dpi(config.figure.dpi);

    c.bench_function("png_encode_512", |b| {
        b.iter(|| {
            let mut bytes = Vec::new();
            encoder.encode(black_box(&fb), &mut bytes).expect("encoding should succeed");
            bytes
        });
    });
}

criterion_group!(benches, synthesis_benchmark, render_benchmark, palette_benchmark, encode_benchmark);
criterion_main!(benches);

//! engagement-heatmap: render the synthetic hourly engagement heatmap.
//!
//! Run: `engagement-heatmap` (writes `chart.png` in the working directory)

#![cfg_attr(test, allow(clippy::unwrap_used))]

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use engagement_heatmap::config::ChartConfig;
use engagement_heatmap::figure::LayoutPolicy;
use engagement_heatmap::{debug, pipeline, synth};
use std::path::PathBuf;

/// Output size policy selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Layout {
    /// Exactly width x height pixels
    Exact,
    /// Crop to the drawn content plus a small pad
    Fit,
}

/// Render a heatmap of synthetic hourly engagement by weekday.
#[derive(Parser, Debug)]
#[command(name = "engagement-heatmap")]
#[command(author = "PAIML Team")]
#[command(version)]
#[command(about = "Render a synthetic hourly engagement heatmap to PNG", long_about = None)]
struct Cli {
    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output PNG path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Noise generator seed
    #[arg(long)]
    seed: Option<u64>,

    /// Output size policy
    #[arg(long, value_enum)]
    layout: Option<Layout>,

    /// Also print the data table as CSV to stdout
    #[arg(long)]
    dump_csv: bool,

    /// Enable debug logging to stderr
    #[arg(long)]
    debug: bool,
}

impl Cli {
    /// Load the config file (if any) and apply flag overrides.
    fn resolve_config(&self) -> Result<ChartConfig> {
        let mut config = match &self.config {
            Some(path) => ChartConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ChartConfig::default(),
        };

        if let Some(output) = &self.output {
            config.output.clone_from(output);
        }
        if let Some(seed) = self.seed {
            config.synthesis.seed = seed;
        }
        match self.layout {
            Some(Layout::Exact) => config.figure.layout = LayoutPolicy::ExactPixel,
            Some(Layout::Fit) if !matches!(config.figure.layout, LayoutPolicy::ContentFitCrop { .. }) => {
                config.figure.layout = LayoutPolicy::ContentFitCrop { pad_inches: 0.1 };
            }
            _ => {}
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    debug::init(cli.debug);

    let config = cli.resolve_config()?;
    engagement_heatmap::debug!("main", "resolved config: {config:?}");

    if cli.dump_csv {
        let table = synth::synthesize(&config.synthesis).context("synthesizing data")?;
        print!("{}", table.to_csv());
    }

    let report = pipeline::run(&config)
        .with_context(|| format!("rendering {}", config.output.display()))?;
    println!("Saved chart to {} ({}x{})", report.path.display(), report.width, report.height);

    Ok(())
}

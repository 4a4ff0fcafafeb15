//! Synthetic hourly engagement data.
//!
//! A hand-authored 24x7 table of baseline engagement ratios (hours by
//! weekday) is perturbed with seeded Gaussian noise, floored at zero and
//! scaled to "visits per 1000 users".
//!
//! The generator is always passed in explicitly; nothing here touches a
//! process-wide RNG. [`synthesize`] seeds a `ChaCha8Rng`, whose output
//! stream is fixed across platforms and releases, so a given seed always
//! yields the same table.

use crate::error::{Error, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use trueno::Vector;

/// Rows in the table, one per hour.
pub const HOURS_PER_DAY: usize = 24;

/// Columns in the table, one per weekday.
pub const DAYS_PER_WEEK: usize = 7;

/// Weekday labels, Monday first.
pub const DAYS: [&str; DAYS_PER_WEEK] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Default generator seed.
pub const DEFAULT_SEED: u64 = 42;

/// Default standard deviation of the additive noise.
pub const DEFAULT_NOISE_STD: f64 = 0.03;

/// Default multiplier from ratio to visits per 1000 users.
pub const DEFAULT_SCALE: f64 = 1200.0;

/// Baseline engagement ratio per (hour, weekday).
#[rustfmt::skip]
pub const BASE_ENGAGEMENT: [[f64; DAYS_PER_WEEK]; HOURS_PER_DAY] = [
    [0.20, 0.25, 0.30, 0.35, 0.50, 0.60, 0.55],
    [0.15, 0.18, 0.20, 0.25, 0.35, 0.45, 0.40],
    [0.10, 0.12, 0.15, 0.18, 0.25, 0.30, 0.28],
    [0.08, 0.09, 0.12, 0.14, 0.18, 0.22, 0.20],
    [0.07, 0.08, 0.09, 0.11, 0.14, 0.18, 0.16],
    [0.06, 0.07, 0.08, 0.09, 0.12, 0.15, 0.13],
    [0.08, 0.10, 0.12, 0.15, 0.20, 0.28, 0.25],
    [0.12, 0.15, 0.18, 0.22, 0.32, 0.42, 0.38],
    [0.20, 0.25, 0.35, 0.45, 0.60, 0.70, 0.62],
    [0.30, 0.35, 0.45, 0.60, 0.80, 0.85, 0.75],
    [0.40, 0.45, 0.55, 0.70, 0.90, 0.95, 0.85],
    [0.50, 0.55, 0.65, 0.80, 1.00, 1.05, 0.95],
    [0.55, 0.60, 0.70, 0.85, 1.10, 1.15, 1.00],
    [0.50, 0.55, 0.65, 0.80, 1.05, 1.10, 0.95],
    [0.45, 0.50, 0.60, 0.75, 0.95, 1.00, 0.85],
    [0.40, 0.45, 0.55, 0.70, 0.85, 0.90, 0.78],
    [0.38, 0.42, 0.50, 0.62, 0.78, 0.82, 0.70],
    [0.35, 0.40, 0.48, 0.60, 0.75, 0.80, 0.68],
    [0.33, 0.38, 0.45, 0.55, 0.70, 0.76, 0.65],
    [0.28, 0.32, 0.38, 0.45, 0.60, 0.68, 0.58],
    [0.22, 0.25, 0.30, 0.35, 0.45, 0.52, 0.45],
    [0.18, 0.20, 0.22, 0.28, 0.35, 0.42, 0.35],
    [0.15, 0.17, 0.18, 0.20, 0.25, 0.30, 0.27],
    [0.12, 0.14, 0.15, 0.16, 0.20, 0.24, 0.22],
];

/// Hour labels `"00:00"` through `"23:00"`.
#[must_use]
pub fn hour_labels() -> Vec<String> {
    (0..HOURS_PER_DAY).map(|h| format!("{h:02}:00")).collect()
}

/// Parameters of the synthesis step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisParams {
    /// Generator seed.
    pub seed: u64,
    /// Standard deviation of the zero-mean Gaussian noise.
    pub noise_std: f64,
    /// Multiplier applied after clipping.
    pub scale: f64,
}

impl Default for SynthesisParams {
    fn default() -> Self {
        Self { seed: DEFAULT_SEED, noise_std: DEFAULT_NOISE_STD, scale: DEFAULT_SCALE }
    }
}

impl SynthesisParams {
    /// Reject parameters that would break the non-negativity of the table.
    ///
    /// # Errors
    ///
    /// Returns an error if `noise_std` or `scale` is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        if !self.noise_std.is_finite() || self.noise_std < 0.0 {
            return Err(Error::InvalidParameter {
                name: "noise_std",
                message: format!("must be a finite value >= 0, got {}", self.noise_std),
            });
        }
        if !self.scale.is_finite() || self.scale < 0.0 {
            return Err(Error::InvalidParameter {
                name: "scale",
                message: format!("must be a finite value >= 0, got {}", self.scale),
            });
        }
        Ok(())
    }
}

/// Additive noise, one draw per (hour, weekday).
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseMatrix {
    values: [[f64; DAYS_PER_WEEK]; HOURS_PER_DAY],
}

impl NoiseMatrix {
    /// All-zero noise.
    #[must_use]
    pub const fn zeros() -> Self {
        Self { values: [[0.0; DAYS_PER_WEEK]; HOURS_PER_DAY] }
    }

    /// Draw from `Normal(0, std)` in row-major order (hour, then weekday).
    pub fn sample<R: Rng + ?Sized>(rng: &mut R, std: f64) -> Result<Self> {
        let normal = Normal::new(0.0, std).map_err(|e| Error::InvalidParameter {
            name: "noise_std",
            message: e.to_string(),
        })?;

        let mut values = [[0.0; DAYS_PER_WEEK]; HOURS_PER_DAY];
        for row in &mut values {
            for cell in row.iter_mut() {
                *cell = normal.sample(rng);
            }
        }
        Ok(Self { values })
    }
}

/// Min, max and mean of the table, computed with SIMD reductions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableSummary {
    /// Smallest cell.
    pub min: f32,
    /// Largest cell.
    pub max: f32,
    /// Mean over all cells.
    pub mean: f32,
}

/// Engagement in visits per 1000 users, indexed by hour and weekday.
#[derive(Debug, Clone, PartialEq)]
pub struct EngagementTable {
    /// Row-major, `HOURS_PER_DAY` rows of `DAYS_PER_WEEK` cells.
    values: Vec<f64>,
    hour_labels: Vec<String>,
    day_labels: Vec<String>,
}

impl EngagementTable {
    /// Combine base and noise: `max(0, base + noise) * scale` per cell.
    #[must_use]
    pub fn from_parts(
        base: &[[f64; DAYS_PER_WEEK]; HOURS_PER_DAY],
        noise: &NoiseMatrix,
        scale: f64,
    ) -> Self {
        let values = base
            .iter()
            .zip(noise.values.iter())
            .flat_map(|(b, n)| b.iter().zip(n.iter()).map(|(b, n)| (b + n).max(0.0) * scale))
            .collect();

        Self {
            values,
            hour_labels: hour_labels(),
            day_labels: DAYS.iter().map(|d| (*d).to_string()).collect(),
        }
    }

    /// Number of rows (hours).
    #[must_use]
    pub fn rows(&self) -> usize {
        self.hour_labels.len()
    }

    /// Number of columns (weekdays).
    #[must_use]
    pub fn cols(&self) -> usize {
        self.day_labels.len()
    }

    /// Row labels.
    #[must_use]
    pub fn hour_labels(&self) -> &[String] {
        &self.hour_labels
    }

    /// Column labels.
    #[must_use]
    pub fn day_labels(&self) -> &[String] {
        &self.day_labels
    }

    /// All cells, row-major.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Cell by position.
    #[must_use]
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        self.values.get(row * self.cols() + col).copied()
    }

    /// Cell by label, e.g. `get("00:00", "Mon")`.
    #[must_use]
    pub fn get(&self, hour: &str, day: &str) -> Option<f64> {
        let row = self.hour_labels.iter().position(|h| h == hour)?;
        let col = self.day_labels.iter().position(|d| d == day)?;
        self.value(row, col)
    }

    /// Days-as-rows copy (7x24, row-major) for day-versus-hour plotting.
    #[must_use]
    pub fn transposed(&self) -> Vec<f32> {
        let (rows, cols) = (self.rows(), self.cols());
        let mut out = Vec::with_capacity(self.values.len());
        for col in 0..cols {
            for row in 0..rows {
                out.push(self.values[row * cols + col] as f32);
            }
        }
        out
    }

    /// Summary statistics over every cell.
    #[must_use]
    pub fn summary(&self) -> TableSummary {
        let vec = Vector::from_vec(self.values.iter().map(|&v| v as f32).collect());
        TableSummary {
            min: vec.min().unwrap_or(0.0),
            max: vec.max().unwrap_or(0.0),
            mean: vec.mean().unwrap_or(0.0),
        }
    }

    /// CSV rendering: header `hour,Mon,...,Sun`, one line per hour.
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut out = String::from("hour");
        for day in &self.day_labels {
            out.push(',');
            out.push_str(day);
        }
        out.push('\n');

        for (row, hour) in self.hour_labels.iter().enumerate() {
            out.push_str(hour);
            for col in 0..self.cols() {
                let v = self.values[row * self.cols() + col];
                let _ = write!(out, ",{v:.3}");
            }
            out.push('\n');
        }
        out
    }
}

/// Build the engagement table from a fresh generator seeded with `params.seed`.
pub fn synthesize(params: &SynthesisParams) -> Result<EngagementTable> {
    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
    synthesize_with_rng(&mut rng, params)
}

/// Build the engagement table drawing noise from a caller-owned generator.
///
/// `params.seed` is ignored here; the generator's state decides the noise.
pub fn synthesize_with_rng<R: Rng + ?Sized>(
    rng: &mut R,
    params: &SynthesisParams,
) -> Result<EngagementTable> {
    params.validate()?;
    let noise = NoiseMatrix::sample(rng, params.noise_std)?;
    Ok(EngagementTable::from_parts(&BASE_ENGAGEMENT, &noise, params.scale))
}

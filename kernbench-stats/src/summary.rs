//! Summary Statistics
//!
//! Reduces a trimmed [`SampleSet`] to count, extremes, mean and standard
//! deviation. Moments are accumulated in a single pass.

use crate::StatsError;
use crate::samples::SampleSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Summary of one sampling run, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Number of retained (post-trim) samples
    #[serde(rename = "num_samples")]
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub standard_deviation: f64,
}

/// Compute summary statistics over a sorted, trimmed sample set.
///
/// The standard deviation is the two-moment estimate scaled by
/// `n / (n - 1)`. At least two samples are required.
pub fn summarize(samples: &SampleSet) -> Result<SummaryStatistics, StatsError> {
    let (min, max) = match (samples.first(), samples.last()) {
        (Some(min), Some(max)) if samples.len() > 1 => (min, max),
        _ => {
            return Err(StatsError::InsufficientSamples {
                count: samples.len(),
            });
        }
    };

    let mut m0 = 0usize;
    let mut m1 = 0.0f64;
    let mut m2 = 0.0f64;
    for &x in samples.as_slice() {
        m0 += 1;
        m1 += x;
        m2 += x * x;
    }

    let n = m0 as f64;
    let mean = m1 / n;
    // Rounding can push the variance of identical samples just below zero.
    let variance = (m2 / n - mean * mean).max(0.0);
    let standard_deviation = variance.sqrt() * n / (n - 1.0);

    Ok(SummaryStatistics {
        count: m0,
        min,
        max,
        mean: mean.clamp(min, max),
        standard_deviation,
    })
}

impl SummaryStatistics {
    /// Divide every duration by `factor`, e.g. an element count, to get a
    /// per-unit cost. The count is unchanged.
    pub fn scale(&self, factor: f64) -> Result<Self, StatsError> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(StatsError::InvalidScaleFactor(factor));
        }
        Ok(Self {
            count: self.count,
            min: self.min / factor,
            max: self.max / factor,
            mean: self.mean / factor,
            standard_deviation: self.standard_deviation / factor,
        })
    }

    /// Coefficient of variation (relative stddev, percent)
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            (self.standard_deviation / self.mean) * 100.0
        }
    }
}

/// Format seconds as a fixed-width nanosecond figure
pub fn format_ns(elapsed: f64) -> String {
    format!("{:>12.2} ns", elapsed * 1e9)
}

impl fmt::Display for SummaryStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={:>4} ({:>12.2} ± {:>11.3}) ns",
            self.count,
            self.mean * 1e9,
            self.standard_deviation * 1e9
        )
    }
}

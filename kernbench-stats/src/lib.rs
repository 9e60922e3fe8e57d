#![warn(missing_docs)]
//! KernBench Statistical Engine
//!
//! Reduces raw timing samples to summary statistics:
//! - Sorted-by-construction sample sets
//! - Symmetric trimming (fixed count or fraction of the run)
//! - Single-pass moments: count, min, max, mean, standard deviation
//! - Per-unit scaling of a summary (e.g. per element)

mod samples;
mod summary;

pub use samples::{SampleSet, TrimPolicy};
pub use summary::{SummaryStatistics, format_ns, summarize};

use thiserror::Error;

/// Errors raised while trimming or summarizing samples
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum StatsError {
    /// Fewer than two samples remain, so the standard deviation is undefined.
    #[error("insufficient samples: {count} retained, need at least 2")]
    InsufficientSamples {
        /// Samples left after trimming
        count: usize,
    },

    /// Trimming would discard every sample.
    #[error("cannot discard {per_side} samples from each end of {total}")]
    TrimExceedsSamples {
        /// Samples discarded from each end
        per_side: usize,
        /// Samples before trimming
        total: usize,
    },

    /// Scale factors must be finite and positive.
    #[error("invalid scale factor: {0} (must be > 0)")]
    InvalidScaleFactor(f64),

    /// Discard fractions must lie in `[0, 1)`.
    #[error("invalid discard fraction: {0} (must be in [0, 1))")]
    InvalidDiscardFraction(f64),

    /// A NaN or infinite sample was supplied.
    #[error("non-finite sample: {0}")]
    NonFiniteSample(f64),
}

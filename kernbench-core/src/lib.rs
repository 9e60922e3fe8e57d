#![warn(missing_docs)]
//! KernBench Core - Measurement Engine
//!
//! This crate provides the sampling side of a benchmark run:
//! - `time_once` for timing a single invocation behind a no-inline boundary
//! - `CacheThrasher` for evicting cache state between samples
//! - `Sampler` with fixed-count and time-budgeted stop conditions
//!
//! The engine is single-threaded. A `CacheThrasher` is borrowed mutably by
//! the sampler that uses it, so two runs can never sweep it concurrently.

mod measure;
mod sampler;
mod thrash;

pub use measure::{Elapsed, Timer, time_diff, time_once, time_since, try_time_once};
pub use sampler::{MAX_SAMPLES, Sampler, SetupHook, StopCondition};
pub use thrash::{CacheThrasher, expected_checksum};

pub use kernbench_stats::{SampleSet, StatsError, SummaryStatistics, TrimPolicy, summarize};

use std::convert::Infallible;
use thiserror::Error;

/// Fatal conditions raised by the measurement engine
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BenchError {
    /// A sampler was configured with values outside their valid range.
    #[error("invalid sampler configuration: {0}")]
    InvalidConfig(String),

    /// The thrash buffer could not grow to the requested size.
    #[error("failed to allocate {requested} bytes of cache thrash scratch space")]
    ScratchAllocation {
        /// Requested buffer size in bytes
        requested: usize,
    },

    /// The thrash read pass did not match what was written.
    #[error("cache thrash checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Closed-form checksum of the write pattern
        expected: u64,
        /// Checksum observed on the read pass
        actual: u64,
    },

    /// Trimming or summarizing failed.
    #[error(transparent)]
    Stats(#[from] StatsError),
}

/// Failure of a run over a fallible operation
#[derive(Debug, Error)]
pub enum RunError<E> {
    /// The operation under test returned an error; it was not measured.
    #[error("operation failed: {0}")]
    Operation(E),

    /// The engine itself failed.
    #[error(transparent)]
    Bench(#[from] BenchError),
}

impl RunError<Infallible> {
    /// Unwrap the engine error of a run whose operation cannot fail
    pub fn into_bench_error(self) -> BenchError {
        match self {
            RunError::Bench(err) => err,
            RunError::Operation(never) => match never {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_error_converts() {
        let err: BenchError = StatsError::InsufficientSamples { count: 0 }.into();
        assert!(matches!(err, BenchError::Stats(_)));
        assert_eq!(
            err.to_string(),
            "insufficient samples: 0 retained, need at least 2"
        );
    }

    #[test]
    fn test_run_error_display() {
        let err: RunError<&str> = RunError::Operation("disk full");
        assert_eq!(err.to_string(), "operation failed: disk full");

        let err: RunError<&str> = BenchError::InvalidConfig("bad".into()).into();
        assert_eq!(err.to_string(), "invalid sampler configuration: bad");
    }
}

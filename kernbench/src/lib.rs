#![warn(missing_docs)]
//! # KernBench
//!
//! Microbenchmark measurement engine for numeric kernels.
//!
//! KernBench times repeated invocations of an operation and reduces the
//! samples to robust summary statistics:
//! - **Single-Invocation Timing**: no-inline boundary, monotonic clock, `f64` seconds
//! - **Cold Caches**: an owned `CacheThrasher` sweeps a scratch buffer before each sample
//! - **Two Policies**: fixed sample count, or a time budget capped at 1024 samples
//! - **Trimming**: symmetric discard by count or fraction before summarizing
//! - **Per-Unit Cost**: scale a summary by an element count
//!
//! ## Quick Start
//!
//! ```ignore
//! use kernbench::prelude::*;
//!
//! let (a, b) = (vec![1.0; 4096], vec![2.0; 4096]);
//! let mut thrasher = CacheThrasher::new();
//! let mut sampler = Sampler::fixed_count(16, 2)?.with_cache_thrash(&mut thrasher, 64 << 20);
//! let stats = sampler.run(|| kernbench::dot(&a, &b))?;
//! println!("{} || {}", stats, stats.scale(4096.0)?);
//! ```
//!
//! ## Time Budget
//!
//! ```ignore
//! let mut sampler = Sampler::time_budget(Duration::from_secs(1), 0.1)?;
//! let stats = sampler.run(|| expensive_operation())?;
//! ```

// Re-export core types
pub use kernbench_core::{
    BenchError, CacheThrasher, Elapsed, MAX_SAMPLES, RunError, Sampler, SetupHook, StopCondition,
    Timer, expected_checksum, time_diff, time_once, time_since, try_time_once,
};

// Re-export stats
pub use kernbench_stats::{
    SampleSet, StatsError, SummaryStatistics, TrimPolicy, format_ns, summarize,
};

// Re-export reporting
pub use kernbench_report::{
    OutputFormat, Report, ReportConfig, SweepResult, TimingMetrics, format_human_output,
    generate_json_report,
};

// Re-export kernels and parsers
pub use kernbench_cli::{
    SamplerSettings, SweepRunner, distribution, doubling_lengths, dot, dot_inputs,
    linear_combination, linear_combination_inputs, parse_size,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BenchError, CacheThrasher, Sampler, SummaryStatistics, TrimPolicy, summarize, time_once,
    };
}

/// Run the KernBench CLI harness.
///
/// Call this from a binary's `main()`:
/// ```ignore
/// fn main() {
///     kernbench::run().unwrap();
/// }
/// ```
pub use kernbench_cli::run;

//! Size Sweeps
//!
//! Runs a kernel at lengths doubling from a minimum to a maximum, one
//! sampler run per length, and collects the results into a [`Report`].
//!
//! The [`SweepRunner`] owns the [`CacheThrasher`] for the whole session, so
//! the scratch buffer is allocated once and reused by every point.

use indicatif::{ProgressBar, ProgressStyle};
use kernbench_core::{BenchError, CacheThrasher, Elapsed, Sampler};
use kernbench_report::{Report, ReportConfig, SweepResult};
use std::time::{Duration, Instant};

/// Sampling settings shared by every point of a sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SamplerSettings {
    /// Exactly `samples` samples, `discard` dropped from each end
    Fixed {
        /// Samples per point
        samples: usize,
        /// Samples discarded from each end
        discard: usize,
    },
    /// Sample for `time_budget`, dropping `discard_fraction` of the run
    Budget {
        /// Wall-clock budget per point
        time_budget: Duration,
        /// Fraction discarded, half from each end
        discard_fraction: f64,
    },
}

impl SamplerSettings {
    /// Build a sampler, thrashing `thrash_bytes` before every sample when
    /// non-zero
    pub fn sampler<'a>(
        &self,
        thrasher: &'a mut CacheThrasher,
        thrash_bytes: usize,
    ) -> Result<Sampler<'a>, BenchError> {
        let sampler = match *self {
            SamplerSettings::Fixed { samples, discard } => Sampler::fixed_count(samples, discard)?,
            SamplerSettings::Budget {
                time_budget,
                discard_fraction,
            } => Sampler::time_budget(time_budget, discard_fraction)?,
        };
        Ok(if thrash_bytes > 0 {
            sampler.with_cache_thrash(thrasher, thrash_bytes)
        } else {
            sampler
        })
    }

    /// Configuration as recorded in the report
    pub fn report_config(&self, thrash_bytes: usize) -> ReportConfig {
        match *self {
            SamplerSettings::Fixed { samples, discard } => ReportConfig::Fixed {
                samples,
                discard,
                thrash_bytes,
            },
            SamplerSettings::Budget {
                time_budget,
                discard_fraction,
            } => ReportConfig::Budget {
                time_budget_secs: time_budget.as_secs_f64(),
                discard_fraction,
                thrash_bytes,
            },
        }
    }
}

/// Lengths `min, 2*min, 4*min, ...` up to and including `max`
pub fn doubling_lengths(min: usize, max: usize) -> Vec<usize> {
    let mut lengths = Vec::new();
    let mut len = min.max(1);
    while len <= max {
        lengths.push(len);
        match len.checked_mul(2) {
            Some(next) => len = next,
            None => break,
        }
    }
    lengths
}

/// Runs sweeps with a session-wide cache thrasher
pub struct SweepRunner {
    settings: SamplerSettings,
    thrash_bytes: usize,
    thrasher: CacheThrasher,
    show_progress: bool,
}

impl SweepRunner {
    /// Create a runner
    pub fn new(settings: SamplerSettings, thrash_bytes: usize) -> Self {
        Self {
            settings,
            thrash_bytes,
            thrasher: CacheThrasher::new(),
            show_progress: false,
        }
    }

    /// Show a progress bar on stderr while sweeping
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Sampling settings of this runner
    pub fn settings(&self) -> SamplerSettings {
        self.settings
    }

    /// Measure `op(len)` for every length and assemble a report.
    ///
    /// `bytes_per_element` sizes the footprint recorded for each point.
    pub fn run<T, F>(
        &mut self,
        kernel: &str,
        lengths: &[usize],
        bytes_per_element: u64,
        mut op: F,
    ) -> Result<Report, BenchError>
    where
        F: FnMut(usize) -> T,
    {
        let start = Instant::now();
        let pb = ClearOnDrop(self.progress_bar(lengths.len()));
        let mut results = Vec::with_capacity(lengths.len());

        for &len in lengths {
            pb.0.set_message(format!("{kernel} n={len}"));
            let mut sampler = self.settings.sampler(&mut self.thrasher, self.thrash_bytes)?;
            let stats = sampler.run(|| op(len))?;
            tracing::debug!(kernel, len, count = stats.count, mean = stats.mean, "measured point");

            let elements = len as u64;
            results.push(SweepResult::new(
                elements,
                elements.saturating_mul(bytes_per_element),
                &stats,
            ));
            pb.0.inc(1);
        }
        drop(pb);

        let total_duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        Ok(Report::new(
            kernel,
            self.settings.report_config(self.thrash_bytes),
            results,
            total_duration_ms,
        ))
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    }
}

/// Clears the progress bar however the sweep ends
struct ClearOnDrop(ProgressBar);

impl Drop for ClearOnDrop {
    fn drop(&mut self) {
        self.0.finish_and_clear();
    }
}

/// Collect `num` raw samples of `op` in collection order, thrashing
/// `thrash_bytes` of cache before each when non-zero.
///
/// `num == 0` yields no samples.
pub fn distribution<T, F>(
    thrasher: &mut CacheThrasher,
    thrash_bytes: usize,
    num: usize,
    op: F,
) -> Result<Vec<Elapsed>, BenchError>
where
    F: FnMut() -> T,
{
    if num == 0 {
        return Ok(Vec::new());
    }
    let mut sampler = Sampler::fixed_count(num, 0)?;
    if thrash_bytes > 0 {
        sampler = sampler.with_cache_thrash(thrasher, thrash_bytes);
    }
    sampler.collect(op)
}

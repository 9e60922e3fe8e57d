//! Sampler - The Collection Loop
//!
//! One loop serves both sampling policies:
//! - Fixed count: exactly N samples, `K` discarded from each end
//! - Time budget: samples until the budget elapses (at most [`MAX_SAMPLES`]),
//!   a fraction of the run discarded
//!
//! Each iteration runs the optional setup hook, then times one invocation.
//! The stop condition is checked after every sample, so at least one sample
//! is always collected and a slow sample can overrun the budget.

use crate::measure::{Elapsed, Timer, try_time_once};
use crate::thrash::CacheThrasher;
use crate::{BenchError, RunError};
use kernbench_stats::{SampleSet, SummaryStatistics, TrimPolicy, summarize};
use std::convert::Infallible;
use std::time::Duration;

/// Upper bound on samples collected by a time-budgeted run
pub const MAX_SAMPLES: usize = 1024;

/// Hook run before every timed invocation
pub type SetupHook<'a> = Box<dyn FnMut() -> Result<(), BenchError> + 'a>;

/// When the collection loop stops
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopCondition {
    /// Stop after exactly this many samples
    Count(usize),
    /// Stop once the session has run for `budget`, or `max_samples` were taken
    Budget {
        /// Wall-clock budget for the session
        budget: Duration,
        /// Hard cap on the number of samples
        max_samples: usize,
    },
}

impl StopCondition {
    /// Whether another sample should be taken
    fn should_continue(&self, collected: usize, session_elapsed: Elapsed) -> bool {
        match *self {
            StopCondition::Count(n) => collected < n,
            StopCondition::Budget {
                budget,
                max_samples,
            } => collected < max_samples && session_elapsed < budget.as_secs_f64(),
        }
    }

    /// Initial sample buffer size; larger runs grow the buffer as they go
    fn capacity_hint(&self) -> usize {
        match *self {
            StopCondition::Count(n) => n.min(MAX_SAMPLES),
            StopCondition::Budget { max_samples, .. } => max_samples.min(64),
        }
    }
}

/// Collects timing samples and reduces them to summary statistics.
///
/// ```ignore
/// let mut thrasher = CacheThrasher::new();
/// let mut sampler = Sampler::fixed_count(16, 2)?.with_cache_thrash(&mut thrasher, 64 << 20);
/// let stats = sampler.run(|| dot(&a, &b))?;
/// ```
pub struct Sampler<'a> {
    stop: StopCondition,
    trim: TrimPolicy,
    setup: Option<SetupHook<'a>>,
}

impl std::fmt::Debug for Sampler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sampler")
            .field("stop", &self.stop)
            .field("trim", &self.trim)
            .field("setup", &self.setup.is_some())
            .finish()
    }
}

impl<'a> Sampler<'a> {
    /// Take exactly `num_samples` samples and discard `num_discard` from
    /// each end.
    pub fn fixed_count(num_samples: usize, num_discard: usize) -> Result<Self, BenchError> {
        if num_samples == 0 || num_samples <= num_discard.saturating_mul(2) {
            return Err(BenchError::InvalidConfig(format!(
                "num_samples ({num_samples}) must exceed twice num_discard ({num_discard})"
            )));
        }
        Ok(Self {
            stop: StopCondition::Count(num_samples),
            trim: TrimPolicy::Count(num_discard),
            setup: None,
        })
    }

    /// Sample until `time_budget` elapses, then discard
    /// `floor(N * discard_fraction / 2)` samples from each end.
    pub fn time_budget(time_budget: Duration, discard_fraction: f64) -> Result<Self, BenchError> {
        if time_budget.is_zero() {
            return Err(BenchError::InvalidConfig(
                "time budget must be positive".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&discard_fraction) {
            return Err(BenchError::InvalidConfig(format!(
                "discard fraction ({discard_fraction}) must be in [0, 1)"
            )));
        }
        Ok(Self {
            stop: StopCondition::Budget {
                budget: time_budget,
                max_samples: MAX_SAMPLES,
            },
            trim: TrimPolicy::Fraction(discard_fraction),
            setup: None,
        })
    }

    /// Run `hook` before every timed invocation
    pub fn with_setup<F>(self, mut hook: F) -> Self
    where
        F: FnMut() + 'a,
    {
        self.with_fallible_setup(move || {
            hook();
            Ok(())
        })
    }

    /// Run a fallible `hook` before every timed invocation; an error aborts
    /// the run
    pub fn with_fallible_setup<F>(mut self, hook: F) -> Self
    where
        F: FnMut() -> Result<(), BenchError> + 'a,
    {
        self.setup = Some(Box::new(hook));
        self
    }

    /// Thrash `size` bytes of cache before every timed invocation
    pub fn with_cache_thrash(self, thrasher: &'a mut CacheThrasher, size: usize) -> Self {
        self.with_fallible_setup(move || thrasher.thrash(size))
    }

    /// The configured stop condition
    pub fn stop_condition(&self) -> StopCondition {
        self.stop
    }

    /// The configured trim policy
    pub fn trim_policy(&self) -> TrimPolicy {
        self.trim
    }

    /// Collect raw samples of `f` in collection order, without trimming
    pub fn collect<T, F>(&mut self, mut f: F) -> Result<Vec<Elapsed>, BenchError>
    where
        F: FnMut() -> T,
    {
        self.try_collect(|| Ok::<_, Infallible>(f()))
            .map_err(RunError::into_bench_error)
    }

    /// Sample `f` and summarize the trimmed samples
    pub fn run<T, F>(&mut self, f: F) -> Result<SummaryStatistics, BenchError>
    where
        F: FnMut() -> T,
    {
        let samples = self.collect(f)?;
        self.reduce(samples)
    }

    /// Like [`Sampler::collect`] for a fallible operation.
    ///
    /// The first `Err` from `f` ends the run; samples taken before it are
    /// discarded.
    pub fn try_collect<T, E, F>(&mut self, mut f: F) -> Result<Vec<Elapsed>, RunError<E>>
    where
        F: FnMut() -> Result<T, E>,
    {
        let timer = Timer::start();
        let mut samples = Vec::with_capacity(self.stop.capacity_hint());

        loop {
            if let Some(setup) = self.setup.as_mut() {
                setup()?;
            }
            let (elapsed, _) = try_time_once(&mut f).map_err(RunError::Operation)?;
            tracing::trace!(sample = samples.len(), elapsed, "collected sample");
            samples.push(elapsed);

            if !self.stop.should_continue(samples.len(), timer.elapsed()) {
                break;
            }
        }

        tracing::debug!(
            samples = samples.len(),
            session_secs = timer.elapsed(),
            stop = ?self.stop,
            "sampling finished"
        );
        Ok(samples)
    }

    /// Like [`Sampler::run`] for a fallible operation
    pub fn try_run<T, E, F>(&mut self, f: F) -> Result<SummaryStatistics, RunError<E>>
    where
        F: FnMut() -> Result<T, E>,
    {
        let samples = self.try_collect(f)?;
        Ok(self.reduce(samples)?)
    }

    /// Sort, trim and summarize raw samples
    fn reduce(&self, samples: Vec<Elapsed>) -> Result<SummaryStatistics, BenchError> {
        let set = SampleSet::from_unsorted(samples)?.trim(self.trim)?;
        Ok(summarize(&set)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_fixed_count_config() {
        assert!(Sampler::fixed_count(10, 2).is_ok());
        assert!(Sampler::fixed_count(5, 2).is_ok());
        assert!(matches!(
            Sampler::fixed_count(4, 2),
            Err(BenchError::InvalidConfig(_))
        ));
        assert!(Sampler::fixed_count(0, 0).is_err());
        assert!(Sampler::fixed_count(usize::MAX, usize::MAX).is_err());
    }

    #[test]
    fn test_time_budget_config() {
        assert!(Sampler::time_budget(Duration::from_millis(1), 0.0).is_ok());
        assert!(Sampler::time_budget(Duration::ZERO, 0.0).is_err());
        assert!(Sampler::time_budget(Duration::from_millis(1), 1.0).is_err());
        assert!(Sampler::time_budget(Duration::from_millis(1), -0.5).is_err());
        assert!(Sampler::time_budget(Duration::from_millis(1), f64::NAN).is_err());
    }

    #[test]
    fn test_fixed_count_collects_exactly() {
        let calls = Cell::new(0);
        let mut sampler = Sampler::fixed_count(10, 2).unwrap();
        let stats = sampler.run(|| calls.set(calls.get() + 1)).unwrap();

        assert_eq!(calls.get(), 10);
        assert_eq!(stats.count, 6);
        assert!(stats.min <= stats.mean && stats.mean <= stats.max);
    }

    #[test]
    fn test_setup_runs_before_each_sample() {
        let setups = Cell::new(0);
        let calls = Cell::new(0);
        let mut sampler = Sampler::fixed_count(7, 0)
            .unwrap()
            .with_setup(|| setups.set(setups.get() + 1));
        sampler
            .run(|| {
                // The hook has run once more than the operation so far.
                assert_eq!(setups.get(), calls.get() + 1);
                calls.set(calls.get() + 1);
            })
            .unwrap();
        drop(sampler);
        assert_eq!(setups.get(), 7);
    }

    #[test]
    fn test_failing_setup_aborts() {
        let mut sampler = Sampler::fixed_count(5, 0)
            .unwrap()
            .with_fallible_setup(|| {
                Err(BenchError::ChecksumMismatch {
                    expected: 1,
                    actual: 2,
                })
            });
        let err = sampler.run(|| 1).unwrap_err();
        assert!(matches!(err, BenchError::ChecksumMismatch { .. }));
    }

    #[test]
    fn test_cache_thrash_hook() {
        let mut thrasher = CacheThrasher::new();
        {
            let mut sampler = Sampler::fixed_count(4, 1)
                .unwrap()
                .with_cache_thrash(&mut thrasher, 4096);
            let stats = sampler.run(|| 0u8).unwrap();
            assert_eq!(stats.count, 2);
        }
        assert!(thrasher.capacity() >= 4096);
    }

    #[test]
    fn test_operation_error_propagates() {
        let calls = Cell::new(0);
        let mut sampler = Sampler::fixed_count(10, 0).unwrap();
        let result = sampler.try_run(|| {
            calls.set(calls.get() + 1);
            if calls.get() == 3 { Err("kernel failed") } else { Ok(()) }
        });

        assert!(matches!(result, Err(RunError::Operation("kernel failed"))));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_huge_sample_count_starts_without_preallocating() {
        let calls = Cell::new(0);
        let mut sampler = Sampler::fixed_count(usize::MAX, 0).unwrap();
        let result = sampler.try_collect(|| {
            calls.set(calls.get() + 1);
            if calls.get() == 3 { Err("stop") } else { Ok(()) }
        });

        assert!(matches!(result, Err(RunError::Operation("stop"))));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_capacity_hint_is_bounded() {
        assert_eq!(StopCondition::Count(10).capacity_hint(), 10);
        assert_eq!(StopCondition::Count(usize::MAX).capacity_hint(), MAX_SAMPLES);
    }

    #[test]
    fn test_single_sample_is_insufficient() {
        let mut sampler = Sampler::fixed_count(1, 0).unwrap();
        let err = sampler.run(|| ()).unwrap_err();
        assert!(matches!(
            err,
            BenchError::Stats(kernbench_stats::StatsError::InsufficientSamples { count: 1 })
        ));
    }

    #[test]
    fn test_time_budget_slow_sample_collects_one() {
        let mut sampler = Sampler::time_budget(Duration::from_millis(1), 0.0).unwrap();
        let samples = sampler
            .collect(|| std::thread::sleep(Duration::from_millis(5)))
            .unwrap();
        assert_eq!(samples.len(), 1);
        assert!(samples[0] >= 0.001);
    }

    #[test]
    fn test_time_budget_caps_samples() {
        let mut sampler = Sampler::time_budget(Duration::from_secs(10), 0.1).unwrap();
        let samples = sampler.collect(|| ()).unwrap();
        assert_eq!(samples.len(), MAX_SAMPLES);
    }

    #[test]
    fn test_time_budget_trims_fraction() {
        let mut sampler = Sampler::time_budget(Duration::from_secs(10), 0.1).unwrap();
        let stats = sampler.run(|| ()).unwrap();
        // floor(1024 * 0.1 / 2) = 51 per side
        assert_eq!(stats.count, MAX_SAMPLES - 2 * 51);
    }

    #[test]
    fn test_time_budget_fills_budget() {
        let budget = Duration::from_millis(50);
        let timer = Timer::start();
        let mut sampler = Sampler::time_budget(budget, 0.0).unwrap();
        let samples = sampler
            .collect(|| std::thread::sleep(Duration::from_millis(1)))
            .unwrap();
        let session = timer.elapsed();

        assert!(samples.len() > 1);
        assert!(samples.len() < MAX_SAMPLES);
        assert!(session >= budget.as_secs_f64());
    }
}

//! Sample Sets and Trimming
//!
//! A [`SampleSet`] is always sorted ascending. The only way to build one is
//! [`SampleSet::from_unsorted`], which sorts, so positional reads of the
//! extremes are valid for every value of the type.
//!
//! Trimming discards the same number of samples from each end to reduce
//! sensitivity to scheduler and OS jitter.

use crate::StatsError;

/// Policy for discarding extreme samples before summarizing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrimPolicy {
    /// Discard a fixed number of samples from each end
    Count(usize),
    /// Discard `floor(N * f / 2)` samples from each end, `f` in `[0, 1)`
    Fraction(f64),
}

impl Default for TrimPolicy {
    fn default() -> Self {
        TrimPolicy::Count(0)
    }
}

impl TrimPolicy {
    /// Number of samples discarded from each end of a set of `total` samples
    pub fn per_side(&self, total: usize) -> Result<usize, StatsError> {
        match *self {
            TrimPolicy::Count(k) => Ok(k),
            TrimPolicy::Fraction(f) => {
                if !(0.0..1.0).contains(&f) {
                    return Err(StatsError::InvalidDiscardFraction(f));
                }
                Ok((total as f64 * f / 2.0).floor() as usize)
            }
        }
    }
}

/// Timing samples sorted ascending
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleSet {
    sorted: Vec<f64>,
}

impl SampleSet {
    /// Sort raw samples into a set.
    ///
    /// Rejects NaN and infinite values, which have no place in a duration
    /// distribution.
    pub fn from_unsorted(mut samples: Vec<f64>) -> Result<Self, StatsError> {
        if let Some(&bad) = samples.iter().find(|s| !s.is_finite()) {
            return Err(StatsError::NonFiniteSample(bad));
        }
        samples.sort_by(f64::total_cmp);
        Ok(Self { sorted: samples })
    }

    /// Number of samples in the set
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    /// Whether the set holds no samples
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Samples in ascending order
    pub fn as_slice(&self) -> &[f64] {
        &self.sorted
    }

    /// Smallest sample
    pub fn first(&self) -> Option<f64> {
        self.sorted.first().copied()
    }

    /// Largest sample
    pub fn last(&self) -> Option<f64> {
        self.sorted.last().copied()
    }

    /// Discard samples from both ends according to `policy`.
    ///
    /// Fails unless strictly fewer than half of the samples are discarded
    /// from each side, so the result is never empty.
    pub fn trim(mut self, policy: TrimPolicy) -> Result<Self, StatsError> {
        let total = self.sorted.len();
        let per_side = policy.per_side(total)?;
        if per_side.saturating_mul(2) >= total {
            return Err(StatsError::TrimExceedsSamples { per_side, total });
        }
        self.sorted.truncate(total - per_side);
        self.sorted.drain(..per_side);
        Ok(self)
    }
}

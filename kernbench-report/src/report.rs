//! Report Data Structures

use chrono::{DateTime, Utc};
use kernbench_stats::SummaryStatistics;
use serde::{Deserialize, Serialize};

/// Version of the JSON report layout
pub const SCHEMA_VERSION: u32 = 1;

/// Complete report for one kernel sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub results: Vec<SweepResult>,
    pub summary: ReportSummary,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub schema_version: u32,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    /// Kernel that was measured (e.g. "dot")
    pub kernel: String,
    pub config: ReportConfig,
}

/// Sampler configuration captured in report metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum ReportConfig {
    /// Fixed sample count, fixed discard per side
    Fixed {
        samples: usize,
        discard: usize,
        thrash_bytes: usize,
    },
    /// Time-budgeted sampling with fractional discard
    Budget {
        time_budget_secs: f64,
        discard_fraction: f64,
        thrash_bytes: usize,
    },
}

/// Measurements at one point of the sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResult {
    /// Number of elements the kernel processed
    pub elements: u64,
    /// Bytes of input touched by the kernel
    pub footprint_bytes: u64,
    /// Per-invocation timing
    pub metrics: TimingMetrics,
    /// Timing divided by `elements`
    pub per_element: Option<TimingMetrics>,
}

/// Timing metrics in nanoseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingMetrics {
    pub samples: usize,
    pub mean_ns: f64,
    pub std_dev_ns: f64,
    pub min_ns: f64,
    pub max_ns: f64,
}

impl From<&SummaryStatistics> for TimingMetrics {
    fn from(stats: &SummaryStatistics) -> Self {
        Self {
            samples: stats.count,
            mean_ns: stats.mean * 1e9,
            std_dev_ns: stats.standard_deviation * 1e9,
            min_ns: stats.min * 1e9,
            max_ns: stats.max * 1e9,
        }
    }
}

impl SweepResult {
    /// Build a sweep point, deriving the per-element metrics
    pub fn new(elements: u64, footprint_bytes: u64, stats: &SummaryStatistics) -> Self {
        let per_element = stats
            .scale(elements as f64)
            .ok()
            .map(|scaled| TimingMetrics::from(&scaled));
        Self {
            elements,
            footprint_bytes,
            metrics: TimingMetrics::from(stats),
            per_element,
        }
    }
}

/// Report summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub points: usize,
    pub total_samples: usize,
    pub total_duration_ms: f64,
}

impl Report {
    /// Assemble a report stamped with the current time
    pub fn new(
        kernel: impl Into<String>,
        config: ReportConfig,
        results: Vec<SweepResult>,
        total_duration_ms: f64,
    ) -> Self {
        let summary = ReportSummary {
            points: results.len(),
            total_samples: results.iter().map(|r| r.metrics.samples).sum(),
            total_duration_ms,
        };
        Self {
            meta: ReportMeta {
                schema_version: SCHEMA_VERSION,
                version: env!("CARGO_PKG_VERSION").to_string(),
                timestamp: Utc::now(),
                kernel: kernel.into(),
                config,
            },
            results,
            summary,
        }
    }
}

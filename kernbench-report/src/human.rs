//! Human-Readable Output
//!
//! One line per sweep point:
//!
//! ```text
//!       1024: n=  16 (     1234.56 ±      12.345) ns ||         1.21 ±       0.012 ns/elem
//! ```

use crate::report::{Report, ReportConfig, TimingMetrics};

/// Format a report for terminal display
pub fn format_human_output(report: &Report) -> String {
    let mut output = String::new();

    output.push('\n');
    output.push_str(&format!("KernBench Results: {}\n", report.meta.kernel));
    output.push_str(&"=".repeat(60));
    output.push('\n');
    output.push_str(&format!("  {}\n\n", describe_config(&report.meta.config)));

    for result in &report.results {
        output.push_str(&format!(
            "{:>10}: {}",
            result.elements,
            format_metrics(&result.metrics)
        ));
        if let Some(per) = &result.per_element {
            output.push_str(&format!(
                " || {:>12.4} ± {:>11.4} ns/elem",
                per.mean_ns, per.std_dev_ns
            ));
        }
        output.push('\n');
    }

    output.push_str("\nSummary\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  Points: {}  Samples: {}  Duration: {:.2} ms\n",
        report.summary.points, report.summary.total_samples, report.summary.total_duration_ms
    ));

    output
}

/// `n=  16 (     1234.56 ±      12.345) ns`
pub fn format_metrics(metrics: &TimingMetrics) -> String {
    format!(
        "n={:>4} ({:>12.2} ± {:>11.3}) ns",
        metrics.samples, metrics.mean_ns, metrics.std_dev_ns
    )
}

fn describe_config(config: &ReportConfig) -> String {
    match config {
        ReportConfig::Fixed {
            samples,
            discard,
            thrash_bytes,
        } => format!(
            "fixed count: {} samples, {} discarded per side, thrash {} bytes",
            samples, discard, thrash_bytes
        ),
        ReportConfig::Budget {
            time_budget_secs,
            discard_fraction,
            thrash_bytes,
        } => format!(
            "time budget: {:.3} s, discard fraction {:.2}, thrash {} bytes",
            time_budget_secs, discard_fraction, thrash_bytes
        ),
    }
}

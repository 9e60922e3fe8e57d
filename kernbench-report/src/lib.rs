#![warn(missing_docs)]
//! KernBench Report - Output Formats
//!
//! Generates:
//! - JSON (machine-readable)
//! - Human-readable terminal tables

mod human;
mod json;
mod report;

pub use human::{format_human_output, format_metrics};
pub use json::generate_json_report;
pub use report::{
    Report, ReportConfig, ReportMeta, ReportSummary, SCHEMA_VERSION, SweepResult, TimingMetrics,
};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON with full schema
    Json,
    /// Human-readable terminal output
    #[default]
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Render `report` in the requested format
pub fn render(report: &Report, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => generate_json_report(report),
        OutputFormat::Human => Ok(format_human_output(report)),
    }
}

//! JSON Output

use crate::report::Report;

/// Generate a prettified JSON report.
///
/// Serializes the sweep report into machine-readable JSON format.
pub fn generate_json_report(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ReportConfig, SweepResult};
    use kernbench_stats::SummaryStatistics;

    #[test]
    fn test_json_round_trip_shape() {
        let stats = SummaryStatistics {
            count: 6,
            min: 1e-6,
            max: 3e-6,
            mean: 2e-6,
            standard_deviation: 5e-7,
        };
        let config = ReportConfig::Budget {
            time_budget_secs: 1.0,
            discard_fraction: 0.1,
            thrash_bytes: 1 << 20,
        };
        let report = Report::new("linear-combination", config, vec![SweepResult::new(1024, 8192, &stats)], 3.0);

        let json = generate_json_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["meta"]["kernel"], "linear-combination");
        assert_eq!(value["meta"]["config"]["mode"], "budget");
        assert_eq!(value["results"][0]["elements"], 1024);
        assert_eq!(value["results"][0]["metrics"]["samples"], 6);

        let parsed: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.results.len(), 1);
    }
}

//! Configuration loading from kernbench.toml
//!
//! KernBench configuration can be specified in a `kernbench.toml` file in the project root.
//! The configuration is automatically discovered by walking up from the current directory.

use crate::size::parse_usize;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Name of the configuration file looked up by [`KernConfig::discover`]
pub const CONFIG_FILE: &str = "kernbench.toml";

/// KernBench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KernConfig {
    /// Sampler configuration
    #[serde(default)]
    pub sampler: SamplerConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Sampling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SamplerMode {
    /// Fixed number of samples, fixed discard per side
    #[default]
    Fixed,
    /// Sample until a time budget elapses, discard a fraction
    Budget,
}

/// Sampler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Sampling policy: "fixed" or "budget"
    #[serde(default)]
    pub mode: SamplerMode,
    /// Samples per point in fixed mode
    #[serde(default = "default_samples")]
    pub samples: usize,
    /// Samples discarded from each end in fixed mode
    #[serde(default = "default_discard")]
    pub discard: usize,
    /// Time budget per point in budget mode (e.g., "1s", "250ms")
    #[serde(default = "default_time_budget")]
    pub time_budget: String,
    /// Fraction of samples discarded in budget mode, split across both ends
    #[serde(default = "default_discard_fraction")]
    pub discard_fraction: f64,
    /// Bytes of cache thrashed before each sample (e.g., "64M"); "0" disables
    #[serde(default = "default_thrash")]
    pub thrash: String,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            mode: SamplerMode::default(),
            samples: default_samples(),
            discard: default_discard(),
            time_budget: default_time_budget(),
            discard_fraction: default_discard_fraction(),
            thrash: default_thrash(),
        }
    }
}

fn default_samples() -> usize {
    16
}
fn default_discard() -> usize {
    2
}
fn default_time_budget() -> String {
    "1s".to_string()
}
fn default_discard_fraction() -> f64 {
    0.1
}
fn default_thrash() -> String {
    "0".to_string()
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl SamplerConfig {
    /// Parsed time budget
    pub fn time_budget(&self) -> anyhow::Result<Duration> {
        KernConfig::parse_duration(&self.time_budget)
    }

    /// Parsed thrash size in bytes
    pub fn thrash_bytes(&self) -> anyhow::Result<usize> {
        Ok(parse_usize(&self.thrash)?)
    }
}

impl KernConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => {
                        tracing::debug!(path = %config_path.display(), "loaded configuration");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %config_path.display(), error = %e, "ignoring unreadable configuration");
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# KernBench Configuration

[sampler]
# Sampling policy: "fixed" (exact sample count) or "budget" (time-bounded)
mode = "fixed"
# Fixed mode: samples per point and samples discarded from each end
samples = 16
discard = 2
# Budget mode: wall-clock budget per point (at most 1024 samples)
time_budget = "1s"
# Budget mode: fraction of samples discarded, half from each end
discard_fraction = 0.1
# Bytes of cache to thrash before every sample (k/m/g suffixes, "0" disables)
thrash = "0"

[output]
# Output format: human, json
format = "human"
"#
        .to_string()
    }

    /// Parse duration string (e.g., "3s", "500ms", "2m")
    pub fn parse_duration(s: &str) -> anyhow::Result<Duration> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Empty duration string"));
        }

        // Find where the number ends and unit begins
        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;
        if !value.is_finite() || value < 0.0 {
            return Err(anyhow::anyhow!("Invalid duration number: {}", num_part));
        }

        let multiplier: u64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1,
            "us" | "µs" => 1_000,
            "ms" => 1_000_000,
            "s" | "" => 1_000_000_000,
            "m" | "min" => 60_000_000_000,
            _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok(Duration::from_nanos((value * multiplier as f64) as u64))
    }
}

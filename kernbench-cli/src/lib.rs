#![warn(missing_docs)]
//! KernBench CLI Library
//!
//! Command-line driver for the measurement engine: sweeps the bundled
//! numeric kernels over growing lengths and reports per-length and
//! per-element timing.
//!
//! # Example
//!
//! ```text
//! kernbench dot --min-len 1k --max-len 16m --thrash 64m
//! kernbench --mode budget --time-budget 500ms linear-combination --columns 4
//! kernbench distribution 1m 100 64m
//! ```

mod config;
mod kernels;
mod size;
mod sweep;

pub use config::*;
pub use kernels::{dot, dot_inputs, linear_combination, linear_combination_inputs};
pub use size::{SizeError, parse_size, parse_usize};
pub use sweep::{SamplerSettings, SweepRunner, distribution, doubling_lengths};

use clap::{Parser, Subcommand};
use kernbench_core::CacheThrasher;
use kernbench_report::{OutputFormat, Report, render};
use std::io::Write;
use std::path::PathBuf;

/// KernBench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "kernbench")]
#[command(author, version, about = "KernBench - microbenchmarks for numeric kernels")]
pub struct Cli {
    /// What to run
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: human, json
    #[arg(long, global = true)]
    pub format: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Sampling policy (overrides kernbench.toml)
    #[arg(long, value_enum, global = true)]
    pub mode: Option<SamplerMode>,

    /// Fixed mode: samples per point
    #[arg(long, short = 'n', global = true)]
    pub samples: Option<usize>,

    /// Fixed mode: samples discarded from each end
    #[arg(long, global = true)]
    pub discard: Option<usize>,

    /// Budget mode: time budget per point (e.g. "1s", "250ms")
    #[arg(long, global = true)]
    pub time_budget: Option<String>,

    /// Budget mode: fraction of samples discarded, half from each end
    #[arg(long, global = true)]
    pub discard_fraction: Option<f64>,

    /// Bytes of cache thrashed before each sample (e.g. "64m")
    #[arg(long, global = true, value_parser = parse_usize)]
    pub thrash: Option<usize>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sweep the dot product over doubling lengths
    Dot {
        /// Smallest length (elements)
        #[arg(long, default_value = "1k", value_parser = parse_usize)]
        min_len: usize,
        /// Largest length (elements)
        #[arg(long, default_value = "16m", value_parser = parse_usize)]
        max_len: usize,
    },
    /// Sweep a linear combination of columns over doubling lengths
    LinearCombination {
        /// Number of columns combined
        #[arg(long, default_value = "4")]
        columns: usize,
        /// Smallest length (elements)
        #[arg(long, default_value = "1k", value_parser = parse_usize)]
        min_len: usize,
        /// Largest length (elements)
        #[arg(long, default_value = "16m", value_parser = parse_usize)]
        max_len: usize,
    },
    /// Print raw dot-product samples, one per line
    Distribution {
        /// Vector length (elements)
        #[arg(value_parser = parse_usize)]
        size: usize,
        /// Number of samples
        #[arg(value_parser = parse_usize)]
        num: usize,
        /// Bytes of cache thrashed before each sample
        #[arg(value_parser = parse_usize)]
        thrash_bytes: usize,
    },
    /// Print a default kernbench.toml
    Init,
}

/// Run the KernBench CLI with the process arguments.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if something goes wrong.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the KernBench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    // Initialize logging
    let filter = if cli.verbose {
        "kernbench=debug"
    } else {
        "kernbench=info"
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    // Discover kernbench.toml configuration (CLI flags override)
    let config = KernConfig::discover().unwrap_or_default();

    let format: OutputFormat = cli
        .format
        .as_deref()
        .unwrap_or(config.output.format.as_str())
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    match &cli.command {
        Commands::Init => {
            emit(&cli, &KernConfig::default_toml())?;
        }
        Commands::Dot { min_len, max_len } => {
            let mut runner = build_runner(&cli, &config)?;
            let report = run_dot(&mut runner, *min_len, *max_len)?;
            emit(&cli, &render(&report, format)?)?;
        }
        Commands::LinearCombination {
            columns,
            min_len,
            max_len,
        } => {
            let mut runner = build_runner(&cli, &config)?;
            let report = run_linear_combination(&mut runner, *columns, *min_len, *max_len)?;
            emit(&cli, &render(&report, format)?)?;
        }
        Commands::Distribution {
            size,
            num,
            thrash_bytes,
        } => {
            let out = run_distribution(*size, *num, *thrash_bytes)?;
            emit(&cli, &out)?;
        }
    }

    Ok(())
}

/// Build sampler settings by layering: kernbench.toml defaults → CLI overrides.
pub fn resolve_settings(cli: &Cli, config: &KernConfig) -> anyhow::Result<SamplerSettings> {
    let sampler = &config.sampler;
    let settings = match cli.mode.unwrap_or(sampler.mode) {
        SamplerMode::Fixed => SamplerSettings::Fixed {
            samples: cli.samples.unwrap_or(sampler.samples),
            discard: cli.discard.unwrap_or(sampler.discard),
        },
        SamplerMode::Budget => SamplerSettings::Budget {
            time_budget: match cli.time_budget.as_deref() {
                Some(s) => KernConfig::parse_duration(s)?,
                None => sampler.time_budget()?,
            },
            discard_fraction: cli.discard_fraction.unwrap_or(sampler.discard_fraction),
        },
    };
    Ok(settings)
}

fn build_runner(cli: &Cli, config: &KernConfig) -> anyhow::Result<SweepRunner> {
    let settings = resolve_settings(cli, config)?;
    let thrash_bytes = match cli.thrash {
        Some(bytes) => bytes,
        None => config.sampler.thrash_bytes()?,
    };
    tracing::info!(?settings, thrash_bytes, "starting sweep");
    // Progress output would interleave with debug logs.
    Ok(SweepRunner::new(settings, thrash_bytes).with_progress(!cli.verbose))
}

/// Sweep [`dot`] from `min_len` to `max_len` elements
pub fn run_dot(runner: &mut SweepRunner, min_len: usize, max_len: usize) -> anyhow::Result<Report> {
    let lengths = doubling_lengths(min_len, max_len);
    let (a, b) = dot_inputs(max_len);
    let report = runner.run("dot", &lengths, 2 * size_of::<f64>() as u64, |n| {
        dot(&a[..n], &b[..n])
    })?;
    Ok(report)
}

/// Sweep [`linear_combination`] of `columns` columns from `min_len` to
/// `max_len` elements
pub fn run_linear_combination(
    runner: &mut SweepRunner,
    columns: usize,
    min_len: usize,
    max_len: usize,
) -> anyhow::Result<Report> {
    if columns == 0 {
        anyhow::bail!("columns must be positive");
    }
    let lengths = doubling_lengths(min_len, max_len);
    let (coefficients, samples) = linear_combination_inputs(columns, max_len);
    let mut out = vec![0.0; max_len];
    let bytes_per_element = ((columns + 1) * size_of::<f64>()) as u64;
    let report = runner.run("linear-combination", &lengths, bytes_per_element, |n| {
        linear_combination(&coefficients, &samples, &mut out[..n])
    })?;
    Ok(report)
}

/// Raw [`dot`] samples of length `size`, one per line. Sampler settings from
/// flags or kernbench.toml do not apply here.
pub fn run_distribution(size: usize, num: usize, thrash_bytes: usize) -> anyhow::Result<String> {
    let (a, b) = dot_inputs(size);
    let mut thrasher = CacheThrasher::new();
    let samples = distribution(&mut thrasher, thrash_bytes, num, || dot(&a, &b))?;
    let mut out = String::with_capacity(samples.len() * 24);
    for sample in samples {
        out.push_str(&format!("{sample}\n"));
    }
    Ok(out)
}

fn emit(cli: &Cli, output: &str) -> anyhow::Result<()> {
    if let Some(ref path) = cli.output {
        let mut file = std::fs::File::create(path)?;
        file.write_all(output.as_bytes())?;
        eprintln!("Report written to: {}", path.display());
    } else {
        print!("{}", output);
    }
    Ok(())
}

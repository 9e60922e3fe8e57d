//! Dot-Product Sweep
//!
//! Times the dot product at doubling lengths with a cold cache before every
//! sample, printing per-call and per-element statistics.
//!
//! Run with:
//!   cargo run --release --example dot_sweep

use kernbench::prelude::*;

const MAX_LEN: usize = 1 << 20;
const THRASH_BYTES: usize = 64 << 20;

fn main() -> anyhow::Result<()> {
    let (a, b) = kernbench::dot_inputs(MAX_LEN);
    let mut thrasher = CacheThrasher::new();

    for len in kernbench::doubling_lengths(1024, MAX_LEN) {
        let mut sampler =
            Sampler::fixed_count(16, 2)?.with_cache_thrash(&mut thrasher, THRASH_BYTES);
        let stats = sampler.run(|| kernbench::dot(&a[..len], &b[..len]))?;
        println!("{:>10}: {} || {}", len, stats, stats.scale(len as f64)?);
    }

    Ok(())
}

//! Integration tests for KernBench
//!
//! These tests verify the end-to-end behavior of the measurement engine.

use kernbench::{
    BenchError, CacheThrasher, MAX_SAMPLES, RunError, SampleSet, Sampler, SamplerSettings,
    StatsError, SummaryStatistics, SweepRunner, TrimPolicy, doubling_lengths, dot, dot_inputs,
    generate_json_report, summarize,
};
use std::cell::{Cell, RefCell};
use std::time::Duration;

/// A zero-latency stub sampled 10 times with 2 discarded per side keeps 6
#[test]
fn test_fixed_count_scenario() {
    let mut sampler = Sampler::fixed_count(10, 2).unwrap();
    let stats = sampler.run(|| ()).unwrap();
    assert_eq!(stats.count, 6);
}

/// Fixed-count runs always keep num_samples - 2 * num_discard samples
#[test]
fn test_fixed_count_law() {
    for (samples, discard) in [(2, 0), (3, 1), (16, 2), (100, 49), (33, 0)] {
        let mut sampler = Sampler::fixed_count(samples, discard).unwrap();
        let stats = sampler.run(|| std::hint::black_box(7u64) * 3).unwrap();
        assert_eq!(stats.count, samples - 2 * discard);
        assert!(stats.min <= stats.mean && stats.mean <= stats.max);
        assert!(stats.standard_deviation >= 0.0);
    }
}

/// Summarizing [1, 2, 3, 4, 5]
#[test]
fn test_summarize_scenario() {
    let set = SampleSet::from_unsorted(vec![4.0, 2.0, 5.0, 1.0, 3.0]).unwrap();
    let stats = summarize(&set).unwrap();

    assert_eq!(stats.count, 5);
    assert_eq!(stats.min, 1.0);
    assert_eq!(stats.max, 5.0);
    assert!((stats.mean - 3.0).abs() < 1e-12);
    assert!((stats.standard_deviation - 2.0f64.sqrt() * 1.25).abs() < 1e-12);
}

/// Trimming d from each end of a sorted sequence keeps S[d..|S|-d]
#[test]
fn test_trim_then_summarize_law() {
    let raw: Vec<f64> = (0..40).map(|i| ((i * 37) % 41) as f64 * 0.5).collect();
    let mut sorted = raw.clone();
    sorted.sort_by(f64::total_cmp);

    for d in [0usize, 1, 5, 19] {
        let set = SampleSet::from_unsorted(raw.clone()).unwrap();
        let stats = summarize(&set.trim(TrimPolicy::Count(d)).unwrap()).unwrap();
        let retained = &sorted[d..sorted.len() - d];

        assert_eq!(stats.count, sorted.len() - 2 * d);
        assert_eq!(stats.min, sorted[d]);
        assert_eq!(stats.max, sorted[sorted.len() - 1 - d]);
        let mean = retained.iter().sum::<f64>() / retained.len() as f64;
        assert!((stats.mean - mean).abs() < 1e-9);
        assert!(stats.standard_deviation >= 0.0);
    }
}

/// Scaling divides every duration and keeps the count
#[test]
fn test_scaling_law() {
    let stats = SummaryStatistics {
        count: 4,
        min: 8.0,
        max: 16.0,
        mean: 12.0,
        standard_deviation: 4.0,
    };
    let scaled = stats.scale(4.0).unwrap();
    assert_eq!(scaled.count, 4);
    assert_eq!(scaled.min, 2.0);
    assert_eq!(scaled.max, 4.0);
    assert_eq!(scaled.mean, 3.0);
    assert_eq!(scaled.standard_deviation, 1.0);

    for k in [0.5, 3.0, 1024.0] {
        let scaled = stats.scale(k).unwrap();
        assert_eq!(scaled.mean, stats.mean / k);
        assert_eq!(scaled.min, stats.min / k);
        assert_eq!(scaled.max, stats.max / k);
        assert_eq!(scaled.standard_deviation, stats.standard_deviation / k);
    }
    assert!(matches!(
        stats.scale(0.0),
        Err(StatsError::InvalidScaleFactor(_))
    ));
}

/// The thrasher grows, never shrinks, and always verifies
#[test]
fn test_thrasher_grow_only() {
    let mut thrasher = CacheThrasher::new();
    thrasher.thrash(0).unwrap();
    assert_eq!(thrasher.capacity(), 0);

    thrasher.thrash(4096).unwrap();
    thrasher.thrash(1 << 20).unwrap();
    assert!(thrasher.capacity() >= 1 << 20);
    thrasher.thrash(512).unwrap();
    assert!(thrasher.capacity() >= 1 << 20);
}

/// The setup hook runs before every measured invocation, with captured state
#[test]
fn test_capturing_setup_hook() {
    let log = RefCell::new(Vec::new());
    let mut sampler = Sampler::fixed_count(3, 0)
        .unwrap()
        .with_setup(|| log.borrow_mut().push("setup"));
    sampler.run(|| log.borrow_mut().push("op")).unwrap();
    drop(sampler);

    assert_eq!(
        log.into_inner(),
        vec!["setup", "op", "setup", "op", "setup", "op"]
    );
}

/// Thrashing as the setup hook of a time-budgeted sampler
#[test]
fn test_time_budget_with_thrash() {
    let mut thrasher = CacheThrasher::new();
    let (a, b) = dot_inputs(1024);
    let mut sampler = Sampler::time_budget(Duration::from_millis(20), 0.2)
        .unwrap()
        .with_cache_thrash(&mut thrasher, 256 * 1024);
    let stats = sampler.run(|| dot(&a, &b)).unwrap();

    assert!(stats.count >= 2);
    assert!(stats.count <= MAX_SAMPLES);
}

/// One slow sample exceeding the budget ends the run with a single sample
#[test]
fn test_time_budget_single_slow_sample() {
    let calls = Cell::new(0);
    let mut sampler = Sampler::time_budget(Duration::from_millis(1), 0.0).unwrap();
    let err = sampler
        .run(|| {
            calls.set(calls.get() + 1);
            std::thread::sleep(Duration::from_millis(5));
        })
        .unwrap_err();

    assert_eq!(calls.get(), 1);
    assert!(matches!(
        err,
        BenchError::Stats(StatsError::InsufficientSamples { count: 1 })
    ));
}

/// Errors from the operation propagate without being retried
#[test]
fn test_operation_failure_propagates() {
    let mut sampler = Sampler::fixed_count(8, 1).unwrap();
    let result = sampler.try_run(|| "x".parse::<u32>());
    assert!(matches!(result, Err(RunError::Operation(_))));
}

/// Invalid configurations are rejected up front
#[test]
fn test_invalid_configurations() {
    assert!(matches!(
        Sampler::fixed_count(4, 2),
        Err(BenchError::InvalidConfig(_))
    ));
    assert!(Sampler::time_budget(Duration::ZERO, 0.1).is_err());
    assert!(Sampler::time_budget(Duration::from_secs(1), 1.0).is_err());
}

/// A full sweep renders to JSON
#[test]
fn test_sweep_report_json() {
    let (a, b) = dot_inputs(512);
    let mut runner = SweepRunner::new(
        SamplerSettings::Fixed {
            samples: 6,
            discard: 1,
        },
        16 * 1024,
    );
    let report = runner
        .run("dot", &doubling_lengths(128, 512), 16, |n| {
            dot(&a[..n], &b[..n])
        })
        .unwrap();

    let json = generate_json_report(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["results"].as_array().unwrap().len(), 3);
    assert_eq!(value["meta"]["config"]["mode"], "fixed");
    assert_eq!(value["meta"]["config"]["thrash_bytes"], 16 * 1024);
    assert_eq!(value["results"][2]["metrics"]["samples"], 4);
}

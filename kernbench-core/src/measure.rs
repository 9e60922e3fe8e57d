//! Single-Invocation Timing
//!
//! Wall-clock timing on the monotonic `std::time::Instant` clock. Durations
//! are reported as `f64` seconds ([`Elapsed`]).

use std::hint::black_box;
use std::time::Instant;

/// Duration of one invocation, in seconds
pub type Elapsed = f64;

/// Seconds between two instants
#[inline(always)]
pub fn time_diff(start: Instant, end: Instant) -> Elapsed {
    end.duration_since(start).as_secs_f64()
}

/// Seconds elapsed since `start`
#[inline(always)]
pub fn time_since(start: Instant) -> Elapsed {
    time_diff(start, Instant::now())
}

/// Invoke `f` exactly once and return the elapsed time and its result.
///
/// The call sits behind a no-inline boundary and its result passes through
/// `black_box`, so the optimizer can neither fold the operation into the
/// caller nor discard it. A panic in `f` propagates unmeasured.
#[inline(never)]
pub fn time_once<T, F>(f: F) -> (Elapsed, T)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = black_box(f());
    let end = Instant::now();
    (time_diff(start, end), result)
}

/// Like [`time_once`] for a fallible operation.
///
/// An `Err` is returned as is, without a measurement.
#[inline(never)]
pub fn try_time_once<T, E, F>(f: F) -> Result<(Elapsed, T), E>
where
    F: FnOnce() -> Result<T, E>,
{
    let start = Instant::now();
    let result = black_box(f())?;
    let end = Instant::now();
    Ok((time_diff(start, end), result))
}

// ─── Timer ───────────────────────────────────────────────────────────────────

/// Timer for measuring a sampling session
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Seconds since the timer started
    #[inline(always)]
    pub fn elapsed(&self) -> Elapsed {
        time_since(self.start)
    }
}

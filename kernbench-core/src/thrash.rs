//! Cache Thrashing
//!
//! Sweeps a scratch buffer between samples so each timed invocation starts
//! from a cold cache rather than inheriting the previous sample's working
//! set. The buffer is owned by the [`CacheThrasher`], grows on demand and
//! never shrinks.

use crate::BenchError;
use std::hint::black_box;

/// Sum of `i mod 256` over one full 256-byte period
const PERIOD_SUM: u64 = 255 * 256 / 2;

/// Owned scratch buffer used to evict cache state
#[derive(Debug, Default)]
pub struct CacheThrasher {
    buf: Vec<u8>,
}

impl CacheThrasher {
    /// Create a thrasher with no buffer; allocation happens on first use
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes currently retained by the scratch buffer
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Write and read back at least `size` bytes.
    ///
    /// A `size` of zero does nothing. The buffer grows to `size` if it is
    /// smaller and the whole retained buffer is swept. The read pass is
    /// checked against the closed-form checksum of the write pattern.
    pub fn thrash(&mut self, size: usize) -> Result<(), BenchError> {
        if size == 0 {
            return Ok(());
        }

        if self.buf.len() < size {
            self.grow(size)?;
        }

        for (i, byte) in self.buf.iter_mut().enumerate() {
            *byte = i as u8;
        }

        let buf = black_box(self.buf.as_slice());
        let actual: u64 = buf.iter().map(|&b| u64::from(b)).sum();
        let expected = expected_checksum(buf.len());
        if actual != expected {
            return Err(BenchError::ChecksumMismatch { expected, actual });
        }
        Ok(())
    }

    fn grow(&mut self, size: usize) -> Result<(), BenchError> {
        let additional = size - self.buf.len();
        self.buf
            .try_reserve_exact(additional)
            .map_err(|_| BenchError::ScratchAllocation { requested: size })?;
        self.buf.resize(size, 0);
        tracing::debug!(bytes = size, "grew cache thrash buffer");
        Ok(())
    }
}

/// Checksum of `len` bytes written with the pattern `i mod 256`
pub fn expected_checksum(len: usize) -> u64 {
    let periods = (len / 256) as u64;
    let rem = (len % 256) as u64;
    PERIOD_SUM * periods + rem * rem.saturating_sub(1) / 2
}

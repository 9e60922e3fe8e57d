//! Size Parsing
//!
//! Sizes are decimal integers with an optional, case-insensitive `k`, `m`
//! or `g` suffix for 1024-based scaling: `4096`, `64K`, `16m`, `1G`.

use thiserror::Error;

/// Errors from [`parse_size`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SizeError {
    /// The input was empty.
    #[error("empty size string")]
    Empty,

    /// The numeric part was not a decimal integer.
    #[error("invalid size number: {0:?}")]
    InvalidNumber(String),

    /// The scaled value does not fit in 64 bits.
    #[error("size out of range: {0}")]
    Overflow(String),
}

/// Parse a size such as `"64k"` into a count (`65536`).
pub fn parse_size(s: &str) -> Result<u64, SizeError> {
    let last = s.chars().last().ok_or(SizeError::Empty)?;

    let (digits, scale) = if last.is_ascii_digit() {
        (s, 1u64)
    } else {
        let scale = match last.to_ascii_lowercase() {
            'k' => 1 << 10,
            'm' => 1 << 20,
            'g' => 1 << 30,
            _ => return Err(SizeError::InvalidNumber(s.to_string())),
        };
        (&s[..s.len() - last.len_utf8()], scale)
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SizeError::InvalidNumber(s.to_string()));
    }
    let value: u64 = digits
        .parse()
        .map_err(|_| SizeError::Overflow(s.to_string()))?;
    value
        .checked_mul(scale)
        .ok_or_else(|| SizeError::Overflow(s.to_string()))
}

/// [`parse_size`] for values that index memory
pub fn parse_usize(s: &str) -> Result<usize, SizeError> {
    let value = parse_size(s)?;
    usize::try_from(value).map_err(|_| SizeError::Overflow(s.to_string()))
}

//! Numeric Kernels
//!
//! The operations the CLI sweeps. Both sit behind `#[inline(never)]` so the
//! measured call is a real call into the kernel.

/// Dot product of `a` and `b` over their common length.
#[inline(never)]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).fold(0.0, |acc, (x, y)| acc + x * y)
}

/// Write `out[i] = Σ_c coefficients[c] * columns[c][i]` for every `i` in
/// `out`, returning the last value written (0.0 when `out` is empty).
///
/// Every column must hold at least `out.len()` values.
#[inline(never)]
pub fn linear_combination(coefficients: &[f64], columns: &[Vec<f64>], out: &mut [f64]) -> f64 {
    debug_assert_eq!(coefficients.len(), columns.len());
    let mut res = 0.0;
    for (i, slot) in out.iter_mut().enumerate() {
        res = coefficients
            .iter()
            .zip(columns)
            .fold(0.0, |acc, (c, column)| acc + c * column[i]);
        *slot = res;
    }
    res
}

/// Inputs for [`dot`]: `a[i] = i + 1`, `b[i] = 1 / (i + 1)`.
///
/// The dot product of any prefix of length `n` is `n`.
pub fn dot_inputs(len: usize) -> (Vec<f64>, Vec<f64>) {
    let a = (0..len).map(|i| (i + 1) as f64).collect();
    let b = (0..len).map(|i| 1.0 / (i + 1) as f64).collect();
    (a, b)
}

/// Inputs for [`linear_combination`]: `num_columns` coefficients
/// `1 / (c + 1)` and columns holding `i + 1` at row `i`.
pub fn linear_combination_inputs(num_columns: usize, len: usize) -> (Vec<f64>, Vec<Vec<f64>>) {
    let coefficients = (0..num_columns).map(|c| 1.0 / (c + 1) as f64).collect();
    let column: Vec<f64> = (0..len).map(|i| (i + 1) as f64).collect();
    let columns = vec![column; num_columns];
    (coefficients, columns)
}

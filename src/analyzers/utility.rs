/// Computes the arithmetic mean of the finite values in a slice.
/// Returns `None` when no finite value is present.
pub fn mean(values: &[f64]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        return None;
    }
    Some(sum / count as f64)
}

/// Computes the population standard deviation (N denominator) of the finite
/// values in a slice, given a pre-computed mean. Returns 0.0 for empty input.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    let (sum_sq, count) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, c), v| (s + (v - mean).powi(2), c + 1));
    if count == 0 {
        return 0.0;
    }
    (sum_sq / count as f64).sqrt()
}

//! Defined-subset statistics.
//!
//! Every yearly series in this crate carries "undefined" entries as
//! `Option::None` (a year without instrument coverage has no rate, which is
//! not the same thing as a rate of zero). The reductions here operate on the
//! defined subset only and return `None` when nothing is defined, so that
//! undefinedness keeps propagating instead of collapsing to a number.

/// Collect the defined entries of an optional series.
pub fn defined(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().filter_map(|v| *v).collect()
}

/// Arithmetic mean, `None` on an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median (midpoint average for even lengths), `None` on an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}

/// Population standard deviation (divisor N, not N−1), `None` on empty.
pub fn std_pop(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

/// Smallest value, `None` on an empty slice.
pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

/// Largest value, `None` on an empty slice.
pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// Mean of elementwise ratios `num[i] / den[i]` over pairs where both sides
/// are finite and the denominator is nonzero.
pub fn mean_ratio(num: &[f64], den: &[f64]) -> Option<f64> {
    let ratios: Vec<f64> = num
        .iter()
        .zip(den)
        .filter(|(a, b)| a.is_finite() && b.is_finite() && **b != 0.0)
        .map(|(a, b)| a / b)
        .collect();
    mean(&ratios)
}

/// Centered running mean over an optional series.
///
/// For each index with a full `window` inside the series bounds, averages
/// the defined entries of the window; positions too close to either edge,
/// or whose window holds no defined entry, stay `None`. An even window
/// takes its extra sample on the left.
pub fn running_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut out = vec![None; n];
    if window == 0 || n < window {
        return out;
    }
    let left = window / 2;
    let right = window - 1 - left;
    for i in left..n - right {
        let slice = &values[i - left..=i + right];
        let in_window = defined(slice);
        out[i] = mean(&in_window);
    }
    out
}

/// Round to one decimal place, for reporting only.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

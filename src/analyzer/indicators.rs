use crate::model::{MonthlyRecord, Statistics, VegetationIndex};

/// Present values of one index, in record order.
pub fn index_values(records: &[MonthlyRecord], index: VegetationIndex) -> Vec<f64> {
    records.iter().filter_map(|r| index.value(r)).collect()
}

/// Mean, extremes and population standard deviation. Empty input gives zeros.
pub fn describe(values: &[f64]) -> Statistics {
    if values.is_empty() {
        return Statistics::default();
    }
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let std_dev = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count).sqrt();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Statistics {
        mean,
        min,
        max,
        std_dev,
        count: values.len(),
    }
}

/// Pearson correlation coefficient between two slices.
/// Returns None if slices have different lengths, are empty or have no variance.
pub fn compute_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.is_empty() {
        return None;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;
    let numerator: f64 = x.iter().zip(y.iter()).map(|(xi, yi)| (xi - mean_x) * (yi - mean_y)).sum();
    let denominator_x: f64 = x.iter().map(|xi| (xi - mean_x).powi(2)).sum();
    let denominator_y: f64 = y.iter().map(|yi| (yi - mean_y).powi(2)).sum();
    let denominator = (denominator_x * denominator_y).sqrt();
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Least-squares line `y = slope * x + intercept` over `x = 0..n`.
pub fn linear_fit(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = values.iter().sum::<f64>() / n;
    let (mut num, mut den) = (0.0, 0.0);
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        num += dx * (y - mean_y);
        den += dx * dx;
    }
    let slope = num / den;
    Some((slope, mean_y - slope * mean_x))
}

/// Largest relative month-on-month drop, as a positive fraction.
pub fn largest_drop(values: &[f64]) -> f64 {
    values
        .windows(2)
        .filter(|w| w[0].abs() > f64::EPSILON)
        .map(|w| (w[0] - w[1]) / w[0].abs())
        .fold(0.0, f64::max)
}

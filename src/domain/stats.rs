// Summary statistics applied to a raw series before charting

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median over a sorted copy. Even-length input averages the two middle
/// elements; empty input yields 0.
pub fn median(values: &[f64]) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = n / 2;
    if n % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Sample standard deviation. Fewer than two values yields 0 rather than
/// dividing by n-1 <= 0.
pub fn stddev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(values);
    let sum: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (sum / (n - 1) as f64).sqrt()
}

/// Compress outliers so extreme spikes don't dominate the chart's Y scale.
///
/// Only active when stddev exceeds the median; each value further than the
/// median away from the median is pulled in to `median +/- 20*ln(distance)`.
/// Returns true when any value was rewritten, for the chart title.
pub fn compress_outliers(values: &mut [f64]) -> bool {
    let sd = stddev(values);
    let m = median(values);
    if sd <= m {
        return false;
    }
    let mut scaled = false;
    for v in values.iter_mut() {
        let dist = (*v - m).abs();
        if dist > m {
            *v = m + (*v - m).signum() * 20.0 * dist.ln();
            scaled = true;
        }
    }
    scaled
}

//! Descriptive statistic primitives.
//!
//! Small numeric helpers shared by the aggregator. Percentiles use linear
//! interpolation between order statistics; variance and standard deviation
//! use the sample (n−1) convention and are undefined for fewer than two
//! observations.

/// Arithmetic mean. Callers guarantee a non-empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Percentile of pre-sorted values with linear interpolation.
///
/// `q` is a fraction in `[0, 1]`; `q = 0.5` is the median. With an even
/// number of observations the result interpolates between the two
/// neighboring order statistics.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    debug_assert!((0.0..=1.0).contains(&q));

    if sorted.len() == 1 {
        return sorted[0];
    }

    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let frac = pos - lo as f64;

    if frac == 0.0 {
        sorted[lo]
    } else {
        sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
    }
}

/// Median of pre-sorted values.
pub fn median(sorted: &[f64]) -> f64 {
    percentile(sorted, 0.5)
}

/// Most frequent value of pre-sorted values.
///
/// Ties are broken toward the smallest value: a later run only wins with a
/// strictly higher count, so the first (smallest) modal value is kept.
/// Returns `None` for an empty slice.
pub fn mode(sorted: &[f64]) -> Option<f64> {
    let first = *sorted.first()?;

    let mut best_value = first;
    let mut best_count = 0usize;
    let mut run_value = first;
    let mut run_count = 0usize;

    for &v in sorted {
        if v == run_value {
            run_count += 1;
        } else {
            run_value = v;
            run_count = 1;
        }
        if run_count > best_count {
            best_count = run_count;
            best_value = run_value;
        }
    }

    Some(best_value)
}

/// Sample variance (n−1 denominator); `None` for fewer than two values.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some(sum_sq / (values.len() - 1) as f64)
}

/// Sample standard deviation; `None` for fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// 95% normal-approximation confidence half-width on the mean:
/// `1.96 × std_dev / √count`.
pub fn ci_half_width(std_dev: f64, count: usize) -> f64 {
    1.96 * std_dev / (count as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_mean() {
        assert!((mean(&[70.0, 80.0, 90.0]) - 80.0).abs() < EPS);
        assert!((mean(&[42.0]) - 42.0).abs() < EPS);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert!((median(&[70.0, 80.0, 90.0]) - 80.0).abs() < EPS);
        // Even count interpolates between the middle pair
        assert!((median(&[10.0, 20.0, 30.0, 40.0]) - 25.0).abs() < EPS);
    }

    #[test]
    fn test_percentile_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        // pos = 0.75 * 3 = 2.25 -> 3 + 0.25 * (4 - 3)
        assert!((percentile(&sorted, 0.75) - 3.25).abs() < EPS);
        assert!((percentile(&sorted, 0.25) - 1.75).abs() < EPS);
        assert!((percentile(&sorted, 0.0) - 1.0).abs() < EPS);
        assert!((percentile(&sorted, 1.0) - 4.0).abs() < EPS);
    }

    #[test]
    fn test_mode_tie_breaks_to_smallest() {
        // 80 and 90 both appear twice; the smaller value wins
        assert_eq!(mode(&[80.0, 80.0, 90.0, 90.0]), Some(80.0));
        assert_eq!(mode(&[70.0, 80.0, 80.0, 90.0]), Some(80.0));
        assert_eq!(mode(&[]), None);
        assert_eq!(mode(&[42.0]), Some(42.0));
    }

    #[test]
    fn test_sample_variance_undefined_below_two() {
        assert_eq!(sample_variance(&[]), None);
        assert_eq!(sample_variance(&[80.0]), None);
        assert_eq!(sample_std_dev(&[80.0]), None);
    }

    #[test]
    fn test_variance_is_std_dev_squared() {
        let values = [70.0, 80.0, 90.0];
        let var = sample_variance(&values).unwrap();
        let sd = sample_std_dev(&values).unwrap();
        assert!((var - sd * sd).abs() < 1e-9);
        assert!((var - 100.0).abs() < EPS);
        assert!((sd - 10.0).abs() < EPS);
    }

    #[test]
    fn test_ci_half_width_shrinks_with_count() {
        let sd = 10.0;
        let mut prev = f64::INFINITY;
        for count in [2usize, 3, 5, 10, 100] {
            let ci = ci_half_width(sd, count);
            assert!(ci < prev, "CI must tighten as the sample grows");
            prev = ci;
        }
        // Known value from the three-student scenario
        assert!((ci_half_width(10.0, 3) - 11.3160).abs() < 1e-3);
    }
}

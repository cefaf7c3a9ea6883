//! Element-wise arithmetic over projected value series

/// Every value multiplied by `factor`
pub fn scale(values: &[f64], factor: f64) -> Vec<f64> {
    values.iter().map(|v| v * factor).collect()
}

/// `a[i] - b[i]`
pub fn difference(a: &[f64], b: &[f64]) -> Vec<f64> {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x - y).collect()
}

/// Row-wise sum of several series of equal length
pub fn sum(parts: &[&[f64]]) -> Vec<f64> {
    let len = parts.first().map_or(0, |p| p.len());
    (0..len)
        .map(|i| parts.iter().map(|p| p[i]).sum())
        .collect()
}

/// `value` repeated `len` times
pub fn constant(value: f64, len: usize) -> Vec<f64> {
    vec![value; len]
}

/// Day-count ratio: (annual flow / days per year) * days outstanding
pub fn day_count(flows: &[f64], days_outstanding: f64, days_per_year: f64) -> Vec<f64> {
    flows
        .iter()
        .map(|flow| flow / days_per_year * days_outstanding)
        .collect()
}

/// `base * (1 + rate)^i` for i = 1..=periods
pub fn compound(base: f64, rate: f64, periods: usize) -> Vec<f64> {
    (1..=periods as i32).map(|i| base * (1.0 + rate).powi(i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_compound() {
        let values = compound(1000.0, 0.10, 3);
        assert_relative_eq!(values[0], 1100.0, epsilon = 1e-9);
        assert_relative_eq!(values[1], 1210.0, epsilon = 1e-9);
        assert_relative_eq!(values[2], 1331.0, epsilon = 1e-9);
    }

    #[test]
    fn test_day_count() {
        let values = day_count(&[365.0, 730.0], 30.0, 365.0);
        assert_relative_eq!(values[0], 30.0);
        assert_relative_eq!(values[1], 60.0);
    }

    #[test]
    fn test_sum_and_difference() {
        let a: &[f64] = &[1.0, 2.0];
        let b: &[f64] = &[10.0, 20.0];
        let c: &[f64] = &[100.0, 200.0];
        assert_eq!(sum(&[a, b, c]), vec![111.0, 222.0]);
        assert_eq!(difference(b, a), vec![9.0, 18.0]);
        assert!(sum(&[]).is_empty());
    }
}

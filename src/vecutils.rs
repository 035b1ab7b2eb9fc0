//! Vector utility functions like linspace(), is_non_decreasing()

/// Returns `n` evenly spaced values from `start` to `end` (both included).
///
/// `n == 1` gives `[start]`, `n == 0` gives an empty vector.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Checks that every element is greater than or equal to the previous one.
pub fn is_non_decreasing(v: &[f64]) -> bool {
    v.windows(2).all(|w| w[1] >= w[0])
}

/// Checks that every element is strictly greater than the previous one.
pub fn is_strictly_increasing(v: &[f64]) -> bool {
    v.windows(2).all(|w| w[1] > w[0])
}

/// Checks if two arrays or vectors are almost equal.
///
/// Elements in both containers must be in the same order.
pub fn almost_equal(a: &[f64], b: &[f64], eps: f64) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).all(|(&x, &y)| (x - y).abs() <= eps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace() {
        assert!(almost_equal(&linspace(0., 1., 5), &[0., 0.25, 0.5, 0.75, 1.], 1e-12));
        assert_eq!(linspace(2., 3., 1), vec![2.]);
        assert!(linspace(2., 3., 0).is_empty());
    }

    #[test]
    fn test_linspace_hits_end_exactly() {
        let v = linspace(0., std::f64::consts::TAU, 7);
        assert_eq!(*v.last().unwrap(), std::f64::consts::TAU);
    }

    #[test]
    fn test_monotonic_checks() {
        assert!(is_non_decreasing(&[0., 0., 1., 2.]));
        assert!(!is_non_decreasing(&[0., 1., 0.5]));
        assert!(is_strictly_increasing(&[0., 1., 3.]));
        assert!(!is_strictly_increasing(&[0., 1., 1.]));
        assert!(is_non_decreasing(&[]));
    }

    #[test]
    fn test_almost_equal_different_lengths() {
        assert!(!almost_equal(&[1.0, 2.0], &[1.0, 2.0, 3.0], 1e-10));
    }
}

//! Euclidean distance.

use crate::metric::MetricDistance;

/// Euclidean (L2) distance measure.
#[derive(Debug, Clone, Copy, Default)]
pub struct EuclideanDistance;

impl EuclideanDistance {
    /// Squared Euclidean distance (avoids the square root).
    #[inline]
    pub fn distance_squared(a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

        a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
    }
}

impl MetricDistance for EuclideanDistance {
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        Self::distance_squared(a, b).sqrt()
    }

    fn name(&self) -> &'static str {
        "euclidean"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical() {
        let a = [0.3, 0.7, 0.1];
        assert!(EuclideanDistance.distance(&a, &a).abs() < 1e-12);
    }

    #[test]
    fn test_pythagoras() {
        let d = EuclideanDistance.distance(&[0.0, 0.0], &[3.0, 4.0]);
        assert!((d - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_symmetry() {
        let a = [0.1, 0.9, 0.4];
        let b = [0.5, 0.2, 0.8];
        assert_eq!(EuclideanDistance.distance(&a, &b), EuclideanDistance.distance(&b, &a));
    }

    #[test]
    fn test_squared() {
        let d2 = EuclideanDistance::distance_squared(&[1.0, 1.0], &[0.0, 0.0]);
        assert!((d2 - 2.0).abs() < 1e-12);
    }
}

//! Manhattan distance.

use crate::metric::MetricDistance;

/// Manhattan (L1, city block) distance measure.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManhattanDistance;

impl MetricDistance for ManhattanDistance {
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");

        a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
    }

    fn name(&self) -> &'static str {
        "manhattan"
    }
}

//! Distance measures between prototype vectors.

mod euclidean;
mod manhattan;

pub use euclidean::EuclideanDistance;
pub use manhattan::ManhattanDistance;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Trait for distance measures between two vectors of equal length.
///
/// Implementations must be symmetric and return `0.0` for identical inputs.
pub trait MetricDistance: Send + Sync {
    /// Computes the distance between `a` and `b`.
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Enum for the available distance measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MetricType {
    /// Euclidean (L2) distance.
    #[default]
    Euclidean,
    /// Manhattan (L1) distance.
    Manhattan,
}

impl MetricType {
    /// Builds the shared strategy object for this measure.
    pub fn build(&self) -> Arc<dyn MetricDistance> {
        match self {
            MetricType::Euclidean => Arc::new(EuclideanDistance),
            MetricType::Manhattan => Arc::new(ManhattanDistance),
        }
    }

    /// Computes the distance using this measure.
    pub fn compute(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            MetricType::Euclidean => EuclideanDistance.distance(a, b),
            MetricType::Manhattan => ManhattanDistance.distance(a, b),
        }
    }
}

/// Distance across the hypercube `[dmin, dmax]^dimensionality` under `metric`.
///
/// Used to normalize quantization errors of inputs known to lie in that manifold.
pub fn manifold_size(metric: &dyn MetricDistance, dimensionality: usize, dmin: f64, dmax: f64) -> f64 {
    metric.distance(&vec![dmin; dimensionality], &vec![dmax; dimensionality])
}

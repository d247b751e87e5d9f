//! Append-only time series.

use crate::error::{Result, SomError};
use serde::{Deserialize, Serialize};

/// Chronologically ordered `(time, value)` samples.
///
/// Equal timestamps are allowed; going back in time is not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    points: Vec<(u64, f64)>,
}

impl TimeSeries {
    /// Creates an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sample.
    pub fn push(&mut self, time: u64, value: f64) -> Result<()> {
        if let Some(&(last, _)) = self.points.last() {
            if time < last {
                return Err(SomError::NonMonotonicTime { time, last });
            }
        }
        self.points.push((time, value));
        Ok(())
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The most recent sample.
    pub fn last(&self) -> Option<(u64, f64)> {
        self.points.last().copied()
    }

    /// All samples in time order.
    pub fn points(&self) -> &[(u64, f64)] {
        &self.points
    }

    /// Iterator over the values in time order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|&(_, v)| v)
    }

    /// Samples with `from <= time <= to`.
    pub fn between(&self, from: u64, to: u64) -> &[(u64, f64)] {
        let start = self.points.partition_point(|&(t, _)| t < from);
        let end = self.points.partition_point(|&(t, _)| t <= to);
        if start >= end {
            &[]
        } else {
            &self.points[start..end]
        }
    }

    /// Mean of all values.
    pub fn mean(&self) -> Option<f64> {
        if self.points.is_empty() {
            None
        } else {
            Some(self.values().sum::<f64>() / self.points.len() as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_last() {
        let mut series = TimeSeries::new();
        assert!(series.last().is_none());

        series.push(0, 1.0).unwrap();
        series.push(3, 2.0).unwrap();
        series.push(3, 4.0).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.last(), Some((3, 4.0)));
    }

    #[test]
    fn test_rejects_going_back() {
        let mut series = TimeSeries::new();
        series.push(5, 1.0).unwrap();
        assert!(matches!(
            series.push(4, 1.0),
            Err(SomError::NonMonotonicTime { time: 4, last: 5 })
        ));
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_between() {
        let mut series = TimeSeries::new();
        for t in 0..10 {
            series.push(t, t as f64).unwrap();
        }

        let window = series.between(3, 5);
        assert_eq!(window, &[(3, 3.0), (4, 4.0), (5, 5.0)]);
        assert!(series.between(20, 30).is_empty());
        assert!(series.between(5, 3).is_empty());
    }

    #[test]
    fn test_mean() {
        let mut series = TimeSeries::new();
        assert!(series.mean().is_none());
        series.push(0, 1.0).unwrap();
        series.push(1, 3.0).unwrap();
        assert_eq!(series.mean(), Some(2.0));
    }
}

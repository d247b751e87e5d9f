//! Running-mean filters.

use crate::error::{Result, SomError};
use std::collections::VecDeque;

/// Moving average over the last `window` values.
#[derive(Debug, Clone)]
pub struct RunningMean {
    window: usize,
    values: VecDeque<f64>,
    sum: f64,
    since_resum: usize,
}

impl RunningMean {
    /// Creates a filter averaging over `window` values.
    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(SomError::InvalidArgument(
                "running mean window must be positive".to_string(),
            ));
        }
        Ok(Self {
            window,
            values: VecDeque::with_capacity(window),
            sum: 0.0,
            since_resum: 0,
        })
    }

    /// Adds a value and returns the updated mean.
    pub fn add(&mut self, value: f64) -> f64 {
        self.values.push_back(value);
        self.sum += value;

        if self.values.len() > self.window {
            if let Some(old) = self.values.pop_front() {
                self.sum -= old;
            }
        }

        // Re-summing once per window keeps the running sum from drifting
        self.since_resum += 1;
        if self.since_resum >= self.window {
            self.sum = self.values.iter().sum();
            self.since_resum = 0;
        }

        self.sum / self.values.len() as f64
    }

    /// Current mean, `None` before the first value.
    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.sum / self.values.len() as f64)
        }
    }

    /// Number of values currently averaged.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no value has been added yet.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether the window is full.
    pub fn is_full(&self) -> bool {
        self.values.len() == self.window
    }

    /// Window length.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Forgets every value.
    pub fn clear(&mut self) {
        self.values.clear();
        self.sum = 0.0;
        self.since_resum = 0;
    }
}

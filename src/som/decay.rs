//! Decay schedules mapping an iteration index to a parameter value.
//!
//! Every schedule starts at `initial` for `t = 0`, reaches `final_value` at
//! `t = total` and stays there for any later iteration.

use serde::{Deserialize, Serialize};

/// Enum for the available decay schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DecayFunction {
    /// Geometric interpolation, `initial * (final / initial)^(t / total)`.
    /// Both endpoints must be positive.
    #[default]
    Exponential,
    /// Affine interpolation between the endpoints.
    Linear,
    /// `initial / (1 + (initial / final - 1) * t / total)`.
    InverseTime,
}

impl DecayFunction {
    /// Value of the schedule at iteration `t` of `total`.
    #[inline]
    pub fn value(&self, initial: f64, final_value: f64, t: usize, total: usize) -> f64 {
        match self {
            DecayFunction::Exponential => exponential(initial, final_value, t, total),
            DecayFunction::Linear => linear(initial, final_value, t, total),
            DecayFunction::InverseTime => inverse_time(initial, final_value, t, total),
        }
    }
}

/// Exponential (geometric) decay.
#[inline]
pub fn exponential(initial: f64, final_value: f64, t: usize, total: usize) -> f64 {
    if t >= total {
        return final_value;
    }
    initial * (final_value / initial).powf(progress(t, total))
}

/// Linear decay.
#[inline]
pub fn linear(initial: f64, final_value: f64, t: usize, total: usize) -> f64 {
    if t >= total {
        return final_value;
    }
    initial + (final_value - initial) * progress(t, total)
}

/// Inverse-time decay.
#[inline]
pub fn inverse_time(initial: f64, final_value: f64, t: usize, total: usize) -> f64 {
    if t >= total {
        return final_value;
    }
    initial / (1.0 + (initial / final_value - 1.0) * progress(t, total))
}

#[inline]
fn progress(t: usize, total: usize) -> f64 {
    t as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [DecayFunction; 3] = [
        DecayFunction::Exponential,
        DecayFunction::Linear,
        DecayFunction::InverseTime,
    ];

    #[test]
    fn test_endpoints() {
        for decay in ALL {
            assert_eq!(decay.value(0.5, 0.01, 0, 100), 0.5, "{:?}", decay);
            assert_eq!(decay.value(0.5, 0.01, 100, 100), 0.01, "{:?}", decay);
        }
    }

    #[test]
    fn test_saturation() {
        for decay in ALL {
            assert_eq!(decay.value(0.5, 0.01, 101, 100), 0.01);
            assert_eq!(decay.value(0.5, 0.01, 10_000, 100), 0.01);
        }
        // An empty budget means the final value right away
        assert_eq!(exponential(0.5, 0.01, 0, 0), 0.01);
    }

    #[test]
    fn test_monotone_between_endpoints() {
        for decay in ALL {
            let mut previous = decay.value(4.0, 1.0, 0, 50);
            for t in 1..=50 {
                let current = decay.value(4.0, 1.0, t, 50);
                assert!(current <= previous, "{:?} not monotone at {}", decay, t);
                assert!(current >= 1.0);
                previous = current;
            }
        }
    }

    #[test]
    fn test_linear_is_affine() {
        let a = linear(1.0, 0.0, 10, 40);
        let b = linear(1.0, 0.0, 20, 40);
        let c = linear(1.0, 0.0, 30, 40);
        assert!(((b - a) - (c - b)).abs() < 1e-12);
        assert!((b - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_exponential_midpoint() {
        // Geometric mean of the endpoints
        let mid = exponential(1.0, 0.01, 50, 100);
        assert!((mid - 0.1).abs() < 1e-12);
    }
}

//! Neighborhood kernels and the influence cut-off shared by all update rules.
//!
//! A kernel maps a lattice distance and a radius to an influence in `[0, 1]`.
//! Update loops skip neurons whose influence falls outside
//! `[MIN_INFLUENCE, 1]` or is not finite; this prunes the far field.

use serde::{Deserialize, Serialize};

/// Smallest influence that still moves a prototype.
pub const MIN_INFLUENCE: f64 = 0.01;

/// Enum for the available neighborhood kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NeighboringFunction {
    /// `exp(-d² / (2 r²))`.
    #[default]
    Gaussian,
    /// 1 inside the radius, 0 outside.
    Bubble,
    /// Linear fall-off from 1 at the center to 0 at the radius.
    Pyramid,
}

impl NeighboringFunction {
    /// Influence at lattice distance `distance` for radius `radius`.
    #[inline]
    pub fn value(&self, distance: f64, radius: f64) -> f64 {
        match self {
            NeighboringFunction::Gaussian => gaussian(distance, radius),
            NeighboringFunction::Bubble => bubble(distance, radius),
            NeighboringFunction::Pyramid => pyramid(distance, radius),
        }
    }
}

/// Gaussian kernel. The center always gets full influence, even for a zero radius.
#[inline]
pub fn gaussian(distance: f64, radius: f64) -> f64 {
    if distance == 0.0 {
        return 1.0;
    }
    (-(distance * distance) / (2.0 * radius * radius)).exp()
}

/// Bubble (step) kernel.
#[inline]
pub fn bubble(distance: f64, radius: f64) -> f64 {
    if distance <= radius {
        1.0
    } else {
        0.0
    }
}

/// Pyramid (triangular) kernel.
#[inline]
pub fn pyramid(distance: f64, radius: f64) -> f64 {
    if distance == 0.0 {
        return 1.0;
    }
    (1.0 - distance / radius).max(0.0)
}

/// Whether an influence value should be applied.
#[inline]
pub fn is_effective(influence: f64) -> bool {
    influence.is_finite() && (MIN_INFLUENCE..=1.0).contains(&influence)
}

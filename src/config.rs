//! Configuration for maps, learning algorithms and the StreamART2A engine.
//!
//! Every algorithm consumes one of these plain structs. They are validated once,
//! when the algorithm is constructed, and never mutated afterwards.

use crate::error::{Result, SomError};
use crate::lattice::LatticeType;
use crate::metric::MetricType;
use crate::som::{DecayFunction, NeighboringFunction};
use serde::{Deserialize, Serialize};

/// Aggregate configuration, handy for callers that keep all settings together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Map geometry.
    pub som: SomConfig,

    /// Offline classic (sequential) learning.
    pub classic: ClassicLearningConfig,

    /// Offline batch learning.
    pub batch: BatchLearningConfig,

    /// UbiSOM streaming learning.
    pub ubisom: UbiSomConfig,

    /// DSOM streaming learning.
    pub dsom: DsomConfig,

    /// PLSOM streaming learning.
    pub plsom: PlsomConfig,

    /// StreamART2A clustering.
    pub art: StreamArt2aConfig,
}

impl Config {
    /// Validates every section.
    pub fn validate(&self) -> Result<()> {
        self.som.validate()?;
        self.classic.validate()?;
        self.batch.validate()?;
        self.ubisom.validate()?;
        self.dsom.validate()?;
        self.plsom.validate()?;
        self.art.validate()
    }
}

/// Self-Organizing Map geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SomConfig {
    /// Number of grid columns.
    /// Default: 10.
    pub width: usize,

    /// Number of grid rows.
    /// Default: 10.
    pub height: usize,

    /// Dimensionality of the prototype vectors.
    /// Default: 2.
    pub dimensionality: usize,

    /// Grid topology.
    /// Default: rectangular, bounded.
    pub lattice: LatticeType,

    /// Distance between prototypes and inputs.
    /// Default: Euclidean.
    pub metric: MetricType,

    /// Random seed for prototype initialization.
    /// Default: None (random).
    pub seed: Option<u64>,
}

impl Default for SomConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            dimensionality: 2,
            lattice: LatticeType::Rectangular,
            metric: MetricType::Euclidean,
            seed: None,
        }
    }
}

impl SomConfig {
    /// Returns the total number of neurons in the SOM.
    #[inline]
    pub fn total_neurons(&self) -> usize {
        self.width * self.height
    }

    /// Checks that the grid and prototypes are non-degenerate.
    pub fn validate(&self) -> Result<()> {
        require_positive_count("width", self.width)?;
        require_positive_count("height", self.height)?;
        require_positive_count("dimensionality", self.dimensionality)?;
        self.lattice.build(self.width, self.height).validate()
    }
}

/// Offline classic (Kohonen, sequential) learning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassicLearningConfig {
    /// Epochs of the ordering phase; parameters decay over these.
    /// Default: 10.
    pub order_epochs: usize,

    /// Epochs of the fine-tuning phase; parameters stay at their final values.
    /// Default: 10.
    pub fine_tune_epochs: usize,

    /// Initial learning rate.
    /// Default: 0.1.
    pub initial_learning_rate: f64,

    /// Final learning rate.
    /// Default: 0.01.
    pub final_learning_rate: f64,

    /// Initial neighborhood radius in lattice units.
    /// Default: 5.0.
    pub initial_radius: f64,

    /// Final neighborhood radius in lattice units.
    /// Default: 1.0.
    pub final_radius: f64,

    /// Shuffle the dataset before every epoch.
    /// Default: true.
    pub shuffle: bool,

    /// Decay schedule for both parameters.
    /// Default: exponential.
    pub decay: DecayFunction,

    /// Neighborhood kernel.
    /// Default: gaussian.
    pub neighborhood: NeighboringFunction,

    /// Random seed for shuffling.
    /// Default: None (random).
    pub seed: Option<u64>,
}

impl Default for ClassicLearningConfig {
    fn default() -> Self {
        Self {
            order_epochs: 10,
            fine_tune_epochs: 10,
            initial_learning_rate: 0.1,
            final_learning_rate: 0.01,
            initial_radius: 5.0,
            final_radius: 1.0,
            shuffle: true,
            decay: DecayFunction::Exponential,
            neighborhood: NeighboringFunction::Gaussian,
            seed: None,
        }
    }
}

impl ClassicLearningConfig {
    /// Total number of epochs (ordering plus fine tuning).
    #[inline]
    pub fn total_epochs(&self) -> usize {
        self.order_epochs + self.fine_tune_epochs
    }

    /// Checks epoch counts, learning rates and radii.
    pub fn validate(&self) -> Result<()> {
        if self.total_epochs() == 0 {
            return Err(SomError::InvalidArgument(
                "classic learning needs at least one epoch".to_string(),
            ));
        }
        require_rate("initial_learning_rate", self.initial_learning_rate)?;
        require_rate("final_learning_rate", self.final_learning_rate)?;
        require_positive("initial_radius", self.initial_radius)?;
        require_positive("final_radius", self.final_radius)
    }
}

/// Offline batch learning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchLearningConfig {
    /// Number of passes over the dataset.
    /// Default: 20.
    pub epochs: usize,

    /// Initial neighborhood radius in lattice units.
    /// Default: 5.0.
    pub initial_radius: f64,

    /// Final neighborhood radius in lattice units, reached at the last epoch.
    /// Default: 1.0.
    pub final_radius: f64,

    /// Decay schedule for the radius.
    /// Default: exponential.
    pub decay: DecayFunction,

    /// Neighborhood kernel.
    /// Default: gaussian.
    pub neighborhood: NeighboringFunction,
}

impl Default for BatchLearningConfig {
    fn default() -> Self {
        Self {
            epochs: 20,
            initial_radius: 5.0,
            final_radius: 1.0,
            decay: DecayFunction::Exponential,
            neighborhood: NeighboringFunction::Gaussian,
        }
    }
}

impl BatchLearningConfig {
    /// Checks the epoch count and radii.
    pub fn validate(&self) -> Result<()> {
        require_positive_count("epochs", self.epochs)?;
        require_positive("initial_radius", self.initial_radius)?;
        require_positive("final_radius", self.final_radius)
    }
}

/// UbiSOM streaming learning.
///
/// Radii are expressed as a fraction of the longest grid side, so the same
/// settings behave alike on maps of different sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UbiSomConfig {
    /// Learning rate at the start of the ordering phase.
    /// Default: 0.1.
    pub initial_learning_rate: f64,

    /// Learning rate floor (end of ordering, drift-saturated converging).
    /// Default: 0.08.
    pub final_learning_rate: f64,

    /// Relative radius at the start of the ordering phase.
    /// Default: 0.6.
    pub initial_radius: f64,

    /// Relative radius floor.
    /// Default: 0.2.
    pub final_radius: f64,

    /// Iterations of the ordering phase, also the number of consecutive
    /// saturated iterations that send the converging phase back to ordering,
    /// and the length of the drift observation window.
    /// Default: 2000.
    pub t: usize,

    /// Drift above which the converging phase uses the floor parameters.
    /// Default: 0.7.
    pub drift_threshold: f64,

    /// Weight of the quantization error against neuron utility in the drift.
    /// Default: 0.7.
    pub beta: f64,

    /// Lower bound of the input manifold.
    /// Default: 0.0.
    pub dmin: f64,

    /// Upper bound of the input manifold.
    /// Default: 1.0.
    pub dmax: f64,
}

impl Default for UbiSomConfig {
    fn default() -> Self {
        Self {
            initial_learning_rate: 0.1,
            final_learning_rate: 0.08,
            initial_radius: 0.6,
            final_radius: 0.2,
            t: 2000,
            drift_threshold: 0.7,
            beta: 0.7,
            dmin: 0.0,
            dmax: 1.0,
        }
    }
}

impl UbiSomConfig {
    /// Checks learning rates, radii, window length and manifold bounds.
    pub fn validate(&self) -> Result<()> {
        require_rate("initial_learning_rate", self.initial_learning_rate)?;
        require_rate("final_learning_rate", self.final_learning_rate)?;
        require_positive("initial_radius", self.initial_radius)?;
        require_positive("final_radius", self.final_radius)?;
        require_positive_count("t", self.t)?;
        require_positive("drift_threshold", self.drift_threshold)?;
        if !(0.0..=1.0).contains(&self.beta) {
            return Err(SomError::InvalidArgument(format!(
                "beta must lie in [0, 1], got {}",
                self.beta
            )));
        }
        require_manifold(self.dmin, self.dmax)
    }
}

/// DSOM (dynamic SOM) streaming learning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DsomConfig {
    /// Elasticity of the map; larger values widen the neighborhood.
    /// Default: 1.0.
    pub plasticity: f64,

    /// Constant learning rate.
    /// Default: 0.1.
    pub epsilon: f64,
}

impl Default for DsomConfig {
    fn default() -> Self {
        Self {
            plasticity: 1.0,
            epsilon: 0.1,
        }
    }
}

impl DsomConfig {
    /// Checks that both parameters are positive.
    pub fn validate(&self) -> Result<()> {
        require_positive("plasticity", self.plasticity)?;
        require_positive("epsilon", self.epsilon)
    }
}

/// PLSOM (parameter-less SOM) streaming learning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlsomConfig {
    /// Neighborhood size, in lattice units, reached when the normalized error
    /// is 1. Default: None (the longest grid side).
    pub neighborhood_range: Option<f64>,
}

impl PlsomConfig {
    /// Checks the neighborhood range when one is set.
    pub fn validate(&self) -> Result<()> {
        match self.neighborhood_range {
            Some(range) => require_positive("neighborhood_range", range),
            None => Ok(()),
        }
    }
}

/// StreamART2A streaming clustering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamArt2aConfig {
    /// Dimensionality of the stream.
    /// Default: 2.
    pub dimensionality: usize,

    /// Maximum number of micro-categories (`K`).
    /// Default: 100.
    pub capacity: usize,

    /// Maximum number of categories created per landmark window (`q`).
    /// Default: 10.
    pub max_new_per_window: usize,

    /// Number of consecutive inputs forming one landmark window.
    /// Default: 100.
    pub landmark_window_size: usize,

    /// Fraction of the distance to the input a resonating prototype moves.
    /// Default: 0.05.
    pub learning_rate: f64,

    /// Vigilance radius as a fraction of the input manifold size.
    /// Default: 0.1.
    pub vigilance: f64,

    /// Lower bound of the input manifold.
    /// Default: 0.0.
    pub dmin: f64,

    /// Upper bound of the input manifold.
    /// Default: 1.0.
    pub dmax: f64,

    /// Distance between inputs and prototypes.
    /// Default: Euclidean.
    pub metric: MetricType,

    /// Running-mean window of the fit-quality series (drift extension).
    /// Default: 50.
    pub fit_window: usize,
}

impl Default for StreamArt2aConfig {
    fn default() -> Self {
        Self {
            dimensionality: 2,
            capacity: 100,
            max_new_per_window: 10,
            landmark_window_size: 100,
            learning_rate: 0.05,
            vigilance: 0.1,
            dmin: 0.0,
            dmax: 1.0,
            metric: MetricType::Euclidean,
            fit_window: 50,
        }
    }
}

impl StreamArt2aConfig {
    /// Checks capacities, window sizes, rates and manifold bounds.
    pub fn validate(&self) -> Result<()> {
        require_positive_count("dimensionality", self.dimensionality)?;
        require_positive_count("capacity", self.capacity)?;
        require_positive_count("max_new_per_window", self.max_new_per_window)?;
        require_positive_count("landmark_window_size", self.landmark_window_size)?;
        require_positive_count("fit_window", self.fit_window)?;
        require_rate("learning_rate", self.learning_rate)?;
        require_rate("vigilance", self.vigilance)?;
        require_manifold(self.dmin, self.dmax)
    }
}

fn require_positive_count(name: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(SomError::InvalidArgument(format!("{} must be positive", name)));
    }
    Ok(())
}

fn require_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SomError::InvalidArgument(format!(
            "{} must be positive and finite, got {}",
            name, value
        )));
    }
    Ok(())
}

fn require_rate(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 || value > 1.0 {
        return Err(SomError::InvalidArgument(format!(
            "{} must lie in (0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

fn require_manifold(dmin: f64, dmax: f64) -> Result<()> {
    if !dmin.is_finite() || !dmax.is_finite() || dmin >= dmax {
        return Err(SomError::InvalidArgument(format!(
            "input manifold bounds must satisfy dmin < dmax, got [{}, {}]",
            dmin, dmax
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_total_neurons() {
        let config = SomConfig {
            width: 4,
            height: 3,
            ..Default::default()
        };
        assert_eq!(config.total_neurons(), 12);
    }

    #[test]
    fn test_zero_sized_grid_rejected() {
        let config = SomConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SomError::InvalidArgument(_))));
    }

    #[test]
    fn test_hexagonal_torus_needs_even_rows() {
        let mut config = SomConfig {
            width: 5,
            height: 3,
            lattice: LatticeType::HexagonalToroidal,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SomError::InvalidArgument(_))));

        config.height = 4;
        assert!(config.validate().is_ok());
        config.height = 3;
        config.lattice = LatticeType::RectangularToroidal;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_learning_rate_range() {
        let config = ClassicLearningConfig {
            initial_learning_rate: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ClassicLearningConfig {
            final_learning_rate: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_classic_needs_epochs() {
        let config = ClassicLearningConfig {
            order_epochs: 0,
            fine_tune_epochs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ClassicLearningConfig {
            order_epochs: 0,
            fine_tune_epochs: 3,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_manifold_bounds() {
        let config = UbiSomConfig {
            dmin: 1.0,
            dmax: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_art_caps_positive() {
        let config = StreamArt2aConfig {
            max_new_per_window: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = StreamArt2aConfig {
            capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_plsom_range() {
        assert!(PlsomConfig::default().validate().is_ok());
        let config = PlsomConfig {
            neighborhood_range: Some(-1.0),
        };
        assert!(config.validate().is_err());
    }
}

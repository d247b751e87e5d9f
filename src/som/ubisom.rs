//! UbiSOM: a streaming SOM that tunes its own learning parameters.
//!
//! The model alternates between two phases:
//!
//! - **Ordering**: for `T` iterations the learning rate and radius decay
//!   exponentially from their initial to their final values, unfolding the map.
//! - **Converging**: parameters follow a drift signal. Above the drift
//!   threshold they sit at their floor values; below it they scale linearly
//!   with the drift. When the radius stays at its floor for `T` consecutive
//!   iterations the map cannot keep up with the stream and ordering restarts.
//!
//! Radii are relative to the longest grid side. The drift signal is supplied
//! by a [`DriftEstimator`]; [`QuantizationDrift`] is the default.
//!
//! References:
//! - Silva & Marques (2015): "Ubiquitous Self-Organizing Map: Learning
//!   Concept-Drifting Data Streams"

use crate::config::UbiSomConfig;
use crate::error::{Result, SomError};
use crate::metric::manifold_size;
use crate::series::RunningMean;
use crate::som::neighborhood::{gaussian, is_effective};
use crate::som::streaming::StreamingSom;
use crate::som::SelfOrganizingMap;
use log::debug;
use std::collections::VecDeque;

/// Radius distance below which the converging phase counts as saturated.
pub const RADIUS_TOLERANCE: f64 = 1e-4;

/// Learning rate and relative radius applied to one input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearningParameters {
    /// Learning rate.
    pub learning_rate: f64,
    /// Radius as a fraction of the longest grid side.
    pub radius: f64,
}

/// Phase of a [`UbiSom`] together with the counter that phase keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UbiSomState {
    /// Parameters decay with the iterations spent in this phase.
    Ordering {
        /// Inputs processed since the phase started.
        processed_iterations: usize,
    },
    /// Parameters follow the drift signal.
    Converging {
        /// Consecutive inputs with the radius at its floor.
        parameters_high_count: usize,
    },
}

impl Default for UbiSomState {
    fn default() -> Self {
        UbiSomState::Ordering {
            processed_iterations: 0,
        }
    }
}

impl UbiSomState {
    /// Whether this is the ordering phase.
    pub fn is_ordering(&self) -> bool {
        matches!(self, UbiSomState::Ordering { .. })
    }

    /// Whether this is the converging phase.
    pub fn is_converging(&self) -> bool {
        matches!(self, UbiSomState::Converging { .. })
    }

    /// Parameters for the current input and the state for the next one.
    pub fn step(self, drift: f64, config: &UbiSomConfig) -> (UbiSomState, LearningParameters) {
        match self {
            UbiSomState::Ordering { processed_iterations } => {
                let progress = processed_iterations as f64 / config.t as f64;
                let params = LearningParameters {
                    learning_rate: decay(config.initial_learning_rate, config.final_learning_rate, progress),
                    radius: decay(config.initial_radius, config.final_radius, progress),
                };

                let processed_iterations = processed_iterations + 1;
                let next = if processed_iterations >= config.t {
                    UbiSomState::Converging {
                        parameters_high_count: 0,
                    }
                } else {
                    UbiSomState::Ordering { processed_iterations }
                };
                (next, params)
            }
            UbiSomState::Converging { parameters_high_count } => {
                let params = if drift > config.drift_threshold {
                    LearningParameters {
                        learning_rate: config.final_learning_rate,
                        radius: config.final_radius,
                    }
                } else {
                    LearningParameters {
                        learning_rate: drift * (config.final_learning_rate / config.drift_threshold),
                        radius: drift * (config.final_radius / config.drift_threshold),
                    }
                };

                let parameters_high_count = if (params.radius - config.final_radius).abs() < RADIUS_TOLERANCE {
                    parameters_high_count + 1
                } else {
                    0
                };
                let next = if parameters_high_count >= config.t {
                    UbiSomState::Ordering {
                        processed_iterations: 0,
                    }
                } else {
                    UbiSomState::Converging { parameters_high_count }
                };
                (next, params)
            }
        }
    }
}

#[inline]
fn decay(initial: f64, final_value: f64, progress: f64) -> f64 {
    initial * (final_value / initial).powf(progress)
}

/// Source of the drift signal consumed by the converging phase.
///
/// The estimator sees every input before parameters are chosen for it.
pub trait DriftEstimator: Send {
    /// Records the BMU of an input and its quantization error.
    fn observe(&mut self, som: &SelfOrganizingMap, bmu: usize, quantization_error: f64);

    /// Current drift, on the same scale as the drift threshold.
    fn drift(&self) -> f64;

    /// Fails if the estimator cannot observe `som`.
    fn check_map(&self, _som: &SelfOrganizingMap) -> Result<()> {
        Ok(())
    }
}

/// Drift from recent quantization error and neuron utility.
///
/// `drift = beta * mean(qe / manifold) + (1 - beta) * (1 - utility)` over the
/// last `T` inputs, where utility is the fraction of neurons that were BMU at
/// least once in that window.
#[derive(Debug, Clone)]
pub struct QuantizationDrift {
    beta: f64,
    manifold: f64,
    dimensionality: usize,
    errors: RunningMean,
    recent_bmus: VecDeque<usize>,
    bmu_counts: Vec<usize>,
    active_neurons: usize,
}

impl QuantizationDrift {
    /// Builds an estimator sized for `som`.
    pub fn for_map(som: &SelfOrganizingMap, config: &UbiSomConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            beta: config.beta,
            manifold: manifold_size(som.metric(), som.dimensionality(), config.dmin, config.dmax),
            dimensionality: som.dimensionality(),
            errors: RunningMean::new(config.t)?,
            recent_bmus: VecDeque::with_capacity(config.t),
            bmu_counts: vec![0; som.len()],
            active_neurons: 0,
        })
    }

    /// Fraction of neurons that won at least once in the current window.
    pub fn utility(&self) -> f64 {
        if self.bmu_counts.is_empty() {
            return 0.0;
        }
        self.active_neurons as f64 / self.bmu_counts.len() as f64
    }

    /// Mean normalized quantization error over the current window.
    pub fn mean_error(&self) -> Option<f64> {
        self.errors.mean()
    }
}

impl DriftEstimator for QuantizationDrift {
    fn observe(&mut self, _som: &SelfOrganizingMap, bmu: usize, quantization_error: f64) {
        self.errors.add(quantization_error / self.manifold);

        if self.recent_bmus.len() == self.errors.window() {
            if let Some(expired) = self.recent_bmus.pop_front() {
                self.bmu_counts[expired] -= 1;
                if self.bmu_counts[expired] == 0 {
                    self.active_neurons -= 1;
                }
            }
        }
        if self.bmu_counts[bmu] == 0 {
            self.active_neurons += 1;
        }
        self.bmu_counts[bmu] += 1;
        self.recent_bmus.push_back(bmu);
    }

    fn drift(&self) -> f64 {
        match self.errors.mean() {
            Some(error) => self.beta * error + (1.0 - self.beta) * (1.0 - self.utility()),
            None => 0.0,
        }
    }

    fn check_map(&self, som: &SelfOrganizingMap) -> Result<()> {
        if self.bmu_counts.len() != som.len() || self.dimensionality != som.dimensionality() {
            return Err(SomError::InvalidArgument(format!(
                "drift estimator sized for {} neurons of dimension {}, map has {} of dimension {}",
                self.bmu_counts.len(),
                self.dimensionality,
                som.len(),
                som.dimensionality()
            )));
        }
        Ok(())
    }
}

/// Drift value set from outside the model.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedDrift {
    value: f64,
}

impl FixedDrift {
    /// Creates a source reporting `value`.
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    /// Changes the reported value.
    pub fn set(&mut self, value: f64) {
        self.value = value;
    }
}

impl DriftEstimator for FixedDrift {
    fn observe(&mut self, _som: &SelfOrganizingMap, _bmu: usize, _quantization_error: f64) {}

    fn drift(&self) -> f64 {
        self.value
    }
}

/// Streaming UbiSOM model.
pub struct UbiSom<D: DriftEstimator = QuantizationDrift> {
    som: SelfOrganizingMap,
    config: UbiSomConfig,
    state: UbiSomState,
    drift: D,
    last_parameters: Option<LearningParameters>,
    iterations: u64,
}

impl UbiSom<QuantizationDrift> {
    /// Creates a model in the ordering phase with the default drift estimator.
    pub fn new(som: SelfOrganizingMap, config: UbiSomConfig) -> Result<Self> {
        let drift = QuantizationDrift::for_map(&som, &config)?;
        Self::with_drift(som, config, drift)
    }
}

impl<D: DriftEstimator> UbiSom<D> {
    /// Creates a model in the ordering phase with a custom drift source.
    pub fn with_drift(som: SelfOrganizingMap, config: UbiSomConfig, drift: D) -> Result<Self> {
        config.validate()?;
        drift.check_map(&som)?;
        Ok(Self {
            som,
            config,
            state: UbiSomState::default(),
            drift,
            last_parameters: None,
            iterations: 0,
        })
    }

    /// Current phase.
    pub fn state(&self) -> UbiSomState {
        self.state
    }

    /// Parameters applied to the last input.
    pub fn last_parameters(&self) -> Option<LearningParameters> {
        self.last_parameters
    }

    /// The drift source.
    pub fn drift_estimator(&self) -> &D {
        &self.drift
    }

    /// Mutable access to the drift source.
    pub fn drift_estimator_mut(&mut self) -> &mut D {
        &mut self.drift
    }

    /// The configuration in use.
    pub fn config(&self) -> &UbiSomConfig {
        &self.config
    }

    /// Consumes the model and returns the trained map.
    pub fn into_som(self) -> SelfOrganizingMap {
        self.som
    }
}

impl<D: DriftEstimator> StreamingSom for UbiSom<D> {
    fn learn(&mut self, input: &[f64]) -> Result<()> {
        self.som.validate_input(input)?;

        let bmu_idx = self.som.best_matching_unit_index(input)?;
        let qe = self
            .som
            .metric()
            .distance(self.som.neurons()[bmu_idx].prototype(), input);
        self.drift.observe(&self.som, bmu_idx, qe);
        let drift = self.drift.drift();

        let (next, params) = self.state.step(drift, &self.config);
        if next.is_ordering() != self.state.is_ordering() {
            debug!(
                "UbiSOM iteration {}: {:?} -> {:?} (drift {:.4})",
                self.iterations, self.state, next, drift
            );
        }
        self.state = next;

        let sigma = params.radius * self.som.width().max(self.som.height()) as f64;
        let alpha = params.learning_rate;
        let bmu_pos = self.som.position_of(bmu_idx);
        self.som.adapt_towards(input, |lattice, _, neuron| {
            let neigh = gaussian(lattice.distance_between(bmu_pos, neuron.position()), sigma);
            is_effective(neigh).then(|| alpha * neigh)
        });
        self.som.prototypes_updated();

        self.last_parameters = Some(params);
        self.iterations += 1;
        Ok(())
    }

    fn som(&self) -> &SelfOrganizingMap {
        &self.som
    }

    fn som_mut(&mut self) -> &mut SelfOrganizingMap {
        &mut self.som
    }

    fn iterations(&self) -> u64 {
        self.iterations
    }
}

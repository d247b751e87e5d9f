//! Offline SOM training over a finite dataset.
//!
//! [`ClassicLearning`] presents samples one at a time (Kohonen's sequential
//! rule); [`BatchLearning`](crate::som::BatchLearning) recomputes every
//! prototype once per epoch. Both can be cancelled between epochs through a
//! [`TrainingControl`].

use crate::config::ClassicLearningConfig;
use crate::dataset::{validate_dataset, Dataset};
use crate::error::Result;
use crate::som::neighborhood::is_effective;
use crate::som::SelfOrganizingMap;
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag shared between a trainer and its controller.
///
/// Trainers check the flag between epochs; an epoch in progress always
/// completes.
#[derive(Debug, Clone, Default)]
pub struct TrainingControl {
    cancelled: Arc<AtomicBool>,
}

impl TrainingControl {
    /// Creates a control that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Summary of an offline training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    /// Fully completed epochs.
    pub epochs_completed: usize,
    /// Samples presented.
    pub iterations: usize,
    /// Learning rate of the last presented sample (sequential learning only).
    pub final_learning_rate: Option<f64>,
    /// Neighborhood radius of the last update.
    pub final_radius: f64,
    /// Whether training stopped because of a cancellation request.
    pub cancelled: bool,
}

/// Training algorithm consuming a map and a finite dataset.
pub trait OfflineLearning {
    /// Trains `som` on `dataset`, checking `control` between epochs.
    fn train_with_control(
        &mut self,
        som: &mut SelfOrganizingMap,
        dataset: &dyn Dataset,
        control: &TrainingControl,
    ) -> Result<TrainingReport>;

    /// Trains `som` on `dataset` until all epochs are done.
    fn train(&mut self, som: &mut SelfOrganizingMap, dataset: &dyn Dataset) -> Result<TrainingReport> {
        self.train_with_control(som, dataset, &TrainingControl::new())
    }
}

/// Classic sequential SOM training with decaying learning rate and radius.
///
/// One iteration counter runs across the ordering and fine-tuning epochs.
/// Both parameters decay over the first `order_epochs * dataset_size`
/// iterations and stay at their final values afterwards.
pub struct ClassicLearning {
    config: ClassicLearningConfig,
    rng: ChaCha8Rng,
}

impl ClassicLearning {
    /// Creates a new trainer with the given configuration.
    pub fn new(config: ClassicLearningConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Self { config, rng })
    }

    /// The configuration in use.
    pub fn config(&self) -> &ClassicLearningConfig {
        &self.config
    }

    /// Learning rate at a given iteration for an ordering budget of `budget` iterations.
    #[inline]
    pub fn learning_rate(&self, iteration: usize, budget: usize) -> f64 {
        self.config.decay.value(
            self.config.initial_learning_rate,
            self.config.final_learning_rate,
            iteration,
            budget,
        )
    }

    /// Neighborhood radius at a given iteration for an ordering budget of `budget` iterations.
    #[inline]
    pub fn radius(&self, iteration: usize, budget: usize) -> f64 {
        self.config
            .decay
            .value(self.config.initial_radius, self.config.final_radius, iteration, budget)
    }
}

impl OfflineLearning for ClassicLearning {
    fn train_with_control(
        &mut self,
        som: &mut SelfOrganizingMap,
        dataset: &dyn Dataset,
        control: &TrainingControl,
    ) -> Result<TrainingReport> {
        validate_dataset(dataset, som.dimensionality())?;

        let items = dataset.items();
        let total_epochs = self.config.total_epochs();
        let budget = self.config.order_epochs * items.len();
        let kernel = self.config.neighborhood;

        info!(
            "Starting classic SOM training: {} + {} epochs on {} samples, {}x{} map",
            self.config.order_epochs,
            self.config.fine_tune_epochs,
            items.len(),
            som.width(),
            som.height()
        );

        let mut order: Vec<usize> = (0..items.len()).collect();
        let mut report = TrainingReport {
            epochs_completed: 0,
            iterations: 0,
            final_learning_rate: None,
            final_radius: self.config.initial_radius,
            cancelled: false,
        };

        for epoch in 0..total_epochs {
            if control.is_cancelled() {
                info!("Training cancelled after {} epochs", report.epochs_completed);
                report.cancelled = true;
                break;
            }

            if self.config.shuffle {
                order.shuffle(&mut self.rng);
            }

            for &idx in &order {
                let input = &items[idx].input;
                let iteration = report.iterations;
                let alpha = self.learning_rate(iteration, budget);
                let sigma = self.radius(iteration, budget);

                let bmu_idx = som.best_matching_unit_index(input)?;
                let bmu_pos = som.position_of(bmu_idx);

                som.adapt_towards(input, |lattice, _, neuron| {
                    let neigh = kernel.value(lattice.distance_between(bmu_pos, neuron.position()), sigma);
                    is_effective(neigh).then(|| alpha * neigh)
                });
                som.prototypes_updated();

                report.iterations += 1;
                report.final_learning_rate = Some(alpha);
                report.final_radius = sigma;
            }

            report.epochs_completed += 1;
            debug!(
                "Epoch {}/{}: lr={:.4}, radius={:.3}",
                epoch + 1,
                total_epochs,
                report.final_learning_rate.unwrap_or(self.config.initial_learning_rate),
                report.final_radius
            );
        }

        info!("SOM training completed after {} iterations", report.iterations);
        Ok(report)
    }
}

//! Batch SOM training.
//!
//! Each epoch finds every sample's BMU against a frozen map, then replaces each
//! prototype by the kernel-weighted mean of all samples:
//!
//! ```text
//! w_j = Σ_i h(d(bmu_i, j), σ) x_i / Σ_i h(d(bmu_i, j), σ)
//! ```
//!
//! There is no learning rate, and the result does not depend on sample order.
//! Neurons that receive no effective influence keep their prototype.
//!
//! References:
//! - Kohonen (2001): "Self-Organizing Maps" (3rd ed.), section 3.14

use crate::config::BatchLearningConfig;
use crate::dataset::{validate_dataset, Dataset};
use crate::error::Result;
use crate::som::neighborhood::is_effective;
use crate::som::training::{OfflineLearning, TrainingControl, TrainingReport};
use crate::som::SelfOrganizingMap;
use log::{debug, info};
use rayon::prelude::*;

/// Per-epoch measurements collected during batch training.
#[derive(Debug, Clone, Default)]
pub struct TrainingMetrics {
    /// Mean quantization error against the map each epoch started from.
    pub quantization_errors: Vec<f64>,
    /// Radius used each epoch.
    pub radii: Vec<f64>,
}

/// Offline batch learning.
pub struct BatchLearning {
    config: BatchLearningConfig,
    metrics: TrainingMetrics,
}

impl BatchLearning {
    /// Creates a new batch trainer.
    pub fn new(config: BatchLearningConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            metrics: TrainingMetrics::default(),
        })
    }

    /// Metrics of the last run.
    pub fn metrics(&self) -> &TrainingMetrics {
        &self.metrics
    }

    /// Radius for a given epoch; the final radius is reached at the last epoch.
    pub fn radius(&self, epoch: usize) -> f64 {
        let span = self.config.epochs.saturating_sub(1);
        if span == 0 {
            return self.config.final_radius;
        }
        self.config
            .decay
            .value(self.config.initial_radius, self.config.final_radius, epoch, span)
    }
}

impl OfflineLearning for BatchLearning {
    fn train_with_control(
        &mut self,
        som: &mut SelfOrganizingMap,
        dataset: &dyn Dataset,
        control: &TrainingControl,
    ) -> Result<TrainingReport> {
        validate_dataset(dataset, som.dimensionality())?;

        let items = dataset.items();
        let dim = som.dimensionality();
        let kernel = self.config.neighborhood;
        self.metrics = TrainingMetrics::default();

        info!(
            "Starting batch SOM training: {} epochs on {} samples, {}x{} map",
            self.config.epochs,
            items.len(),
            som.width(),
            som.height()
        );

        let mut numerators = vec![0.0f64; som.len() * dim];
        let mut denominators = vec![0.0f64; som.len()];
        let mut report = TrainingReport {
            epochs_completed: 0,
            iterations: 0,
            final_learning_rate: None,
            final_radius: self.config.initial_radius,
            cancelled: false,
        };

        for epoch in 0..self.config.epochs {
            if control.is_cancelled() {
                info!("Training cancelled after {} epochs", report.epochs_completed);
                report.cancelled = true;
                break;
            }

            let sigma = self.radius(epoch);

            // BMUs against the map as it was at the start of the epoch
            let frozen: &SelfOrganizingMap = som;
            let bmus: Vec<(usize, f64)> = items
                .par_iter()
                .map(|item| -> Result<(usize, f64)> {
                    let bmu = frozen.best_matching_unit_index(&item.input)?;
                    let qe = frozen.metric().distance(frozen.neurons()[bmu].prototype(), &item.input);
                    Ok((bmu, qe))
                })
                .collect::<Result<Vec<_>>>()?;

            numerators.fill(0.0);
            denominators.fill(0.0);

            for (item, &(bmu, _)) in items.iter().zip(bmus.iter()) {
                let bmu_pos = som.position_of(bmu);
                for (j, neuron) in som.neurons().iter().enumerate() {
                    let neigh = kernel.value(som.lattice().distance_between(bmu_pos, neuron.position()), sigma);
                    if !is_effective(neigh) {
                        continue;
                    }
                    denominators[j] += neigh;
                    let offset = j * dim;
                    for (acc, &x) in numerators[offset..offset + dim].iter_mut().zip(item.input.iter()) {
                        *acc += neigh * x;
                    }
                }
            }

            let mut moved = 0;
            for (j, neuron) in som.neurons_mut().iter_mut().enumerate() {
                let weight = denominators[j];
                if weight <= 0.0 {
                    continue;
                }
                let offset = j * dim;
                for (w, &acc) in neuron.prototype_mut().iter_mut().zip(numerators[offset..offset + dim].iter()) {
                    *w = acc / weight;
                }
                moved += 1;
            }
            som.prototypes_updated();

            let mean_qe = bmus.iter().map(|&(_, qe)| qe).sum::<f64>() / bmus.len() as f64;
            self.metrics.quantization_errors.push(mean_qe);
            self.metrics.radii.push(sigma);

            report.epochs_completed += 1;
            report.iterations += items.len();
            report.final_radius = sigma;

            debug!(
                "Epoch {}/{}: radius={:.3}, qe={:.5}, {} neurons moved",
                epoch + 1,
                self.config.epochs,
                sigma,
                mean_qe,
                moved
            );
        }

        info!("Batch SOM training completed after {} epochs", report.epochs_completed);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SomConfig;
    use crate::dataset::{gaussian_blobs, VecDataset};
    use crate::lattice::LatticeType;
    use crate::metric::MetricType;
    use crate::som::quality::mean_quantization_error;
    use crate::som::NeighboringFunction;

    #[test]
    fn test_radius_schedule() {
        let trainer = BatchLearning::new(BatchLearningConfig {
            epochs: 5,
            initial_radius: 4.0,
            final_radius: 1.0,
            ..Default::default()
        })
        .unwrap();

        assert!((trainer.radius(0) - 4.0).abs() < 1e-12);
        assert_eq!(trainer.radius(4), 1.0);
        assert!(trainer.radius(2) < 4.0 && trainer.radius(2) > 1.0);
    }

    #[test]
    fn test_single_epoch_uses_final_radius() {
        let trainer = BatchLearning::new(BatchLearningConfig {
            epochs: 1,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(trainer.radius(0), 1.0);
    }

    #[test]
    fn test_bubble_of_zero_reach_gives_cluster_means() {
        // With a bubble smaller than one lattice step each neuron becomes the
        // mean of the samples it wins
        let mut som = SelfOrganizingMap::from_prototypes(
            2,
            1,
            vec![vec![0.0], vec![1.0]],
            LatticeType::Rectangular.build(2, 1),
            MetricType::Euclidean.build(),
        )
        .unwrap();
        let dataset = VecDataset::from_inputs(vec![vec![0.1], vec![0.3], vec![0.8], vec![1.0]]).unwrap();

        let mut trainer = BatchLearning::new(BatchLearningConfig {
            epochs: 1,
            initial_radius: 0.5,
            final_radius: 0.5,
            neighborhood: NeighboringFunction::Bubble,
            ..Default::default()
        })
        .unwrap();
        let report = trainer.train(&mut som, &dataset).unwrap();

        assert_eq!(report.epochs_completed, 1);
        assert_eq!(report.iterations, 4);
        assert!((som.neurons()[0].prototype()[0] - 0.2).abs() < 1e-12);
        assert!((som.neurons()[1].prototype()[0] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_batch_reduces_error() {
        let mut som = SelfOrganizingMap::new(&SomConfig {
            width: 4,
            height: 4,
            dimensionality: 2,
            seed: Some(11),
            ..Default::default()
        })
        .unwrap();
        let dataset = gaussian_blobs(
            &[vec![0.2, 0.2], vec![0.8, 0.2], vec![0.5, 0.8]],
            40,
            0.04,
            Some(5),
        )
        .unwrap();
        let before = mean_quantization_error(&som, &dataset).unwrap();

        let mut trainer = BatchLearning::new(BatchLearningConfig {
            epochs: 15,
            initial_radius: 2.0,
            final_radius: 0.5,
            ..Default::default()
        })
        .unwrap();
        trainer.train(&mut som, &dataset).unwrap();

        let after = mean_quantization_error(&som, &dataset).unwrap();
        assert!(after < before, "error went from {} to {}", before, after);
        assert_eq!(trainer.metrics().radii.len(), 15);
        assert_eq!(trainer.metrics().quantization_errors.len(), 15);
    }

    #[test]
    fn test_cancelled_before_start() {
        let mut som = SelfOrganizingMap::new(&SomConfig {
            width: 2,
            height: 2,
            seed: Some(1),
            ..Default::default()
        })
        .unwrap();
        let original = som.prototypes();
        let dataset = VecDataset::from_inputs(vec![vec![0.5, 0.5]]).unwrap();

        let control = TrainingControl::new();
        control.cancel();
        let report = BatchLearning::new(BatchLearningConfig::default())
            .unwrap()
            .train_with_control(&mut som, &dataset, &control)
            .unwrap();

        assert!(report.cancelled);
        assert_eq!(report.epochs_completed, 0);
        assert_eq!(som.prototypes(), original);
    }
}

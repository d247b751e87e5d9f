//! DSOM: dynamic self-organizing map.
//!
//! A single-pass streaming SOM with no decay schedule. The neighborhood width
//! follows the quantization error of the current input, so a well-represented
//! input barely moves the map while a novel one reorganizes it.
//!
//! References:
//! - Rougier & Boniface (2011): "Dynamic self-organising map"

use crate::config::DsomConfig;
use crate::error::Result;
use crate::som::neighborhood::is_effective;
use crate::som::streaming::StreamingSom;
use crate::som::SelfOrganizingMap;

/// Streaming DSOM model with fixed plasticity and learning rate.
pub struct Dsom {
    som: SelfOrganizingMap,
    config: DsomConfig,
    iterations: u64,
}

impl Dsom {
    /// Wraps `som` in a DSOM learner.
    pub fn new(som: SelfOrganizingMap, config: DsomConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            som,
            config,
            iterations: 0,
        })
    }

    /// Elasticity of the map.
    pub fn plasticity(&self) -> f64 {
        self.config.plasticity
    }

    /// Learning rate.
    pub fn epsilon(&self) -> f64 {
        self.config.epsilon
    }

    /// Consumes the model and returns the trained map.
    pub fn into_som(self) -> SelfOrganizingMap {
        self.som
    }
}

impl StreamingSom for Dsom {
    fn learn(&mut self, input: &[f64]) -> Result<()> {
        self.som.validate_input(input)?;

        let bmu_idx = self.som.best_matching_unit_index(input)?;
        let bmu_pos = self.som.position_of(bmu_idx);
        let bmu_prototype = self.som.neurons()[bmu_idx].prototype().to_vec();
        let qe = self.som.metric().distance(&bmu_prototype, input);

        let inv_plasticity_sq = 1.0 / (self.config.plasticity * self.config.plasticity);
        let epsilon = self.config.epsilon;

        self.som.adapt_towards(input, |lattice, metric, neuron| {
            let d = lattice.distance_between(bmu_pos, neuron.position());
            let neigh = (-(d * d) / (qe * qe) * inv_plasticity_sq).exp();
            if !is_effective(neigh) {
                return None;
            }
            Some(epsilon * metric.distance(&bmu_prototype, neuron.prototype()) * neigh)
        });
        self.som.prototypes_updated();

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::LatticeType;
    use crate::metric::MetricType;

    fn line_map() -> SelfOrganizingMap {
        SelfOrganizingMap::from_prototypes(
            3,
            1,
            vec![vec![0.0], vec![0.5], vec![1.0]],
            LatticeType::Rectangular.build(3, 1),
            MetricType::Euclidean.build(),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_config() {
        let config = DsomConfig {
            plasticity: 0.0,
            ..Default::default()
        };
        assert!(Dsom::new(line_map(), config).is_err());
    }

    #[test]
    fn test_exact_match_leaves_map_unchanged() {
        // Zero quantization error gives no finite influence anywhere
        let mut model = Dsom::new(line_map(), DsomConfig::default()).unwrap();
        model.learn(&[0.5]).unwrap();
        assert_eq!(model.som().prototypes(), vec![vec![0.0], vec![0.5], vec![1.0]]);
        assert_eq!(model.iterations(), 1);
    }

    #[test]
    fn test_update_rule() {
        let config = DsomConfig {
            plasticity: 1.0,
            epsilon: 0.5,
        };
        let mut model = Dsom::new(line_map(), config).unwrap();

        // BMU is neuron 1 at 0.5 with qe 0.2
        model.learn(&[0.7]).unwrap();
        let prototypes = model.som().prototypes();

        // BMU: zero prototype distance to itself, so no move
        assert_eq!(prototypes[1], vec![0.5]);

        // Neighbors at lattice distance 1: influence exp(-1 / 0.04) is below the cut-off
        assert_eq!(prototypes[0], vec![0.0]);
        assert_eq!(prototypes[2], vec![1.0]);
    }

    #[test]
    fn test_neighbors_move_for_large_error() {
        let config = DsomConfig {
            plasticity: 1.0,
            epsilon: 0.5,
        };
        let mut model = Dsom::new(line_map(), config).unwrap();

        // BMU is neuron 2 (1.0) with qe 2.0; neighbor 1 at lattice distance 1
        model.learn(&[3.0]).unwrap();
        let neigh = (-1.0f64 / 4.0).exp();
        let rate = 0.5 * 0.5 * neigh;
        let expected = 0.5 + rate * (3.0 - 0.5);
        assert!((model.som().prototypes()[1][0] - expected).abs() < 1e-12);

        // Neuron 0 sits at lattice distance 2: exp(-1) is effective
        let neigh0 = (-1.0f64).exp();
        let expected0 = 0.5 * 1.0 * neigh0 * 3.0;
        assert!((model.som().prototypes()[0][0] - expected0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_dimension_mismatch() {
        let mut model = Dsom::new(line_map(), DsomConfig::default()).unwrap();
        assert!(model.learn(&[0.1, 0.2]).is_err());
    }
}

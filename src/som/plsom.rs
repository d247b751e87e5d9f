//! PLSOM: parameter-less self-organizing map.
//!
//! Learning rate and neighborhood size both come from the normalized
//! quantization error `eps = qe / r`, where `r` is the largest quantization
//! error seen so far. The map adapts strongly to inputs it represents poorly
//! and ignores inputs it already fits.
//!
//! References:
//! - Berglund & Sitte (2006): "The parameterless self-organizing map algorithm"

use crate::config::PlsomConfig;
use crate::error::Result;
use crate::som::neighborhood::is_effective;
use crate::som::streaming::StreamingSom;
use crate::som::SelfOrganizingMap;

/// Streaming PLSOM model.
pub struct Plsom {
    som: SelfOrganizingMap,
    neighborhood_range: f64,
    max_error: f64,
    iterations: u64,
}

impl Plsom {
    /// Wraps `som` in a PLSOM learner.
    pub fn new(som: SelfOrganizingMap, config: PlsomConfig) -> Result<Self> {
        config.validate()?;
        let neighborhood_range = config
            .neighborhood_range
            .unwrap_or_else(|| som.width().max(som.height()) as f64);

        Ok(Self {
            som,
            neighborhood_range,
            max_error: 0.0,
            iterations: 0,
        })
    }

    /// Largest quantization error observed so far.
    pub fn max_error(&self) -> f64 {
        self.max_error
    }

    /// Neighborhood size reached when the normalized error is 1.
    pub fn neighborhood_range(&self) -> f64 {
        self.neighborhood_range
    }

    /// Consumes the model and returns the trained map.
    pub fn into_som(self) -> SelfOrganizingMap {
        self.som
    }
}

impl StreamingSom for Plsom {
    fn learn(&mut self, input: &[f64]) -> Result<()> {
        self.som.validate_input(input)?;

        let bmu_idx = self.som.best_matching_unit_index(input)?;
        let bmu_pos = self.som.position_of(bmu_idx);
        let qe = self
            .som
            .metric()
            .distance(self.som.neurons()[bmu_idx].prototype(), input);

        self.max_error = self.max_error.max(qe);
        let eps = if self.max_error > 0.0 { qe / self.max_error } else { 0.0 };
        let theta = self.neighborhood_range * eps;

        if eps > 0.0 {
            self.som.adapt_towards(input, |lattice, _, neuron| {
                let d = lattice.distance_between(bmu_pos, neuron.position());
                let neigh = if d == 0.0 { 1.0 } else { (-(d * d) / (theta * theta)).exp() };
                is_effective(neigh).then(|| eps * neigh)
            });
        }
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
    fn test_default_range_is_longest_side() {
        let model = Plsom::new(line_map(), PlsomConfig::default()).unwrap();
        assert_eq!(model.neighborhood_range(), 3.0);
    }

    #[test]
    fn test_first_input_moves_bmu_onto_it() {
        // The first error is the maximum, so eps = 1 and the BMU jumps to the input
        let mut model = Plsom::new(line_map(), PlsomConfig::default()).unwrap();
        model.learn(&[0.6]).unwrap();

        assert!((model.max_error() - 0.1).abs() < 1e-12);
        assert!((model.som().prototypes()[1][0] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_neighborhood_follows_error() {
        let config = PlsomConfig {
            neighborhood_range: Some(1.0),
        };
        let mut model = Plsom::new(line_map(), config).unwrap();
        model.learn(&[1.4]).unwrap();
        assert!((model.max_error() - 0.4).abs() < 1e-12);

        // Half the maximum error: eps 0.5, theta 0.5
        let before = model.som().prototypes();
        model.learn(&[before[2][0] + 0.2]).unwrap();
        let after = model.som().prototypes();

        let input = before[2][0] + 0.2;
        let expected_bmu = before[2][0] + 0.5 * (input - before[2][0]);
        assert!((after[2][0] - expected_bmu).abs() < 1e-9);

        let neigh = (-1.0f64 / 0.25).exp();
        let expected_neighbor = before[1][0] + 0.5 * neigh * (input - before[1][0]);
        assert!((after[1][0] - expected_neighbor).abs() < 1e-9);
    }

    #[test]
    fn test_exact_match_is_ignored() {
        let mut model = Plsom::new(line_map(), PlsomConfig::default()).unwrap();
        model.learn(&[0.0]).unwrap();
        assert_eq!(model.max_error(), 0.0);
        assert_eq!(model.som().prototypes(), vec![vec![0.0], vec![0.5], vec![1.0]]);
        assert_eq!(model.iterations(), 1);
    }
}

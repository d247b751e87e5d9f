//! Map quality measures.
//!
//! - **Quantization error**: distance between an input and its BMU prototype.
//! - **Topographic error**: fraction of inputs whose two closest prototypes are
//!   not lattice neighbors.
//!
//! Dataset-wide measures only read the map, so they run in parallel.

use crate::dataset::{validate_dataset, Dataset};
use crate::error::Result;
use crate::som::SelfOrganizingMap;
use rayon::prelude::*;

/// Distance between `input` and its BMU prototype.
pub fn quantization_error(som: &SelfOrganizingMap, input: &[f64]) -> Result<f64> {
    let bmu = som.best_matching_unit_for(input)?;
    Ok(som.metric().distance(bmu.prototype(), input))
}

/// Mean quantization error over a dataset.
pub fn mean_quantization_error(som: &SelfOrganizingMap, dataset: &dyn Dataset) -> Result<f64> {
    validate_dataset(dataset, som.dimensionality())?;

    let errors: Vec<f64> = dataset
        .items()
        .par_iter()
        .map(|item| quantization_error(som, &item.input))
        .collect::<Result<Vec<f64>>>()?;

    Ok(errors.iter().sum::<f64>() / errors.len() as f64)
}

/// Fraction of dataset inputs whose first and second BMUs are not adjacent.
///
/// A single-neuron map has no second BMU and scores 0.
pub fn topographic_error(som: &SelfOrganizingMap, dataset: &dyn Dataset) -> Result<f64> {
    validate_dataset(dataset, som.dimensionality())?;

    let misses: Vec<bool> = dataset
        .items()
        .par_iter()
        .map(|item| -> Result<bool> {
            let (first, second) = som.best_matching_units(&item.input)?;
            Ok(match second {
                Some(second) => !som.lattice().are_neighbors(som.position_of(first), som.position_of(second)),
                None => false,
            })
        })
        .collect::<Result<Vec<bool>>>()?;

    let count = misses.iter().filter(|&&miss| miss).count();
    Ok(count as f64 / misses.len() as f64)
}

//! Datasets consumed by offline learning and quality measures.
//!
//! Loading and normalizing data is left to the caller; this module only
//! defines the shape the algorithms expect, an in-memory implementation, and
//! a synthetic gaussian-blob generator for demos and tests.

use crate::error::{ensure_dimension, ensure_finite, Result, SomError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// One sample: an input vector and an optional target (empty when unsupervised).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetItem {
    /// Input vector.
    pub input: Vec<f64>,
    /// Target output; unused by the unsupervised algorithms.
    pub target_output: Vec<f64>,
}

impl DatasetItem {
    /// Creates an item without target output.
    pub fn new(input: Vec<f64>) -> Self {
        Self {
            input,
            target_output: Vec::new(),
        }
    }

    /// Creates an item with a target output.
    pub fn with_target(input: Vec<f64>, target_output: Vec<f64>) -> Self {
        Self { input, target_output }
    }
}

/// A finite, sized sequence of samples sharing one input dimensionality.
pub trait Dataset: Sync {
    /// All samples in order.
    fn items(&self) -> &[DatasetItem];

    /// Length of every input vector.
    fn input_dimensionality(&self) -> usize;

    /// Number of samples.
    fn size(&self) -> usize {
        self.items().len()
    }

    /// Whether the dataset has no samples.
    fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    /// Iterator over the input vectors.
    fn inputs(&self) -> Box<dyn Iterator<Item = &[f64]> + '_> {
        Box::new(self.items().iter().map(|item| item.input.as_slice()))
    }
}

/// Checks that a dataset is non-empty, matches `dimensionality` and holds only
/// finite inputs.
pub fn validate_dataset(dataset: &dyn Dataset, dimensionality: usize) -> Result<()> {
    if dataset.is_empty() {
        return Err(SomError::EmptyInput("dataset has no samples".to_string()));
    }
    ensure_dimension(dimensionality, dataset.input_dimensionality())?;
    for item in dataset.items() {
        ensure_dimension(dimensionality, item.input.len())?;
        ensure_finite(&item.input)?;
    }
    Ok(())
}

/// In-memory dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VecDataset {
    items: Vec<DatasetItem>,
    input_dimensionality: usize,
}

impl VecDataset {
    /// Creates a dataset from items; all inputs must share one length.
    pub fn new(items: Vec<DatasetItem>) -> Result<Self> {
        let input_dimensionality = items
            .first()
            .map(|item| item.input.len())
            .ok_or_else(|| SomError::EmptyInput("dataset has no samples".to_string()))?;

        for item in &items {
            ensure_dimension(input_dimensionality, item.input.len())?;
        }

        Ok(Self {
            items,
            input_dimensionality,
        })
    }

    /// Creates a dataset from bare input vectors.
    pub fn from_inputs(inputs: Vec<Vec<f64>>) -> Result<Self> {
        Self::new(inputs.into_iter().map(DatasetItem::new).collect())
    }

    /// Appends a sample.
    pub fn push(&mut self, item: DatasetItem) -> Result<()> {
        if self.items.is_empty() {
            self.input_dimensionality = item.input.len();
        }
        ensure_dimension(self.input_dimensionality, item.input.len())?;
        self.items.push(item);
        Ok(())
    }
}

impl Dataset for VecDataset {
    fn items(&self) -> &[DatasetItem] {
        &self.items
    }

    fn input_dimensionality(&self) -> usize {
        self.input_dimensionality
    }
}

/// Generates `per_center` gaussian samples around each center.
///
/// Samples are emitted center by center; shuffle before presenting them to a
/// streaming model if order matters. The target output of each sample is the
/// one-hot index of its center.
pub fn gaussian_blobs(
    centers: &[Vec<f64>],
    per_center: usize,
    std_dev: f64,
    seed: Option<u64>,
) -> Result<VecDataset> {
    if centers.is_empty() || per_center == 0 {
        return Err(SomError::EmptyInput(
            "gaussian blobs need at least one center and one sample per center".to_string(),
        ));
    }
    let normal = Normal::new(0.0, std_dev)
        .map_err(|e| SomError::InvalidArgument(format!("std_dev {}: {}", std_dev, e)))?;

    let mut rng = match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    };

    let mut items = Vec::with_capacity(centers.len() * per_center);
    for (label, center) in centers.iter().enumerate() {
        let mut target = vec![0.0; centers.len()];
        target[label] = 1.0;
        for _ in 0..per_center {
            let input = center.iter().map(|c| c + normal.sample(&mut rng)).collect();
            items.push(DatasetItem::with_target(input, target.clone()));
        }
    }

    VecDataset::new(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_inputs() {
        let dataset = VecDataset::from_inputs(vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        assert_eq!(dataset.size(), 2);
        assert_eq!(dataset.input_dimensionality(), 2);
        assert_eq!(dataset.inputs().count(), 2);
        assert!(dataset.items()[0].target_output.is_empty());
    }

    #[test]
    fn test_inconsistent_dimensions_rejected() {
        let result = VecDataset::from_inputs(vec![vec![0.0, 1.0], vec![1.0]]);
        assert!(matches!(result, Err(SomError::DimensionMismatch { .. })));
        assert!(VecDataset::from_inputs(vec![]).is_err());
    }

    #[test]
    fn test_push() {
        let mut dataset = VecDataset::default();
        dataset.push(DatasetItem::new(vec![0.5, 0.5, 0.5])).unwrap();
        assert_eq!(dataset.input_dimensionality(), 3);
        assert!(dataset.push(DatasetItem::new(vec![0.5])).is_err());
        assert_eq!(dataset.size(), 1);
    }

    #[test]
    fn test_validate_dataset() {
        let dataset = VecDataset::from_inputs(vec![vec![0.0, f64::NAN]]).unwrap();
        assert!(validate_dataset(&dataset, 2).is_err());

        let dataset = VecDataset::from_inputs(vec![vec![0.0, 0.5]]).unwrap();
        assert!(validate_dataset(&dataset, 2).is_ok());
        assert!(validate_dataset(&dataset, 3).is_err());
    }

    #[test]
    fn test_gaussian_blobs() {
        let centers = vec![vec![0.1, 0.1], vec![0.9, 0.9]];
        let dataset = gaussian_blobs(&centers, 50, 0.02, Some(7)).unwrap();

        assert_eq!(dataset.size(), 100);
        let first = &dataset.items()[0];
        assert_eq!(first.target_output, vec![1.0, 0.0]);
        assert!((first.input[0] - 0.1).abs() < 0.2);

        // Seeded generation is reproducible
        let again = gaussian_blobs(&centers, 50, 0.02, Some(7)).unwrap();
        assert_eq!(dataset.items(), again.items());
    }
}

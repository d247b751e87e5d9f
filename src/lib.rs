//! # topomap - Topology-Preserving Vector Quantization
//!
//! topomap learns low-dimensional, topology-preserving summaries of
//! high-dimensional data, offline from a dataset or online from an unbounded
//! stream.
//!
//! ## Key Features
//!
//! - **Self-Organizing Maps** over pluggable lattices (rectangular or
//!   hexagonal, bounded or toroidal) and metrics (Euclidean, Manhattan)
//! - **Offline learning**: classic sequential Kohonen training and batch SOM
//! - **Streaming learning**: UbiSOM (self-tuning via a drift signal), DSOM and PLSOM
//! - **StreamART2A**: bounded-memory streaming clustering into micro-categories,
//!   with a smoothed fit-quality series for concept-drift monitoring
//! - **Observers** notified synchronously whenever prototypes change
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use topomap::{ClassicLearning, ClassicLearningConfig, OfflineLearning, SelfOrganizingMap, SomConfig};
//! use topomap::dataset::gaussian_blobs;
//!
//! let dataset = gaussian_blobs(&[vec![0.2, 0.2], vec![0.8, 0.8]], 100, 0.05, Some(1))?;
//!
//! let mut som = SelfOrganizingMap::new(&SomConfig { width: 8, height: 8, ..Default::default() })?;
//! let mut trainer = ClassicLearning::new(ClassicLearningConfig::default())?;
//! let report = trainer.train(&mut som, &dataset)?;
//! ```
//!
//! ## Streaming
//!
//! ```rust,ignore
//! use topomap::{StreamingSom, UbiSom, UbiSomConfig};
//!
//! let mut model = UbiSom::new(som, UbiSomConfig::default())?;
//! for sample in stream {
//!     model.learn(&sample)?;
//! }
//! println!("{:?}", model.state());
//! ```
//!
//! ## Architecture
//!
//! - [`metric`] - Distances between prototypes and inputs
//! - [`lattice`] - Grid topologies
//! - [`som`] - The map, decay schedules, kernels and all SOM learning algorithms
//! - [`art`] - StreamART2A clustering
//! - [`series`] - Time series and running-mean filters
//! - [`dataset`] - Dataset abstraction and synthetic data
//! - [`export`] - CSV import and export

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::needless_return)]

pub mod art;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod lattice;
pub mod metric;
pub mod series;
pub mod som;

// Re-export commonly used types
pub use art::{Assignment, MicroCategory, StreamArt2a, StreamArt2aDrift};
pub use config::{
    BatchLearningConfig, ClassicLearningConfig, Config, DsomConfig, PlsomConfig, SomConfig, StreamArt2aConfig,
    UbiSomConfig,
};
pub use dataset::{Dataset, DatasetItem, VecDataset};
pub use error::{Result, SomError};
pub use lattice::{GridPosition, Lattice, LatticeType};
pub use metric::{MetricDistance, MetricType};
pub use series::{RunningMean, TimeSeries};
pub use som::{
    BatchLearning, ClassicLearning, DecayFunction, Dsom, NeighboringFunction, OfflineLearning, Plsom,
    PrototypeNeuron, SelfOrganizingMap, SomObserver, StreamingSom, TrainingControl, TrainingReport, UbiSom,
    UbiSomState,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

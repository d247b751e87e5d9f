//! Self-Organizing Map (SOM) core and learning algorithms.
//!
//! The map itself ([`SelfOrganizingMap`]) only knows its neurons, its lattice
//! and its metric. Learning lives in separate algorithms:
//!
//! - **Offline**: [`ClassicLearning`] (sequential Kohonen updates) and
//!   [`BatchLearning`] (kernel-weighted means), both [`OfflineLearning`].
//! - **Streaming**: [`UbiSom`] (self-tuning state machine), [`Dsom`] and
//!   [`Plsom`], all [`StreamingSom`].
//!
//! Observers registered on a map are notified whenever an algorithm finishes
//! a round of prototype updates.

pub mod batch;
pub mod decay;
pub mod dsom;
mod map;
pub mod neighborhood;
mod neuron;
pub mod observer;
pub mod plsom;
pub mod quality;
pub mod streaming;
pub mod training;
pub mod ubisom;

pub use batch::{BatchLearning, TrainingMetrics};
pub use decay::DecayFunction;
pub use dsom::Dsom;
pub use map::SelfOrganizingMap;
pub use neighborhood::NeighboringFunction;
pub use neuron::PrototypeNeuron;
pub use observer::{ObserverId, SomObserver};
pub use plsom::Plsom;
pub use streaming::StreamingSom;
pub use training::{ClassicLearning, OfflineLearning, TrainingControl, TrainingReport};
pub use ubisom::{DriftEstimator, FixedDrift, LearningParameters, QuantizationDrift, UbiSom, UbiSomState};

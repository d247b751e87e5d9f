//! Self-Organizing Map implementation.

use crate::config::SomConfig;
use crate::error::{ensure_dimension, ensure_finite, Result, SomError};
use crate::lattice::{GridPosition, Lattice};
use crate::metric::MetricDistance;
use crate::som::observer::{ObserverId, ObserverRegistry, SomObserver};
use crate::som::PrototypeNeuron;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;

/// A Self-Organizing Map: a `width x height` grid of prototype neurons.
///
/// Neurons live in a single arena in row-major order (`index = y * width + x`).
/// [`neurons`](Self::neurons) iterates that arena and
/// [`neuron_at`](Self::neuron_at) addresses the very same storage by grid
/// position. The lattice and metric strategies are shared and immutable.
pub struct SelfOrganizingMap {
    width: usize,
    height: usize,
    dimensionality: usize,
    neurons: Vec<PrototypeNeuron>,
    lattice: Arc<dyn Lattice>,
    metric: Arc<dyn MetricDistance>,
    observers: ObserverRegistry,
}

impl SelfOrganizingMap {
    /// Creates a new SOM with random prototypes in `[0, 1)^dimensionality`.
    pub fn new(config: &SomConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Self::with_strategies(
            config.width,
            config.height,
            config.dimensionality,
            config.lattice.build(config.width, config.height),
            config.metric.build(),
            &mut rng,
        )
    }

    /// Creates a new SOM with random prototypes and explicit strategies.
    ///
    /// Fails when a size is zero or when the lattice was built for another grid.
    pub fn with_strategies<R: Rng>(
        width: usize,
        height: usize,
        dimensionality: usize,
        lattice: Arc<dyn Lattice>,
        metric: Arc<dyn MetricDistance>,
        rng: &mut R,
    ) -> Result<Self> {
        Self::check_geometry(width, height, dimensionality, lattice.as_ref())?;

        let neurons: Vec<PrototypeNeuron> = (0..width * height)
            .map(|i| {
                let pos = GridPosition::from_linear(i, width);
                PrototypeNeuron::new_random(pos.x, pos.y, dimensionality, rng)
            })
            .collect();

        Ok(Self {
            width,
            height,
            dimensionality,
            neurons,
            lattice,
            metric,
            observers: ObserverRegistry::default(),
        })
    }

    /// Creates a SOM whose prototypes are given in row-major order.
    pub fn from_prototypes(
        width: usize,
        height: usize,
        prototypes: Vec<Vec<f64>>,
        lattice: Arc<dyn Lattice>,
        metric: Arc<dyn MetricDistance>,
    ) -> Result<Self> {
        let dimensionality = prototypes.first().map(|p| p.len()).unwrap_or(0);
        Self::check_geometry(width, height, dimensionality, lattice.as_ref())?;

        if prototypes.len() != width * height {
            return Err(SomError::InvalidArgument(format!(
                "expected {} prototypes for a {}x{} grid, got {}",
                width * height,
                width,
                height,
                prototypes.len()
            )));
        }

        let mut neurons = Vec::with_capacity(prototypes.len());
        for (i, prototype) in prototypes.into_iter().enumerate() {
            ensure_dimension(dimensionality, prototype.len())?;
            ensure_finite(&prototype)?;
            let pos = GridPosition::from_linear(i, width);
            neurons.push(PrototypeNeuron::with_prototype(pos.x, pos.y, prototype));
        }

        Ok(Self {
            width,
            height,
            dimensionality,
            neurons,
            lattice,
            metric,
            observers: ObserverRegistry::default(),
        })
    }

    fn check_geometry(width: usize, height: usize, dimensionality: usize, lattice: &dyn Lattice) -> Result<()> {
        if width == 0 || height == 0 || dimensionality == 0 {
            return Err(SomError::InvalidArgument(format!(
                "width, height and dimensionality must be positive, got {}x{}x{}",
                width, height, dimensionality
            )));
        }
        if lattice.width() != width || lattice.height() != height {
            return Err(SomError::InvalidArgument(format!(
                "{} lattice built for {}x{} cannot serve a {}x{} map",
                lattice.name(),
                lattice.width(),
                lattice.height(),
                width,
                height
            )));
        }
        lattice.validate()
    }

    /// Number of grid columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of grid rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Length of every prototype vector.
    #[inline]
    pub fn dimensionality(&self) -> usize {
        self.dimensionality
    }

    /// Returns the total number of neurons.
    #[inline]
    pub fn len(&self) -> usize {
        self.neurons.len()
    }

    /// Always false for a constructed map; provided for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.neurons.is_empty()
    }

    /// All neurons in row-major order.
    #[inline]
    pub fn neurons(&self) -> &[PrototypeNeuron] {
        &self.neurons
    }

    #[inline]
    pub(crate) fn neurons_mut(&mut self) -> &mut [PrototypeNeuron] {
        &mut self.neurons
    }

    /// Gets a neuron by its arena index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&PrototypeNeuron> {
        self.neurons.get(index)
    }

    /// Gets a neuron by its grid position.
    #[inline]
    pub fn neuron_at(&self, x: usize, y: usize) -> Option<&PrototypeNeuron> {
        self.index_of(x, y).map(|i| &self.neurons[i])
    }

    /// Arena index of a grid position.
    #[inline]
    pub fn index_of(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(GridPosition::new(x, y).to_linear(self.width))
        } else {
            None
        }
    }

    /// Grid position of an arena index.
    #[inline]
    pub fn position_of(&self, index: usize) -> GridPosition {
        GridPosition::from_linear(index, self.width)
    }

    /// Copies of all prototypes in row-major order.
    pub fn prototypes(&self) -> Vec<Vec<f64>> {
        self.neurons.iter().map(|n| n.prototype().to_vec()).collect()
    }

    /// Replaces the prototype of the neuron at `index`.
    ///
    /// Does not notify observers; call [`prototypes_updated`](Self::prototypes_updated)
    /// after a batch of changes.
    pub fn set_prototype(&mut self, index: usize, prototype: Vec<f64>) -> Result<()> {
        let max = self.neurons.len();
        let neuron = self
            .neurons
            .get_mut(index)
            .ok_or(SomError::IndexOutOfBounds { index, max })?;
        ensure_dimension(self.dimensionality, prototype.len())?;
        ensure_finite(&prototype)?;

        *neuron = PrototypeNeuron::with_prototype(neuron.x(), neuron.y(), prototype);
        Ok(())
    }

    /// The lattice strategy.
    #[inline]
    pub fn lattice(&self) -> &dyn Lattice {
        self.lattice.as_ref()
    }

    /// The metric strategy.
    #[inline]
    pub fn metric(&self) -> &dyn MetricDistance {
        self.metric.as_ref()
    }

    /// Checks that `input` can be presented to this map.
    pub fn validate_input(&self, input: &[f64]) -> Result<()> {
        ensure_dimension(self.dimensionality, input.len())?;
        ensure_finite(input)
    }

    /// Finds the Best Matching Unit (BMU) for an input vector.
    ///
    /// Scans every neuron; among equally close neurons the first in row-major
    /// order wins. Returns the arena index of the BMU.
    pub fn best_matching_unit_index(&self, input: &[f64]) -> Result<usize> {
        ensure_dimension(self.dimensionality, input.len())?;

        let mut best_idx = 0;
        let mut best_dist = f64::INFINITY;
        for (i, neuron) in self.neurons.iter().enumerate() {
            let dist = self.metric.distance(neuron.prototype(), input);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }
        Ok(best_idx)
    }

    /// Finds the Best Matching Unit (BMU) for an input vector.
    pub fn best_matching_unit_for(&self, input: &[f64]) -> Result<&PrototypeNeuron> {
        let index = self.best_matching_unit_index(input)?;
        Ok(&self.neurons[index])
    }

    /// Finds the first and second closest neurons.
    ///
    /// The second is `None` only for a single-neuron map.
    pub fn best_matching_units(&self, input: &[f64]) -> Result<(usize, Option<usize>)> {
        ensure_dimension(self.dimensionality, input.len())?;

        let mut first: Option<(usize, f64)> = None;
        let mut second: Option<(usize, f64)> = None;
        for (i, neuron) in self.neurons.iter().enumerate() {
            let dist = self.metric.distance(neuron.prototype(), input);
            match first {
                Some((_, best)) if dist >= best => {
                    if second.map_or(true, |(_, d)| dist < d) {
                        second = Some((i, dist));
                    }
                }
                _ => {
                    second = first;
                    first = Some((i, dist));
                }
            }
        }

        let (first, _) = first.ok_or_else(|| SomError::EmptyInput("map has no neurons".to_string()))?;
        Ok((first, second.map(|(i, _)| i)))
    }

    /// Finds the Best Matching Unit in parallel, with the same tie rule as
    /// [`best_matching_unit_index`](Self::best_matching_unit_index).
    ///
    /// More efficient for large maps.
    pub fn best_matching_unit_parallel(&self, input: &[f64]) -> Result<usize> {
        ensure_dimension(self.dimensionality, input.len())?;

        let (best_idx, _) = self
            .neurons
            .par_iter()
            .enumerate()
            .map(|(i, n)| (i, self.metric.distance(n.prototype(), input)))
            .reduce(
                || (usize::MAX, f64::INFINITY),
                |a, b| {
                    if b.1 < a.1 || (b.1 == a.1 && b.0 < a.0) {
                        b
                    } else {
                        a
                    }
                },
            );

        // Only reachable with non-comparable distances; fall back to the first neuron
        Ok(if best_idx == usize::MAX { 0 } else { best_idx })
    }

    /// Lattice distance between two neurons of this map.
    #[inline]
    pub fn lattice_distance_between(&self, a: &PrototypeNeuron, b: &PrototypeNeuron) -> f64 {
        self.lattice.distance_between(a.position(), b.position())
    }

    /// Metric distance between the prototypes of two neurons.
    #[inline]
    pub fn distance_between_prototypes(&self, a: &PrototypeNeuron, b: &PrototypeNeuron) -> f64 {
        self.metric.distance(a.prototype(), b.prototype())
    }

    /// Whether two neurons are adjacent on the lattice.
    #[inline]
    pub fn are_neighbors(&self, a: &PrototypeNeuron, b: &PrototypeNeuron) -> bool {
        self.lattice.are_neighbors(a.position(), b.position())
    }

    /// Moves every neuron towards `input` by the rate `rate_for` returns for it.
    ///
    /// Neurons for which `rate_for` returns `None` are left untouched. Returns
    /// the number of neurons moved. Observers are not notified.
    pub fn adapt_towards<F>(&mut self, input: &[f64], mut rate_for: F) -> usize
    where
        F: FnMut(&dyn Lattice, &dyn MetricDistance, &PrototypeNeuron) -> Option<f64>,
    {
        let lattice = self.lattice.as_ref();
        let metric = self.metric.as_ref();

        let mut moved = 0;
        for neuron in self.neurons.iter_mut() {
            if let Some(rate) = rate_for(lattice, metric, neuron) {
                neuron.adapt(input, rate);
                moved += 1;
            }
        }
        moved
    }

    /// Registers an observer; returns the handle to remove it again.
    pub fn add_observer(&mut self, observer: Arc<dyn SomObserver>) -> ObserverId {
        self.observers.add(observer)
    }

    /// Unregisters an observer. Returns false if it was not registered.
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Calls every registered observer with this map.
    pub fn notify_observers(&self) {
        for observer in self.observers.iter() {
            observer.on_notify(self);
        }
    }

    /// Signals that prototypes changed.
    #[inline]
    pub fn prototypes_updated(&self) {
        self.notify_observers();
    }
}

impl fmt::Debug for SelfOrganizingMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelfOrganizingMap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("dimensionality", &self.dimensionality)
            .field("lattice", &self.lattice.name())
            .field("metric", &self.metric.name())
            .field("observers", &self.observers.len())
            .finish()
    }
}

//! StreamART2A: bounded-memory streaming clustering.
//!
//! The stream is cut into landmark windows of `landmark_window_size`
//! consecutive inputs. Each input either resonates with the nearest category
//! (when it falls within that category's vigilance radius) or creates a new
//! category at the input.
//!
//! ## Eviction
//!
//! Before a creation, exactly one category is evicted when either the current
//! window already created `max_new_per_window` categories or the codebook is
//! at `capacity`. The victim has the lowest weight; ties go to the least
//! recently updated, then to the lowest id. Consequently:
//!
//! - the codebook never holds more than `capacity` categories;
//! - within one window it never grows by more than `max_new_per_window`.

use crate::art::category::{CategoryId, MicroCategory};
use crate::config::StreamArt2aConfig;
use crate::error::{ensure_dimension, ensure_finite, Result};
use crate::metric::{manifold_size, MetricDistance};
use log::{debug, info};
use std::sync::Arc;

/// What happened to an input presented to [`StreamArt2a::learn`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Assignment {
    /// The input was absorbed by an existing category.
    Resonance {
        /// Category that absorbed the input.
        category: CategoryId,
        /// Distance from the input to the category before the update.
        distance: f64,
    },
    /// A new category was created at the input.
    Creation {
        /// The new category.
        category: CategoryId,
        /// Category evicted to make room, if any.
        evicted: Option<CategoryId>,
    },
}

impl Assignment {
    /// Category the input ended up in.
    pub fn category(&self) -> CategoryId {
        match *self {
            Assignment::Resonance { category, .. } | Assignment::Creation { category, .. } => category,
        }
    }
}

/// Streaming ART2A clustering engine.
pub struct StreamArt2a {
    config: StreamArt2aConfig,
    metric: Arc<dyn MetricDistance>,
    manifold: f64,
    vigilance_radius: f64,
    categories: Vec<MicroCategory>,
    next_id: CategoryId,
    iteration: u64,
    window: u64,
    created_in_window: usize,
    evictions: u64,
}

impl StreamArt2a {
    /// Creates an empty engine.
    pub fn new(config: StreamArt2aConfig) -> Result<Self> {
        config.validate()?;

        let metric = config.metric.build();
        let manifold = manifold_size(metric.as_ref(), config.dimensionality, config.dmin, config.dmax);
        let vigilance_radius = config.vigilance * manifold;

        info!(
            "StreamART2A: capacity {}, {} new per window of {}, vigilance radius {:.4}",
            config.capacity, config.max_new_per_window, config.landmark_window_size, vigilance_radius
        );

        Ok(Self {
            config,
            metric,
            manifold,
            vigilance_radius,
            categories: Vec::new(),
            next_id: 0,
            iteration: 0,
            window: 0,
            created_in_window: 0,
            evictions: 0,
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &StreamArt2aConfig {
        &self.config
    }

    /// Current micro-categories, in creation order.
    pub fn codebook(&self) -> &[MicroCategory] {
        &self.categories
    }

    /// Categories created or last updated within iterations `[from, to]`.
    pub fn codebook_between(&self, from: u64, to: u64) -> Vec<&MicroCategory> {
        self.categories
            .iter()
            .filter(|c| c.active_between(from, to))
            .collect()
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the codebook is empty.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Number of inputs learned so far; also the iteration of the next input.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Index of the current landmark window.
    pub fn window(&self) -> u64 {
        self.window
    }

    /// Categories created in the current landmark window, counting those
    /// whose creation forced an eviction.
    pub fn created_in_window(&self) -> usize {
        self.created_in_window
    }

    /// Total number of evicted categories.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Distance across the input manifold.
    pub fn manifold_size(&self) -> f64 {
        self.manifold
    }

    /// Vigilance radius given to new categories.
    pub fn vigilance_radius(&self) -> f64 {
        self.vigilance_radius
    }

    /// Distance from `input` to the nearest category, `None` for an empty codebook.
    pub fn nearest_distance(&self, input: &[f64]) -> Result<Option<f64>> {
        self.validate_input(input)?;
        Ok(self.nearest(input).map(|(_, distance)| distance))
    }

    /// Category `input` would resonate with, without learning it.
    pub fn classify(&self, input: &[f64]) -> Result<Option<&MicroCategory>> {
        self.validate_input(input)?;
        Ok(self
            .nearest(input)
            .filter(|&(idx, distance)| self.categories[idx].resonates(distance))
            .map(|(idx, _)| &self.categories[idx]))
    }

    /// Learns one input.
    pub fn learn(&mut self, input: &[f64]) -> Result<Assignment> {
        self.validate_input(input)?;

        let time = self.iteration;
        let window = time / self.config.landmark_window_size as u64;
        if window != self.window {
            self.window = window;
            self.created_in_window = 0;
        }

        let assignment = match self.nearest(input) {
            Some((idx, distance)) if self.categories[idx].resonates(distance) => {
                let category = &mut self.categories[idx];
                category.resonate(input, self.config.learning_rate, time);
                Assignment::Resonance {
                    category: category.id(),
                    distance,
                }
            }
            _ => self.create(input, time),
        };

        self.iteration += 1;
        Ok(assignment)
    }

    fn create(&mut self, input: &[f64], time: u64) -> Assignment {
        let evicted = if self.created_in_window >= self.config.max_new_per_window
            || self.categories.len() >= self.config.capacity
        {
            self.evict()
        } else {
            None
        };

        let id = self.next_id;
        self.next_id += 1;
        self.categories
            .push(MicroCategory::new(id, input, self.vigilance_radius, time));
        self.created_in_window += 1;

        Assignment::Creation { category: id, evicted }
    }

    fn evict(&mut self) -> Option<CategoryId> {
        let (idx, _) = self
            .categories
            .iter()
            .enumerate()
            .min_by_key(|(_, c)| (c.weight(), c.last_update(), c.id()))?;
        let victim = self.categories.remove(idx);
        self.evictions += 1;

        debug!(
            "Evicted category {} (weight {}, last update {}) at iteration {}",
            victim.id(),
            victim.weight(),
            victim.last_update(),
            self.iteration
        );
        Some(victim.id())
    }

    fn nearest(&self, input: &[f64]) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, category) in self.categories.iter().enumerate() {
            let distance = self.metric.distance(category.prototype(), input);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((i, distance));
            }
        }
        best
    }

    fn validate_input(&self, input: &[f64]) -> Result<()> {
        ensure_dimension(self.config.dimensionality, input.len())?;
        ensure_finite(input)
    }
}

//! Micro-categories summarizing a region of the input stream.

use serde::{Deserialize, Serialize};

/// Identifier of a micro-category, unique over the lifetime of one engine.
pub type CategoryId = u64;

/// A prototype with a vigilance radius and a match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicroCategory {
    id: CategoryId,
    prototype: Vec<f64>,
    radius: f64,
    weight: u64,
    created_at: u64,
    last_update: u64,
}

impl MicroCategory {
    /// Creates a category centered at `input` at iteration `time`, with weight 1.
    pub fn new(id: CategoryId, input: &[f64], radius: f64, time: u64) -> Self {
        Self {
            id,
            prototype: input.to_vec(),
            radius,
            weight: 1,
            created_at: time,
            last_update: time,
        }
    }

    /// Unique identifier.
    #[inline]
    pub fn id(&self) -> CategoryId {
        self.id
    }

    /// Center of the category.
    #[inline]
    pub fn prototype(&self) -> &[f64] {
        &self.prototype
    }

    /// Vigilance radius.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Number of inputs absorbed, including the one that created it.
    #[inline]
    pub fn weight(&self) -> u64 {
        self.weight
    }

    /// Iteration at which the category was created.
    #[inline]
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Iteration of the last resonance (creation counts).
    #[inline]
    pub fn last_update(&self) -> u64 {
        self.last_update
    }

    /// Whether an input at `distance` falls within the vigilance radius.
    #[inline]
    pub fn resonates(&self, distance: f64) -> bool {
        distance <= self.radius
    }

    /// Whether the category was created or updated within `[from, to]`.
    #[inline]
    pub fn active_between(&self, from: u64, to: u64) -> bool {
        (from..=to).contains(&self.created_at) || (from..=to).contains(&self.last_update)
    }

    /// Absorbs `input`: moves the prototype by `learning_rate` towards it and
    /// increments the weight.
    pub fn resonate(&mut self, input: &[f64], learning_rate: f64, time: u64) {
        for (w, &x) in self.prototype.iter_mut().zip(input.iter()) {
            *w += learning_rate * (x - *w);
        }
        self.weight += 1;
        self.last_update = time;
    }
}

//! Prototype neuron of the Self-Organizing Map.

use crate::lattice::GridPosition;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A neuron in the Self-Organizing Map.
///
/// Each neuron has a fixed position on the 2D grid and a prototype vector that
/// moves through input space during learning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrototypeNeuron {
    x: usize,
    y: usize,
    prototype: Vec<f64>,
}

impl PrototypeNeuron {
    /// Creates a new neuron with a prototype drawn uniformly from `[0, 1)^dimensionality`.
    pub fn new_random<R: Rng>(x: usize, y: usize, dimensionality: usize, rng: &mut R) -> Self {
        let prototype: Vec<f64> = (0..dimensionality).map(|_| rng.gen::<f64>()).collect();

        Self { x, y, prototype }
    }

    /// Creates a new neuron with the given prototype.
    pub fn with_prototype(x: usize, y: usize, prototype: Vec<f64>) -> Self {
        Self { x, y, prototype }
    }

    /// Column on the grid.
    #[inline]
    pub fn x(&self) -> usize {
        self.x
    }

    /// Row on the grid.
    #[inline]
    pub fn y(&self) -> usize {
        self.y
    }

    /// Grid position.
    #[inline]
    pub fn position(&self) -> GridPosition {
        GridPosition::new(self.x, self.y)
    }

    /// The prototype vector.
    #[inline]
    pub fn prototype(&self) -> &[f64] {
        &self.prototype
    }

    /// Length of the prototype vector.
    #[inline]
    pub fn dimensionality(&self) -> usize {
        self.prototype.len()
    }

    #[inline]
    pub(crate) fn prototype_mut(&mut self) -> &mut [f64] {
        &mut self.prototype
    }

    /// Moves the prototype towards `input`: `prototype += rate * (input - prototype)`.
    #[inline]
    pub fn adapt(&mut self, input: &[f64], rate: f64) {
        debug_assert_eq!(
            self.prototype.len(),
            input.len(),
            "Prototype and input dimensions must match"
        );

        for (w, i) in self.prototype.iter_mut().zip(input.iter()) {
            *w += rate * (i - *w);
        }
    }
}

//! Grid topologies for the SOM lattice.
//!
//! A lattice knows how far apart two grid cells are and whether they are
//! adjacent. Rectangular and hexagonal arrangements are available, each either
//! bounded ("simple") or wrapped at the edges (toroidal). Toroidal variants
//! wrap index differences modulo the grid size, so their distances never exceed
//! the bounded ones.

mod hexagonal;
mod rectangular;

pub use hexagonal::HexagonalLattice;
pub use rectangular::RectangularLattice;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A cell position on the 2D grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    /// Column coordinate (0 to width-1).
    pub x: usize,
    /// Row coordinate (0 to height-1).
    pub y: usize,
}

impl GridPosition {
    /// Create a new grid position.
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Convert from a row-major linear index to a 2D position.
    #[inline]
    pub fn from_linear(index: usize, width: usize) -> Self {
        Self {
            x: index % width,
            y: index / width,
        }
    }

    /// Convert to a row-major linear index.
    #[inline]
    pub fn to_linear(&self, width: usize) -> usize {
        self.y * width + self.x
    }
}

/// Topology of the neuron grid.
///
/// Implementations must be symmetric in both methods, and a cell is never its
/// own neighbor.
pub trait Lattice: Send + Sync {
    /// Grid width the lattice was built for.
    fn width(&self) -> usize;

    /// Grid height the lattice was built for.
    fn height(&self) -> usize;

    /// Distance between two cells in lattice units.
    fn distance_between(&self, a: GridPosition, b: GridPosition) -> f64;

    /// Whether two distinct cells are adjacent.
    fn are_neighbors(&self, a: GridPosition, b: GridPosition) -> bool;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Fails if the lattice cannot be laid out on its grid size.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Enum for the available lattices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LatticeType {
    /// Bounded rectangular grid, 8-connected.
    #[default]
    Rectangular,
    /// Rectangular grid wrapping at the edges.
    RectangularToroidal,
    /// Bounded hexagonal grid (odd rows shifted right by half a cell).
    Hexagonal,
    /// Hexagonal grid wrapping at the edges.
    HexagonalToroidal,
}

impl LatticeType {
    /// Builds the shared strategy object for a `width x height` grid.
    pub fn build(&self, width: usize, height: usize) -> Arc<dyn Lattice> {
        match self {
            LatticeType::Rectangular => Arc::new(RectangularLattice::simple(width, height)),
            LatticeType::RectangularToroidal => Arc::new(RectangularLattice::toroidal(width, height)),
            LatticeType::Hexagonal => Arc::new(HexagonalLattice::simple(width, height)),
            LatticeType::HexagonalToroidal => Arc::new(HexagonalLattice::toroidal(width, height)),
        }
    }

    /// Whether the lattice wraps at its edges.
    pub fn is_toroidal(&self) -> bool {
        matches!(self, LatticeType::RectangularToroidal | LatticeType::HexagonalToroidal)
    }

    /// The bounded counterpart of this lattice.
    pub fn simple(&self) -> Self {
        match self {
            LatticeType::Rectangular | LatticeType::RectangularToroidal => LatticeType::Rectangular,
            LatticeType::Hexagonal | LatticeType::HexagonalToroidal => LatticeType::Hexagonal,
        }
    }
}

/// Absolute difference of two indices, wrapped onto a ring of `size` cells when
/// `toroidal` is set.
#[inline]
pub(crate) fn axis_delta(a: usize, b: usize, size: usize, toroidal: bool) -> usize {
    let d = a.abs_diff(b);
    if toroidal {
        d.min(size - d)
    } else {
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [LatticeType; 4] = [
        LatticeType::Rectangular,
        LatticeType::RectangularToroidal,
        LatticeType::Hexagonal,
        LatticeType::HexagonalToroidal,
    ];

    fn all_positions(width: usize, height: usize) -> Vec<GridPosition> {
        (0..width * height)
            .map(|i| GridPosition::from_linear(i, width))
            .collect()
    }

    #[test]
    fn test_coordinate_conversion() {
        let pos = GridPosition::from_linear(10, 4);
        assert_eq!(pos, GridPosition::new(2, 2));
        assert_eq!(pos.to_linear(4), 10);
    }

    #[test]
    fn test_symmetry_all_lattices() {
        for lattice_type in ALL {
            let lattice = lattice_type.build(5, 4);
            let positions = all_positions(5, 4);

            for &a in &positions {
                for &b in &positions {
                    assert_eq!(
                        lattice.are_neighbors(a, b),
                        lattice.are_neighbors(b, a),
                        "{:?} neighbors not symmetric for {:?} {:?}",
                        lattice_type,
                        a,
                        b
                    );
                    assert_eq!(
                        lattice.distance_between(a, b),
                        lattice.distance_between(b, a),
                        "{:?} distance not symmetric for {:?} {:?}",
                        lattice_type,
                        a,
                        b
                    );
                }
            }
        }
    }

    #[test]
    fn test_toroidal_never_exceeds_simple() {
        for lattice_type in [LatticeType::RectangularToroidal, LatticeType::HexagonalToroidal] {
            let toroidal = lattice_type.build(6, 4);
            let simple = lattice_type.simple().build(6, 4);
            let positions = all_positions(6, 4);

            for &a in &positions {
                for &b in &positions {
                    assert!(toroidal.distance_between(a, b) <= simple.distance_between(a, b) + 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_never_own_neighbor() {
        for lattice_type in ALL {
            let lattice = lattice_type.build(3, 4);
            for p in all_positions(3, 4) {
                assert!(!lattice.are_neighbors(p, p));
                assert_eq!(lattice.distance_between(p, p), 0.0);
            }
        }
    }

    #[test]
    fn test_axis_delta() {
        assert_eq!(axis_delta(0, 9, 10, false), 9);
        assert_eq!(axis_delta(0, 9, 10, true), 1);
        assert_eq!(axis_delta(3, 5, 10, true), 2);
    }
}

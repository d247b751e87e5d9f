//! Rectangular lattice.

use crate::lattice::{axis_delta, GridPosition, Lattice};

/// Rectangular grid where each inner cell touches its eight surrounding cells.
///
/// Distances are Euclidean over `(x, y)`.
#[derive(Debug, Clone)]
pub struct RectangularLattice {
    width: usize,
    height: usize,
    toroidal: bool,
}

impl RectangularLattice {
    /// Bounded rectangular lattice.
    pub fn simple(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            toroidal: false,
        }
    }

    /// Rectangular lattice wrapping at the edges.
    pub fn toroidal(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            toroidal: true,
        }
    }

    /// Whether the lattice wraps at its edges.
    pub fn is_toroidal(&self) -> bool {
        self.toroidal
    }

    #[inline]
    fn deltas(&self, a: GridPosition, b: GridPosition) -> (usize, usize) {
        (
            axis_delta(a.x, b.x, self.width, self.toroidal),
            axis_delta(a.y, b.y, self.height, self.toroidal),
        )
    }
}

impl Lattice for RectangularLattice {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn distance_between(&self, a: GridPosition, b: GridPosition) -> f64 {
        let (dx, dy) = self.deltas(a, b);
        let (dx, dy) = (dx as f64, dy as f64);
        (dx * dx + dy * dy).sqrt()
    }

    fn are_neighbors(&self, a: GridPosition, b: GridPosition) -> bool {
        let (dx, dy) = self.deltas(a, b);
        (dx, dy) != (0, 0) && dx <= 1 && dy <= 1
    }

    fn name(&self) -> &'static str {
        if self.toroidal {
            "rectangular-toroidal"
        } else {
            "rectangular"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_simple() {
        let lattice = RectangularLattice::simple(10, 10);
        let d = lattice.distance_between(GridPosition::new(0, 0), GridPosition::new(3, 4));
        assert!((d - 5.0).abs() < 1e-10); // 3-4-5 triangle
    }

    #[test]
    fn test_distance_toroidal() {
        let lattice = RectangularLattice::toroidal(128, 128);
        // Opposite corners are diagonal neighbors on a torus
        let d = lattice.distance_between(GridPosition::new(0, 0), GridPosition::new(127, 127));
        assert!((d - std::f64::consts::SQRT_2).abs() < 1e-10);
    }

    #[test]
    fn test_neighbors_simple() {
        let lattice = RectangularLattice::simple(4, 4);
        let center = GridPosition::new(1, 1);

        assert!(lattice.are_neighbors(center, GridPosition::new(0, 0)));
        assert!(lattice.are_neighbors(center, GridPosition::new(2, 1)));
        assert!(!lattice.are_neighbors(center, GridPosition::new(3, 1)));
        assert!(!lattice.are_neighbors(GridPosition::new(0, 0), GridPosition::new(3, 0)));
    }

    #[test]
    fn test_neighbors_toroidal() {
        let lattice = RectangularLattice::toroidal(4, 4);
        assert!(lattice.are_neighbors(GridPosition::new(0, 0), GridPosition::new(3, 0)));
        assert!(lattice.are_neighbors(GridPosition::new(0, 0), GridPosition::new(3, 3)));
        assert!(!lattice.are_neighbors(GridPosition::new(0, 0), GridPosition::new(2, 0)));
    }
}

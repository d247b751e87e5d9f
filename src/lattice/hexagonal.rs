//! Hexagonal lattice.
//!
//! Cells use odd-row offset coordinates: odd rows are shifted right by half a
//! cell and rows are `sqrt(3)/2` apart, so every inner cell has six neighbors at
//! planar distance exactly 1.

use crate::error::{Result, SomError};
use crate::lattice::{GridPosition, Lattice};

const ROW_HEIGHT: f64 = 0.866_025_403_784_438_6; // sqrt(3) / 2
const NEIGHBOR_TOLERANCE: f64 = 1e-9;

/// Hexagonal grid with odd-row offset coordinates.
#[derive(Debug, Clone)]
pub struct HexagonalLattice {
    width: usize,
    height: usize,
    toroidal: bool,
}

impl HexagonalLattice {
    /// Bounded hexagonal lattice.
    pub fn simple(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            toroidal: false,
        }
    }

    /// Hexagonal lattice wrapping at the edges.
    ///
    /// The wrapped distance is the shortest planar distance over the nine
    /// translations of the grid by `(±width, ±height)` rows and columns.
    /// Offset rows only tile a torus when `height` is even; see
    /// [`Lattice::validate`].
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

    /// Planar distance for a column offset `dx` (already shifted for row parity)
    /// and a row offset `dy`.
    #[inline]
    fn planar(dx: f64, dy: i64) -> f64 {
        let dy = dy as f64 * ROW_HEIGHT;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Lattice for HexagonalLattice {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn distance_between(&self, a: GridPosition, b: GridPosition) -> f64 {
        // Offsets are formed before any float math so that swapping a and b
        // only flips signs and the result is exactly symmetric.
        let shift = 0.5 * ((a.y % 2) as f64 - (b.y % 2) as f64);
        let dx = (a.x as i64 - b.x as i64) as f64 + shift;
        let dy = a.y as i64 - b.y as i64;

        if !self.toroidal {
            return Self::planar(dx, dy);
        }

        let (w, h) = (self.width as i64, self.height as i64);
        let mut best = f64::INFINITY;
        for kx in [-w, 0, w] {
            for ky in [-h, 0, h] {
                best = best.min(Self::planar(dx + kx as f64, dy + ky));
            }
        }
        best
    }

    fn are_neighbors(&self, a: GridPosition, b: GridPosition) -> bool {
        a != b && self.distance_between(a, b) <= 1.0 + NEIGHBOR_TOLERANCE
    }

    fn validate(&self) -> Result<()> {
        // Wrapping an odd number of rows lands an even row on an odd one and
        // breaks the half-cell offset.
        if self.toroidal && self.height % 2 == 1 {
            return Err(SomError::InvalidArgument(format!(
                "hexagonal torus needs an even number of rows, got {}",
                self.height
            )));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        if self.toroidal {
            "hexagonal-toroidal"
        } else {
            "hexagonal"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbor_count(lattice: &HexagonalLattice, p: GridPosition) -> usize {
        (0..lattice.height)
            .flat_map(|y| (0..lattice.width).map(move |x| GridPosition::new(x, y)))
            .filter(|&q| lattice.are_neighbors(p, q))
            .count()
    }

    #[test]
    fn test_inner_cell_has_six_neighbors() {
        let lattice = HexagonalLattice::simple(5, 5);
        assert_eq!(neighbor_count(&lattice, GridPosition::new(2, 2)), 6);
        assert_eq!(neighbor_count(&lattice, GridPosition::new(2, 1)), 6);
    }

    #[test]
    fn test_offset_rows() {
        let lattice = HexagonalLattice::simple(5, 5);
        // Row 1 is shifted right: (1,1) touches (1,0) and (2,0), not (0,0)
        assert!(lattice.are_neighbors(GridPosition::new(1, 1), GridPosition::new(1, 0)));
        assert!(lattice.are_neighbors(GridPosition::new(1, 1), GridPosition::new(2, 0)));
        assert!(!lattice.are_neighbors(GridPosition::new(1, 1), GridPosition::new(0, 0)));
    }

    #[test]
    fn test_horizontal_distance() {
        let lattice = HexagonalLattice::simple(8, 8);
        let d = lattice.distance_between(GridPosition::new(0, 0), GridPosition::new(3, 0));
        assert!((d - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_toroidal_even_rows_keep_hex_geometry() {
        let lattice = HexagonalLattice::toroidal(5, 4);
        assert!(lattice.validate().is_ok());

        for y in 0..4 {
            for x in 0..5 {
                let p = GridPosition::new(x, y);
                assert_eq!(neighbor_count(&lattice, p), 6, "cell {:?}", p);
                for q in (0..4).flat_map(|qy| (0..5).map(move |qx| GridPosition::new(qx, qy))) {
                    if q != p {
                        assert!(lattice.distance_between(p, q) >= 1.0 - NEIGHBOR_TOLERANCE);
                    }
                }
            }
        }
    }

    #[test]
    fn test_toroidal_odd_rows_rejected() {
        assert!(matches!(
            HexagonalLattice::toroidal(5, 3).validate(),
            Err(SomError::InvalidArgument(_))
        ));
        assert!(HexagonalLattice::simple(5, 3).validate().is_ok());
    }

    #[test]
    fn test_toroidal_wraps() {
        let lattice = HexagonalLattice::toroidal(6, 6);
        assert!(lattice.are_neighbors(GridPosition::new(0, 0), GridPosition::new(5, 0)));
        assert_eq!(neighbor_count(&lattice, GridPosition::new(0, 0)), 6);
    }
}

//! Assigns stars to texture cells.
//!
//! Each star first tries the cell it projects into. If that cell is taken
//! the eight surrounding cells are tried, nearest first. Coordinates wrap
//! around the texture edges so the grid behaves like a torus. A star with
//! no free cell in its neighborhood is dropped.
//!
//! Cells are claimed in call order and never released, so callers feed
//! stars brightest first to give them priority.

use super::projection::{PixelCoord, SubPixelOffset};

/// Orthogonal neighbors first, then diagonals
const NEIGHBOR_STEPS: [(i64, i64); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];

/// Integer texture cell, both coordinates in `[0, resolution)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelCell {
    pub px: u32,
    pub py: u32,
}

/// Outcome of a single allocation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Landed in the cell it projects into
    Primary {
        cell: PixelCell,
        offset: SubPixelOffset,
    },
    /// Displaced into a neighboring cell
    Neighbor {
        cell: PixelCell,
        offset: SubPixelOffset,
    },
    Dropped,
}

impl Placement {
    pub fn cell(&self) -> Option<PixelCell> {
        match self {
            Placement::Primary { cell, .. } | Placement::Neighbor { cell, .. } => Some(*cell),
            Placement::Dropped => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocationStats {
    pub primary: usize,
    pub neighbor: usize,
    pub dropped: usize,
}

impl AllocationStats {
    pub fn placed(&self) -> usize {
        self.primary + self.neighbor
    }

    pub fn total(&self) -> usize {
        self.placed() + self.dropped
    }
}

/// Wrap a coordinate that is at most one texture width out of range
#[inline]
pub fn wrap_coordinate(coord: i64, resolution: u32) -> u32 {
    let res = resolution as i64;
    let wrapped = if coord >= res {
        coord - res
    } else if coord < 0 {
        coord + res
    } else {
        coord
    };
    wrapped.rem_euclid(res) as u32
}

/// Occupancy grid plus allocation counters
#[derive(Debug, Clone)]
pub struct PixelAllocator {
    resolution: u32,
    occupied: Vec<bool>,
    stats: AllocationStats,
}

impl PixelAllocator {
    pub fn new(resolution: u32) -> Self {
        let n = resolution as usize * resolution as usize;
        Self {
            resolution,
            occupied: vec![false; n],
            stats: AllocationStats::default(),
        }
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn stats(&self) -> AllocationStats {
        self.stats
    }

    #[inline]
    fn index(&self, cell: PixelCell) -> usize {
        cell.px as usize * self.resolution as usize + cell.py as usize
    }

    fn wrap(&self, cx: i64, cy: i64) -> PixelCell {
        PixelCell {
            px: wrap_coordinate(cx, self.resolution),
            py: wrap_coordinate(cy, self.resolution),
        }
    }

    pub fn is_occupied(&self, cell: PixelCell) -> bool {
        self.occupied[self.index(cell)]
    }

    /// Mark a cell taken; returns false if it already was
    fn claim(&mut self, cell: PixelCell) -> bool {
        let idx = self.index(cell);
        if self.occupied[idx] {
            return false;
        }
        self.occupied[idx] = true;
        true
    }

    /// Find and claim a cell for a star at `coord`.
    ///
    /// Neighbors are wrapped onto the texture first and ranked by distance
    /// to the wrapped cell, so a neighbor across the seam ranks last. The
    /// stored offset uses the unwrapped neighbor coordinate, which keeps it
    /// within the offset channel range.
    pub fn allocate(&mut self, coord: PixelCoord) -> Placement {
        let (hx, hy) = coord.home_cell();
        let home = self.wrap(hx, hy);
        if self.claim(home) {
            self.stats.primary += 1;
            return Placement::Primary {
                cell: home,
                offset: coord.offset_from(hx, hy),
            };
        }

        let mut candidates: Vec<(i64, i64, PixelCell, f64)> = NEIGHBOR_STEPS
            .iter()
            .map(|&(dx, dy)| {
                let (nx, ny) = (hx + dx, hy + dy);
                let cell = self.wrap(nx, ny);
                let dist = coord.distance_to_cell(cell.px as i64, cell.py as i64);
                (nx, ny, cell, dist)
            })
            .collect();
        candidates.sort_by(|a, b| a.3.total_cmp(&b.3));

        for (nx, ny, cell, _) in candidates {
            if self.claim(cell) {
                self.stats.neighbor += 1;
                return Placement::Neighbor {
                    cell,
                    offset: coord.offset_from(nx, ny),
                };
            }
        }

        self.stats.dropped += 1;
        Placement::Dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::collections::HashSet;

    #[test]
    fn test_wrap_coordinate() {
        assert_eq!(wrap_coordinate(-1, 1024), 1023);
        assert_eq!(wrap_coordinate(1024, 1024), 0);
        assert_eq!(wrap_coordinate(1025, 1024), 1);
        assert_eq!(wrap_coordinate(0, 1024), 0);
        assert_eq!(wrap_coordinate(1023, 1024), 1023);
    }

    #[test]
    fn test_primary_placement() {
        let mut alloc = PixelAllocator::new(16);
        let placement = alloc.allocate(PixelCoord { x: 4.25, y: 7.75 });
        match placement {
            Placement::Primary { cell, offset } => {
                assert_eq!(cell, PixelCell { px: 4, py: 7 });
                assert_abs_diff_eq!(offset.du, 0.25, epsilon = 1e-12);
                assert_abs_diff_eq!(offset.dv, -0.25, epsilon = 1e-12);
            }
            other => panic!("expected primary placement, got {:?}", other),
        }
        assert!(alloc.is_occupied(PixelCell { px: 4, py: 7 }));
    }

    #[test]
    fn test_collision_moves_to_nearest_neighbor() {
        let mut alloc = PixelAllocator::new(16);
        let coord = PixelCoord { x: 4.5, y: 7.5 };
        assert!(matches!(alloc.allocate(coord), Placement::Primary { .. }));

        // Reference points sit at c - 0.5, so (5, 8) is closest to (4.5, 7.5)
        match alloc.allocate(coord) {
            Placement::Neighbor { cell, offset } => {
                assert_eq!(cell, PixelCell { px: 5, py: 8 });
                assert_abs_diff_eq!(offset.du, 1.0, epsilon = 1e-12);
                assert_abs_diff_eq!(offset.dv, 1.0, epsilon = 1e-12);
            }
            other => panic!("expected neighbor placement, got {:?}", other),
        }
    }

    #[test]
    fn test_neighbor_order_by_distance() {
        let mut alloc = PixelAllocator::new(16);
        // Home cell (4, 4); reference points at (3.5, 3.5) for home
        let coord = PixelCoord { x: 4.9, y: 4.1 };
        alloc.allocate(coord);
        let second = alloc.allocate(coord).cell().expect("second star placed");
        // Candidates: (5,4) ref (4.5,3.5) dist ~0.72; (5,5) ref (4.5,4.5) dist ~0.57
        assert_eq!(second, PixelCell { px: 5, py: 5 });
        let third = alloc.allocate(coord).cell().expect("third star placed");
        assert_eq!(third, PixelCell { px: 5, py: 4 });
    }

    #[test]
    fn test_wraps_across_edges() {
        let mut alloc = PixelAllocator::new(8);
        let coord = PixelCoord { x: 8.0, y: 4.0 };
        assert_eq!(alloc.allocate(coord).cell(), Some(PixelCell { px: 7, py: 3 }));

        // Wrapped neighbors rank by distance to where they land, so the
        // cells across the seam at px = 0 come last
        let expected = [(7, 4), (6, 4), (6, 3), (7, 2), (6, 2), (0, 4), (0, 3), (0, 2)];
        for (px, py) in expected {
            let placement = alloc.allocate(coord);
            assert!(matches!(placement, Placement::Neighbor { .. }));
            assert_eq!(placement.cell(), Some(PixelCell { px, py }));
        }
        assert_eq!(alloc.allocate(coord), Placement::Dropped);
    }

    #[test]
    fn test_seam_neighbor_offset_unwrapped() {
        let mut alloc = PixelAllocator::new(8);
        let coord = PixelCoord { x: 8.0, y: 4.0 };
        // First the home cell, then the five cells on this side of the seam
        for _ in 0..6 {
            alloc.allocate(coord);
        }
        match alloc.allocate(coord) {
            Placement::Neighbor { cell, offset } => {
                assert_eq!(cell, PixelCell { px: 0, py: 4 });
                // Measured from the unwrapped neighbor (8, 4)
                assert_abs_diff_eq!(offset.du, 0.5, epsilon = 1e-12);
                assert_abs_diff_eq!(offset.dv, 0.5, epsilon = 1e-12);
            }
            other => panic!("expected neighbor placement, got {:?}", other),
        }
    }

    #[test]
    fn test_home_cell_at_zero_wraps() {
        let mut alloc = PixelAllocator::new(8);
        let placement = alloc.allocate(PixelCoord { x: 0.0, y: 2.5 });
        assert_eq!(placement.cell(), Some(PixelCell { px: 7, py: 2 }));
    }

    #[test]
    fn test_drop_when_neighborhood_full() {
        let mut alloc = PixelAllocator::new(32);
        let coord = PixelCoord { x: 10.5, y: 10.5 };
        let mut cells = HashSet::new();
        for _ in 0..9 {
            let cell = alloc.allocate(coord).cell().expect("cell available");
            assert!(cells.insert(cell), "cell {:?} assigned twice", cell);
        }
        assert_eq!(alloc.allocate(coord), Placement::Dropped);
        assert_eq!(
            alloc.stats(),
            AllocationStats {
                primary: 1,
                neighbor: 8,
                dropped: 1
            }
        );
    }

    #[test]
    fn test_cells_written_once() {
        let mut alloc = PixelAllocator::new(4);
        let mut seen = HashSet::new();
        for i in 0..64 {
            let coord = PixelCoord {
                x: (i % 5) as f64 * 0.8 + 0.1,
                y: (i % 3) as f64 * 1.3 + 0.2,
            };
            if let Some(cell) = alloc.allocate(coord).cell() {
                assert!(seen.insert(cell), "cell {:?} reassigned", cell);
            }
        }
        assert_eq!(alloc.stats().total(), 64);
        assert_eq!(alloc.stats().placed(), seen.len());
        assert!(seen.len() <= 16);
    }
}

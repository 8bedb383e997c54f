//! # Spatial grid (3D)
//!
//! Buckets bodies into fixed-size cubic cells so pairwise interaction checks
//! only consider nearby neighbors, replacing the naive all-pairs scan with a
//! bounded local query.
//!
//! - The cubic universe `[-universe_size, +universe_size]³` is divided into
//!   `GRID_DIVISOR` cells per axis.
//! - `build` inserts every live non-central body into its cell in O(n).
//! - `neighbor_indices` returns the bodies in the 3×3×3 block around a
//!   position, excluding the eight pure corner cells.
//!
//! The central body is never inserted: its dominant mass must never be missed,
//! so every other body is tested against it directly once per tick regardless
//! of grid adjacency.

use crate::simulation::states::{Body, NVec3};

/// Cells per axis. Cell size is derived from the universe size and this fixed
/// divisor.
pub const GRID_DIVISOR: usize = 16;

/// A complete cell grid over the simulation volume.
///
/// Cells store body indices into `System::bodies`, never references, and the
/// whole structure is rebuilt from scratch each tick.
pub struct SpatialGrid {
    pub cell_size: f64, // edge length of one cubic cell
    pub half_extent: f64, // universe half-extent the grid covers
    cells: Vec<Vec<usize>>, // GRID_DIVISOR^3 buckets, x-major
}

impl SpatialGrid {
    pub fn new(universe_size: f64) -> Self {
        let cell_size = (2.0 * universe_size) / GRID_DIVISOR as f64;
        Self {
            cell_size,
            half_extent: universe_size,
            cells: vec![Vec::new(); GRID_DIVISOR * GRID_DIVISOR * GRID_DIVISOR],
        }
    }

    /// Rebuild the grid from the current body set. O(n).
    ///
    /// Skips the central body (index 0, handled by the direct pass) and bodies
    /// that are no longer alive.
    pub fn build(&mut self, bodies: &[Body]) {
        for cell in self.cells.iter_mut() {
            cell.clear();
        }
        for b in bodies.iter() {
            if b.index == 0 || !b.alive {
                continue;
            }
            let (cx, cy, cz) = self.cell_of(&b.x);
            self.cells[Self::flat(cx, cy, cz)].push(b.index);
        }
    }

    /// Cell coordinates for a position, each axis clamped into
    /// `[0, GRID_DIVISOR - 1]`. Out-of-range positions land in the boundary
    /// cell; never rejected, never wrapped.
    pub fn cell_of(&self, p: &NVec3) -> (usize, usize, usize) {
        (
            self.axis_cell(p.x),
            self.axis_cell(p.y),
            self.axis_cell(p.z),
        )
    }

    fn axis_cell(&self, coord: f64) -> usize {
        let scaled = (coord + self.half_extent) / self.cell_size;
        let idx = scaled.floor() as i64;
        idx.clamp(0, GRID_DIVISOR as i64 - 1) as usize
    }

    fn flat(cx: usize, cy: usize, cz: usize) -> usize {
        (cx * GRID_DIVISOR + cy) * GRID_DIVISOR + cz
    }

    /// Body indices in the 3×3×3 block of cells centered on `p`'s cell,
    /// excluding the eight pure corner offsets (all three axis offsets
    /// simultaneously nonzero). Risks the occasional corner miss for a
    /// performance boost; an accepted approximation, not a defect.
    ///
    /// Offsets that fall outside the grid are skipped, so boundary cells are
    /// visited exactly once per query.
    pub fn neighbor_indices(&self, p: &NVec3) -> Vec<usize> {
        let (cx, cy, cz) = self.cell_of(p);
        let mut out = Vec::new();
        for dx in -1i64..=1 {
            for dy in -1i64..=1 {
                for dz in -1i64..=1 {
                    if dx != 0 && dy != 0 && dz != 0 {
                        continue; // pure corner cell
                    }
                    let nx = cx as i64 + dx;
                    let ny = cy as i64 + dy;
                    let nz = cz as i64 + dz;
                    if nx < 0
                        || ny < 0
                        || nz < 0
                        || nx >= GRID_DIVISOR as i64
                        || ny >= GRID_DIVISOR as i64
                        || nz >= GRID_DIVISOR as i64
                    {
                        continue;
                    }
                    let cell = &self.cells[Self::flat(nx as usize, ny as usize, nz as usize)];
                    out.extend_from_slice(cell);
                }
            }
        }
        out
    }
}

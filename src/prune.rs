//! Remove overlapping atoms at grain boundaries.
//!
//! Grains are filled independently of each other, so atoms from neighbouring
//! grains can end up almost on top of each other where the grains meet. This
//! pass is never run by the filler: call it explicitly on the final system.

use coord::Coord;
use error::{PolycrysError, Result};
use system::{Polycrystal, SimBox};

use std::collections::HashSet;

/// Remove every atom which is closer than `min_distance` to an atom which
/// comes before it in the system. Distances use the minimum image convention
/// of the periodic box. Returns the number of removed atoms.
///
/// # Errors
/// Returns an error if `min_distance` is non-positive or not finite.
pub fn prune_overlaps(system: &mut Polycrystal, min_distance: f64) -> Result<usize> {
    if !(min_distance.is_finite() && min_distance > 0.0) {
        return Err(PolycrysError::invalid(
            format!("minimum distance must be positive, got {}", min_distance)
        ));
    }

    let mut grid = CellGrid::new(system.simbox(), min_distance, system.num_atoms())?;
    let keep: Vec<bool> = system.coords().iter().map(|&c| grid.insert_if_free(c)).collect();

    let num_removed = keep.iter().filter(|&&k| !k).count();
    system.retain_indices(&keep);

    info!("Removed {} overlapping atoms closer than {}", num_removed, min_distance);

    Ok(num_removed)
}

/// Periodic grid of cells which are at least `rmin` wide, so that atoms within
/// `rmin` of each other are always in the same or neighbouring cells.
///
/// The number of cells along an axis is at most the cube root of the number
/// of atoms. Smaller distances only make the cells relatively wider.
struct CellGrid {
    rmin: f64,
    box_size: Coord,
    shape: (usize, usize, usize),
    spacing: Coord,
    cells: Vec<Vec<Coord>>,
}

impl CellGrid {
    fn new(simbox: SimBox, rmin: f64, num_atoms: usize) -> Result<CellGrid> {
        let box_size = simbox.size();
        let max_cells = ((num_atoms as f64).cbrt().ceil()).max(1.0);
        let num_cells = |size: f64| (size / rmin).floor().min(max_cells).max(1.0) as usize;
        let (nx, ny, nz) = (num_cells(box_size.x), num_cells(box_size.y), num_cells(box_size.z));

        let total = nx.checked_mul(ny)
            .and_then(|n| n.checked_mul(nz))
            .ok_or_else(|| PolycrysError::invalid(
                format!("cannot create a grid of ({}, {}, {}) cells", nx, ny, nz)
            ))?;

        Ok(CellGrid {
            rmin,
            box_size,
            shape: (nx, ny, nz),
            spacing: Coord::new(box_size.x / nx as f64, box_size.y / ny as f64, box_size.z / nz as f64),
            cells: vec![Vec::new(); total],
        })
    }

    fn cell_index(&self, col: usize, row: usize, layer: usize) -> usize {
        let (nx, ny, _) = self.shape;
        (layer * ny + row) * nx + col
    }

    fn cell_position(&self, coord: Coord) -> (usize, usize, usize) {
        let (nx, ny, nz) = self.shape;
        let wrapped = coord.with_pbc(self.box_size);
        let bin = |v: f64, spacing: f64, n: usize| ((v / spacing).floor() as usize).min(n - 1);

        (bin(wrapped.x, self.spacing.x, nx),
         bin(wrapped.y, self.spacing.y, ny),
         bin(wrapped.z, self.spacing.z, nz))
    }

    fn get_neighbours(&self, coord: Coord) -> HashSet<usize> {
        let (nx, ny, nz) = self.shape;
        let (i, j, k) = self.cell_position(coord);
        let wrap = |i: usize, di: isize, n: usize| ((i as isize + di + n as isize) as usize) % n;

        let mut neighbours = HashSet::new();

        for di in -1..2 {
            for dj in -1..2 {
                for dk in -1..2 {
                    neighbours.insert(self.cell_index(wrap(i, di, nx), wrap(j, dj, ny), wrap(k, dk, nz)));
                }
            }
        }

        neighbours
    }

    fn collision(&self, coord: Coord) -> bool {
        let rmin_sq = self.rmin * self.rmin;

        self.get_neighbours(coord)
            .into_iter()
            .flat_map(|index| self.cells[index].iter())
            .any(|&other| {
                let d = coord.pbc_delta(other, self.box_size);
                d.dot(d) < rmin_sq
            })
    }

    fn insert_if_free(&mut self, coord: Coord) -> bool {
        if self.collision(coord) {
            return false;
        }

        let (i, j, k) = self.cell_position(coord);
        let index = self.cell_index(i, j, k);
        self.cells[index].push(coord);

        true
    }
}

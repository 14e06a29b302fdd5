//! Implements the bulk crystal generator. A `Basis` holds the fractional
//! positions of one atom species inside the cubic unit cell, and `lattice`
//! replicates it over a number of `Cells` along every axis.

use coord::Coord;
use error::{PolycrysError, Result};

use std::convert::TryFrom;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "Vec<Coord>", into = "Vec<Coord>")]
/// The fractional coordinates of a single sublattice in the unit cell.
///
/// Every basis corresponds to exactly one atom species. Bases of different
/// species should never be merged into one: the species of an atom is taken
/// from the position of its basis in the list given to the filler.
pub struct Basis {
    points: Vec<Coord>,
}

impl Basis {
    /// Construct a basis from fractional coordinates.
    ///
    /// # Errors
    /// Returns an error if the list is empty or any coordinate is not finite
    /// and inside `[0, 1)` along all axes.
    pub fn new(points: Vec<Coord>) -> Result<Basis> {
        if points.is_empty() {
            return Err(PolycrysError::invalid("a basis must contain at least one point"));
        }

        let in_cell = |v: f64| v >= 0.0 && v < 1.0;
        if let Some(p) = points.iter().find(|p| !(in_cell(p.x) && in_cell(p.y) && in_cell(p.z))) {
            return Err(PolycrysError::invalid(
                format!("basis point {} is not a fractional coordinate in [0, 1)", p)
            ));
        }

        Ok(Basis { points })
    }

    /// The face-centred sublattice of the diamond cubic unit cell.
    pub fn diamond_fcc() -> Basis {
        Basis {
            points: vec![
                Coord::new(0.0, 0.0, 0.0),
                Coord::new(0.5, 0.5, 0.0),
                Coord::new(0.5, 0.0, 0.5),
                Coord::new(0.0, 0.5, 0.5),
            ],
        }
    }

    /// The sublattice of the diamond cubic unit cell which is shifted by a quarter
    /// of the body diagonal. It fills half of the tetrahedral holes of the fcc lattice.
    pub fn diamond_tetrahedral() -> Basis {
        Basis {
            points: vec![
                Coord::new(0.25, 0.25, 0.25),
                Coord::new(0.75, 0.75, 0.25),
                Coord::new(0.25, 0.75, 0.75),
                Coord::new(0.75, 0.25, 0.75),
            ],
        }
    }

    /// Both diamond cubic sublattices in species order.
    pub fn diamond() -> Vec<Basis> {
        vec![Basis::diamond_fcc(), Basis::diamond_tetrahedral()]
    }

    pub fn points(&self) -> &[Coord] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl TryFrom<Vec<Coord>> for Basis {
    type Error = PolycrysError;

    fn try_from(points: Vec<Coord>) -> Result<Basis> {
        Basis::new(points)
    }
}

impl From<Basis> for Vec<Coord> {
    fn from(basis: Basis) -> Vec<Coord> {
        basis.points
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
/// Number of unit cell repetitions along every axis.
pub struct Cells {
    pub nx: u64,
    pub ny: u64,
    pub nz: u64,
}

impl Cells {
    pub fn new(nx: u64, ny: u64, nz: u64) -> Cells {
        Cells { nx, ny, nz }
    }

    /// Equal number of repetitions along all axes.
    pub fn cubic(n: u64) -> Cells {
        Cells::new(n, n, n)
    }

    /// The smallest number of cells of side `a` which covers an edge `length`
    /// along every axis.
    ///
    /// # Errors
    /// Returns an error if either value is non-positive or not finite.
    ///
    /// # Examples
    /// ```
    /// # use polycrys::lattice::Cells;
    /// assert_eq!(Cells::cubic(47), Cells::from_length(5.403, 250.0).unwrap());
    /// ```
    pub fn from_length(a: f64, length: f64) -> Result<Cells> {
        if !(a.is_finite() && a > 0.0 && length.is_finite() && length > 0.0) {
            return Err(PolycrysError::invalid(
                format!("cannot fit cells of size {} into a box of length {}", a, length)
            ));
        }

        let n = (length / a).ceil();
        if n >= u64::max_value() as f64 {
            return Err(PolycrysError::invalid(
                format!("too many cells of size {} to fit a box of length {}", a, length)
            ));
        }

        Ok(Cells::cubic(n as u64))
    }

    /// The cells repeated `n` times along every axis.
    ///
    /// # Errors
    /// Returns an error if any repetition count overflows.
    pub fn multiply(&self, n: u64) -> Result<Cells> {
        let mul = |v: u64| v.checked_mul(n).ok_or_else(|| self.overflow());

        Ok(Cells::new(mul(self.nx)?, mul(self.ny)?, mul(self.nz)?))
    }

    /// Total number of cells.
    ///
    /// # Errors
    /// Returns an error if the count overflows.
    pub fn count(&self) -> Result<u64> {
        self.nx.checked_mul(self.ny)
            .and_then(|n| n.checked_mul(self.nz))
            .ok_or_else(|| self.overflow())
    }

    /// Number of atoms in a lattice of these cells with `basis_len` points per cell.
    ///
    /// # Errors
    /// Returns an error if the number does not fit in memory indices.
    pub fn num_sites(&self, basis_len: usize) -> Result<usize> {
        usize::try_from(self.count()?)
            .ok()
            .and_then(|n| n.checked_mul(basis_len))
            .ok_or_else(|| self.overflow())
    }

    /// Size of the box spanned by the cells for the lattice constant `a`.
    pub fn box_size(&self, a: f64) -> Coord {
        Coord::new(self.nx as f64, self.ny as f64, self.nz as f64) * a
    }

    fn validate(&self) -> Result<()> {
        if self.nx == 0 || self.ny == 0 || self.nz == 0 {
            return Err(PolycrysError::invalid(
                format!("repetitions must be positive, got ({}, {}, {})",
                        self.nx, self.ny, self.nz)
            ));
        }

        Ok(())
    }

    fn overflow(&self) -> PolycrysError {
        PolycrysError::invalid(
            format!("lattice of ({}, {}, {}) cells is too large", self.nx, self.ny, self.nz)
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
/// A collection of atom positions without any species information.
pub struct Crystal {
    pub coords: Vec<Coord>,
}

impl Crystal {
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Translate all positions by a vector.
    pub fn translate(mut self, shift: Coord) -> Crystal {
        for c in self.coords.iter_mut() {
            *c += shift;
        }

        self
    }
}

/// Replicate a basis with lattice constant `a` over a block of `cells`.
///
/// The atom of basis point `n` in cell `(i, j, k)` is placed at
/// `a * (basis[n] + (i, j, k))`. Atoms are enumerated by cell with the basis
/// points innermost.
///
/// # Errors
/// Returns an error if `a` is non-positive, any repetition count is zero,
/// the basis is empty or the number of atoms overflows.
///
/// # Examples
/// ```
/// # use polycrys::coord::Coord;
/// # use polycrys::lattice::{lattice, Basis, Cells};
/// let basis = Basis::new(vec![Coord::new(0.0, 0.0, 0.0)]).unwrap();
/// let crystal = lattice(2.0, Cells::new(2, 1, 1), &basis).unwrap();
///
/// assert_eq!(vec![Coord::new(0.0, 0.0, 0.0), Coord::new(2.0, 0.0, 0.0)], crystal.coords);
/// ```
pub fn lattice(a: f64, cells: Cells, basis: &Basis) -> Result<Crystal> {
    if !(a.is_finite() && a > 0.0) {
        return Err(PolycrysError::invalid(format!("lattice constant must be positive, got {}", a)));
    }
    cells.validate()?;
    if basis.is_empty() {
        return Err(PolycrysError::invalid("cannot build a lattice from an empty basis"));
    }

    let Cells { nx, ny, nz } = cells;
    let mut coords = Vec::with_capacity(cells.num_sites(basis.len())?);

    for i in 0..nx {
        for j in 0..ny {
            for k in 0..nz {
                let cell = Coord::new(i as f64, j as f64, k as f64);
                coords.extend(basis.points.iter().map(|&p| (p + cell) * a));
            }
        }
    }

    Ok(Crystal { coords })
}

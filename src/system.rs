//! The simulation box and the final polycrystalline system.

use coord::Coord;
use error::{PolycrysError, Result};
use lattice::Cells;

#[derive(Clone, Copy, Debug, PartialEq)]
/// A cuboid periodic simulation box with its lower corner at the origin.
pub struct SimBox {
    size: Coord,
}

impl SimBox {
    /// Construct a box of the given edge lengths.
    ///
    /// # Errors
    /// Returns an error if any edge is non-positive or not finite.
    pub fn new(size: Coord) -> Result<SimBox> {
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !(positive(size.x) && positive(size.y) && positive(size.z)) {
            return Err(PolycrysError::invalid(format!("box size {} must be positive", size)));
        }

        Ok(SimBox { size })
    }

    /// The box spanned by a number of unit cells of side `a`.
    pub fn from_cells(a: f64, cells: Cells) -> Result<SimBox> {
        SimBox::new(cells.box_size(a))
    }

    pub fn size(&self) -> Coord {
        self.size
    }

    /// The `(lo, hi)` bounds along x, y and z.
    pub fn bounds(&self) -> [(f64, f64); 3] {
        [(0.0, self.size.x), (0.0, self.size.y), (0.0, self.size.z)]
    }

    /// Whether a coordinate is inside the box. The bounds are inclusive
    /// on both sides.
    ///
    /// # Examples
    /// ```
    /// # use polycrys::coord::Coord;
    /// # use polycrys::system::SimBox;
    /// let simbox = SimBox::new(Coord::new(1.0, 2.0, 3.0)).unwrap();
    ///
    /// assert!(simbox.contains(Coord::new(0.0, 2.0, 1.5)));
    /// assert!(!simbox.contains(Coord::new(0.5, 2.1, 1.5)));
    /// ```
    pub fn contains(&self, coord: Coord) -> bool {
        let (x, y, z) = coord.to_tuple();

        x >= 0.0 && x <= self.size.x && y >= 0.0 && y <= self.size.y && z >= 0.0 && z <= self.size.z
    }

    /// Translation of the periodic image with indices `(dx, dy, dz)`.
    pub fn image_shift(&self, image: [i8; 3]) -> Coord {
        Coord::new(image[0] as f64, image[1] as f64, image[2] as f64).scale(self.size)
    }

    pub fn volume(&self) -> f64 {
        self.size.x * self.size.y * self.size.z
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// A single atom of a `Polycrystal`.
pub struct AtomRecord {
    /// Index of the atom in the system.
    pub index: usize,
    /// Species id, starting from 1.
    pub species: usize,
    /// Id of the grain which the atom was filled from.
    pub grain: usize,
    /// Absolute position.
    pub position: Coord,
}

#[derive(Clone, Debug)]
/// The accumulated atoms of all grains.
///
/// Positions, species and grain ids are kept in parallel lists which always
/// have the same length.
pub struct Polycrystal {
    simbox: SimBox,
    coords: Vec<Coord>,
    species: Vec<usize>,
    grains: Vec<usize>,
}

impl Polycrystal {
    /// An empty system in the given box.
    pub fn new(simbox: SimBox) -> Polycrystal {
        Polycrystal {
            simbox,
            coords: Vec::new(),
            species: Vec::new(),
            grains: Vec::new(),
        }
    }

    /// Append atoms of one species from one grain.
    pub fn extend_species(&mut self, coords: &[Coord], species: usize, grain: usize) {
        self.coords.extend_from_slice(coords);
        self.species.extend(coords.iter().map(|_| species));
        self.grains.extend(coords.iter().map(|_| grain));
    }

    /// Append all atoms of another system, keeping their tags.
    pub fn append(&mut self, mut other: Polycrystal) {
        self.coords.append(&mut other.coords);
        self.species.append(&mut other.species);
        self.grains.append(&mut other.grains);
    }

    /// Keep only the atoms for which `keep[i]` is set. The mask must have
    /// one value per atom.
    pub(crate) fn retain_indices(&mut self, keep: &[bool]) {
        assert_eq!(self.num_atoms(), keep.len(), "mask length must match the number of atoms");

        let mut i = 0;
        self.coords.retain(|_| { i += 1; keep[i - 1] });
        let mut i = 0;
        self.species.retain(|_| { i += 1; keep[i - 1] });
        let mut i = 0;
        self.grains.retain(|_| { i += 1; keep[i - 1] });
    }

    pub fn simbox(&self) -> SimBox {
        self.simbox
    }

    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    pub fn species(&self) -> &[usize] {
        &self.species
    }

    pub fn grains(&self) -> &[usize] {
        &self.grains
    }

    pub fn num_atoms(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// The largest species id, ie. the number of atom types.
    pub fn num_species(&self) -> usize {
        self.species.iter().cloned().max().unwrap_or(0)
    }

    /// Number of atoms which were filled from a grain.
    pub fn num_atoms_in_grain(&self, grain: usize) -> usize {
        self.grains.iter().filter(|&&g| g == grain).count()
    }

    /// Iterate over all atoms in order.
    pub fn iter_atoms<'a>(&'a self) -> impl Iterator<Item = AtomRecord> + 'a {
        self.coords
            .iter()
            .zip(self.species.iter().zip(self.grains.iter()))
            .enumerate()
            .map(|(index, (&position, (&species, &grain)))| {
                AtomRecord { index, species, grain, position }
            })
    }
}

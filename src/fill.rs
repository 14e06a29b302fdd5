//! Fill grain regions with rotated crystals.
//!
//! # Examples
//! Construct a polycrystal of four diamond cubic grains.
//!
//! ```
//! extern crate rand;
//! # extern crate polycrys;
//! use polycrys::fill::{create_polycrystal, GenerationConf};
//! use polycrys::grain::Sampler;
//! use polycrys::lattice::{Basis, Cells};
//! use rand::{SeedableRng, StdRng};
//!
//! # fn main() {
//! let conf = GenerationConf {
//!     lattice_constant: 5.403,
//!     cells: Cells::cubic(3),
//!     bases: Basis::diamond(),
//! };
//!
//! let seed: &[usize] = &[2017];
//! let mut rng = StdRng::from_seed(seed);
//! let system = create_polycrystal(&conf, &Sampler::new(4), &mut rng).unwrap();
//!
//! assert_eq!(2, system.num_species());
//! # }
//! ```

use classify::{BruteForce, Classify};
use coord::Coord;
use error::{PolycrysError, Result};
use grain::{GrainRecord, Sampler};
use lattice::{lattice, Basis, Cells};
use rotation::Rotation;
use system::{Polycrystal, SimBox};

use rand::Rng;
use rand::distributions::{IndependentSample, Range};
use rayon::prelude::*;

/// The local crystal block of a grain is this many times larger than the box
/// along every axis, and shifted back by one box length.
const BLOCK_MULTIPLE: u64 = 3;

#[derive(Clone, Debug, PartialEq)]
/// Configuration of the crystal which the grains are cut from.
pub struct GenerationConf {
    /// Lattice constant of the cubic unit cell (Å).
    pub lattice_constant: f64,
    /// Number of unit cells along each axis of the box.
    pub cells: Cells,
    /// Sublattices of the unit cell. Atoms from the basis at index `i` are
    /// given species id `i + 1`.
    pub bases: Vec<Basis>,
}

impl GenerationConf {
    /// The simulation box spanned by the unit cells.
    pub fn simbox(&self) -> Result<SimBox> {
        SimBox::from_cells(self.lattice_constant, self.cells)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Crystal orientation of a grain. The same orientation is used for
/// all periodic images of a grain.
pub struct Orientation {
    /// Rotation angle in units of pi / 2.
    pub seed: f64,
    /// Unit rotation axis.
    pub axis: Coord,
}

impl Orientation {
    /// Draw an orientation with an angle seed of 0.1, 0.2, ..., 0.9 and an axis
    /// pointing into the positive octant.
    pub fn random<R: Rng>(rng: &mut R) -> Orientation {
        let range_seed = Range::new(1u32, 10);
        let range_axis = Range::new(0.0, 1.0);

        let seed = range_seed.ind_sample(rng) as f64 * 0.1;

        loop {
            let axis = Coord::new(range_axis.ind_sample(rng),
                                  range_axis.ind_sample(rng),
                                  range_axis.ind_sample(rng));
            let norm = axis.norm();

            if norm > 1e-6 {
                return Orientation { seed, axis: axis * (1.0 / norm) };
            }
        }
    }

    /// The orientation which leaves the crystal as it is.
    pub fn identity() -> Orientation {
        Orientation { seed: 0.0, axis: Coord::new(0.0, 0.0, 1.0) }
    }
}

/// Fills grains with atoms of every basis.
pub struct GrainFiller<'a, C: Classify + Sync> {
    conf: &'a GenerationConf,
    simbox: SimBox,
    block_cells: Cells,
    classifier: C,
}

impl<'a, C: Classify + Sync> GrainFiller<'a, C> {
    /// # Errors
    /// Returns an error if the configuration has no bases, does not span
    /// a valid box or its crystal block is too large to be generated.
    pub fn new(conf: &'a GenerationConf, classifier: C) -> Result<GrainFiller<'a, C>> {
        if conf.bases.is_empty() {
            return Err(PolycrysError::invalid("at least one basis is needed to fill grains"));
        }

        let block_cells = conf.cells.multiply(BLOCK_MULTIPLE)?;
        for basis in conf.bases.iter() {
            block_cells.num_sites(basis.len())?;
        }

        Ok(GrainFiller {
            conf,
            simbox: conf.simbox()?,
            block_cells,
            classifier,
        })
    }

    /// Draw one orientation per grain and fill all of them.
    ///
    /// The orientations are drawn in grain order, so the result only depends
    /// on the state of the random source.
    pub fn fill<R: Rng>(&self, grains: &[GrainRecord], rng: &mut R) -> Result<Polycrystal> {
        let orientations: Vec<Orientation> = grains.iter()
            .map(|_| Orientation::random(rng))
            .collect();

        self.fill_oriented(grains, &orientations)
    }

    /// Fill all grains using the given orientations, one per grain.
    ///
    /// Grains are filled in parallel and merged in grain order. Atoms are not
    /// deduplicated, so atoms of neighbouring grains may overlap at the grain
    /// boundaries.
    ///
    /// # Errors
    /// Returns an error if the number of orientations does not match the grains,
    /// if any lattice, rotation or classification fails or if a grain ends up
    /// without atoms.
    pub fn fill_oriented(&self, grains: &[GrainRecord], orientations: &[Orientation])
            -> Result<Polycrystal> {
        if grains.len() != orientations.len() {
            return Err(PolycrysError::invalid(format!(
                "got {} orientations for {} grains", orientations.len(), grains.len()
            )));
        }

        let filled = grains.par_iter()
            .zip(orientations.par_iter())
            .map(|(grain, &orientation)| self.fill_grain(grain, orientation))
            .collect::<Result<Vec<Polycrystal>>>()?;

        let mut system = Polycrystal::new(self.simbox);
        for grain in filled {
            system.append(grain);
        }

        info!("Created {} atoms in {} grains", system.num_atoms(), grains.len());

        Ok(system)
    }

    /// Fill the region of every image of a single grain.
    pub fn fill_grain(&self, grain: &GrainRecord, orientation: Orientation) -> Result<Polycrystal> {
        let rotation = Rotation::rodrigues(orientation.seed, orientation.axis)?;

        // The rotated block is the same for every image of the grain
        let blocks = self.conf.bases
            .iter()
            .map(|basis| self.rotated_block(basis, &rotation))
            .collect::<Result<Vec<_>>>()?;

        let mut system = Polycrystal::new(self.simbox);

        for image in grain.images() {
            for (i, block) in blocks.iter().enumerate() {
                let mut kept = Vec::new();

                for &coord in block {
                    if self.classifier.in_region(coord, image.position)? {
                        kept.push(coord);
                    }
                }

                debug!("Grain {} image {:?} basis {}: kept {} atoms",
                       grain.id(), image.image, i + 1, kept.len());
                system.extend_species(&kept, i + 1, grain.id());
            }
        }

        if system.is_empty() {
            return Err(PolycrysError::failure(format!(
                "grain {} centered at {} did not keep any atoms", grain.id(), grain.primary()
            )));
        }

        info!("Filled grain {} with {} atoms", grain.id(), system.num_atoms());

        Ok(system)
    }

    /// Generate the oversized crystal block of a basis, shift it back by one box
    /// length, rotate it and keep the atoms which are inside the box.
    fn rotated_block(&self, basis: &Basis, rotation: &Rotation) -> Result<Vec<Coord>> {
        let mut block = lattice(self.conf.lattice_constant, self.block_cells, basis)?
            .translate(-self.simbox.size());

        rotation.apply_to(&mut block);

        Ok(block.coords.into_iter().filter(|&c| self.simbox.contains(c)).collect())
    }
}

/// Sample grain centers, fill them with the configured crystal and return
/// the system. Grain regions are classified by a brute force search over
/// all grain center images.
///
/// # Errors
/// Returns an error if the configuration is invalid or if the generation fails.
pub fn create_polycrystal<R: Rng>(conf: &GenerationConf, sampler: &Sampler, rng: &mut R)
        -> Result<Polycrystal> {
    let simbox = conf.simbox()?;
    info!("Creating {} grains in a box of size {}", sampler.num_grains, simbox.size());

    let grains = sampler.sample(&simbox, rng)?;
    let filler = GrainFiller::new(conf, BruteForce::new(&grains))?;

    filler.fill(&grains, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use grain::all_centers;
    use rand::{SeedableRng, StdRng};

    fn setup_rng() -> StdRng {
        let seed: &[usize] = &[5, 4, 0, 3];
        StdRng::from_seed(seed)
    }

    fn simple_cubic_conf(a: f64, n: u64) -> GenerationConf {
        GenerationConf {
            lattice_constant: a,
            cells: Cells::cubic(n),
            bases: vec![Basis::new(vec![Coord::ORIGO]).unwrap()],
        }
    }

    fn closest_distance_sq(coord: Coord, grain: &GrainRecord) -> f64 {
        grain.images()
             .iter()
             .map(|c| coord.distance_sq(c.position))
             .fold(::std::f64::INFINITY, f64::min)
    }

    #[test]
    fn unrotated_single_grain_fills_the_box_with_a_simple_cubic_lattice() {
        let conf = simple_cubic_conf(1.0, 10);
        let simbox = conf.simbox().unwrap();

        // No lattice position is equidistant to two images of this center
        let grains = vec![GrainRecord::new(0, Coord::new(0.25, 0.25, 0.25), &simbox).unwrap()];
        let filler = GrainFiller::new(&conf, BruteForce::new(&grains)).unwrap();
        let system = filler.fill_oriented(&grains, &[Orientation::identity()]).unwrap();

        assert_eq!(11 * 11 * 11, system.num_atoms());
        assert!(system.species().iter().all(|&s| s == 1));
        assert!(system.grains().iter().all(|&g| g == 0));
        assert!(system.coords().iter().all(|&c| simbox.contains(c)));

        for x in 0..11 {
            let coord = Coord::new(x as f64, 10.0 - x as f64, 5.0);
            assert!(system.coords().iter().any(|c| c.exact_eq(&coord)));
        }
    }

    #[test]
    fn rotated_single_grain_roughly_fills_the_box() {
        let conf = simple_cubic_conf(1.0, 10);
        let mut rng = setup_rng();

        let system = create_polycrystal(&conf, &Sampler::new(1), &mut rng).unwrap();

        // One atom per unit volume, with some rounding at the box edges
        let num_atoms = system.num_atoms();
        assert!(num_atoms > 800 && num_atoms < 1600, "{} atoms", num_atoms);

        assert_eq!(1, system.num_species());
        assert!(system.coords().iter().all(|&c| system.simbox().contains(c)));
    }

    #[test]
    fn atoms_are_closest_to_the_images_of_their_own_grain() {
        let conf = simple_cubic_conf(1.0, 10);
        let simbox = conf.simbox().unwrap();
        let grains = vec![
            GrainRecord::new(0, Coord::new(1.0, 1.0, 1.0), &simbox).unwrap(),
            GrainRecord::new(1, Coord::new(9.0, 9.0, 9.0), &simbox).unwrap(),
        ];

        let filler = GrainFiller::new(&conf, BruteForce::new(&grains)).unwrap();
        let system = filler.fill(&grains, &mut setup_rng()).unwrap();

        assert!(system.num_atoms_in_grain(0) > 0);
        assert!(system.num_atoms_in_grain(1) > 0);

        for atom in system.iter_atoms() {
            let own = closest_distance_sq(atom.position, &grains[atom.grain]);
            let other = closest_distance_sq(atom.position, &grains[1 - atom.grain]);

            assert!(own <= other, "atom {} at {} is closer to the other grain", atom.index, atom.position);
        }
    }

    #[test]
    fn species_are_given_by_the_basis_order() {
        let conf = GenerationConf {
            lattice_constant: 1.0,
            cells: Cells::cubic(2),
            bases: Basis::diamond(),
        };
        let simbox = conf.simbox().unwrap();
        let grains = vec![GrainRecord::new(0, Coord::new(0.3, 0.3, 0.3), &simbox).unwrap()];

        let filler = GrainFiller::new(&conf, BruteForce::new(&grains)).unwrap();
        let system = filler.fill_oriented(&grains, &[Orientation::identity()]).unwrap();

        let is_quarter = |v: f64| {
            let frac = v - v.floor();
            frac == 0.25 || frac == 0.75
        };

        assert_eq!(2, system.num_species());

        for atom in system.iter_atoms() {
            let (x, y, z) = atom.position.to_tuple();
            match atom.species {
                1 => assert!(!is_quarter(x) && !is_quarter(y) && !is_quarter(z)),
                2 => assert!(is_quarter(x) && is_quarter(y) && is_quarter(z)),
                s => panic!("unexpected species {}", s),
            }
        }
    }

    #[test]
    fn same_seed_gives_the_same_system() {
        let conf = simple_cubic_conf(1.0, 6);

        let system1 = create_polycrystal(&conf, &Sampler::new(3), &mut setup_rng()).unwrap();
        let system2 = create_polycrystal(&conf, &Sampler::new(3), &mut setup_rng()).unwrap();

        assert_eq!(system1.num_atoms(), system2.num_atoms());
        assert_eq!(system1.species(), system2.species());
        assert_eq!(system1.grains(), system2.grains());
        assert!(system1.coords().iter().zip(system2.coords().iter()).all(|(a, b)| a.exact_eq(b)));
    }

    #[test]
    fn random_orientations_have_unit_axes() {
        let mut rng = setup_rng();

        for _ in 0..100 {
            let orientation = Orientation::random(&mut rng);
            assert!((orientation.axis.norm() - 1.0).abs() < 1e-12);

            let tenths = orientation.seed * 10.0;
            assert!((tenths - tenths.round()).abs() < 1e-9);
            assert!(tenths.round() >= 1.0 && tenths.round() <= 9.0);
        }
    }

    struct Nowhere;

    impl Classify for Nowhere {
        fn in_region(&self, _: Coord, _: Coord) -> Result<bool> {
            Ok(false)
        }
    }

    struct Broken;

    impl Classify for Broken {
        fn in_region(&self, _: Coord, _: Coord) -> Result<bool> {
            Err(PolycrysError::invalid("broken classifier"))
        }
    }

    #[test]
    fn grain_without_atoms_is_a_generation_failure() {
        let conf = simple_cubic_conf(1.0, 2);
        let simbox = conf.simbox().unwrap();
        let grains = vec![GrainRecord::new(0, Coord::new(1.0, 1.0, 1.0), &simbox).unwrap()];

        let filler = GrainFiller::new(&conf, Nowhere).unwrap();
        match filler.fill_oriented(&grains, &[Orientation::identity()]) {
            Err(PolycrysError::GenerationFailure(_)) => (),
            other => panic!("expected a generation failure, got {:?}", other.map(|s| s.num_atoms())),
        }
    }

    #[test]
    fn classifier_errors_abort_the_fill() {
        let conf = simple_cubic_conf(1.0, 2);
        let simbox = conf.simbox().unwrap();
        let grains = vec![GrainRecord::new(0, Coord::new(1.0, 1.0, 1.0), &simbox).unwrap()];

        let filler = GrainFiller::new(&conf, Broken).unwrap();
        assert_eq!(
            Err(PolycrysError::invalid("broken classifier")),
            filler.fill_oriented(&grains, &[Orientation::identity()]).map(|s| s.num_atoms())
        );
    }

    #[test]
    fn configuration_without_bases_is_rejected() {
        let mut conf = simple_cubic_conf(1.0, 2);
        conf.bases.clear();

        assert!(GrainFiller::new(&conf, BruteForce::from_centers(vec![])).is_err());
    }

    #[test]
    fn oversized_crystal_blocks_are_rejected() {
        for &n in [u64::max_value() / 2, 1 << 21].iter() {
            let conf = simple_cubic_conf(1.0, n);

            match GrainFiller::new(&conf, BruteForce::from_centers(vec![])) {
                Err(PolycrysError::InvalidInput(_)) => (),
                _ => panic!("expected a block of {} cells to be rejected", n),
            }
        }
    }

    #[test]
    fn orientation_count_must_match_the_grains() {
        let conf = simple_cubic_conf(1.0, 2);
        let simbox = conf.simbox().unwrap();
        let grains = vec![GrainRecord::new(0, Coord::new(1.0, 1.0, 1.0), &simbox).unwrap()];

        let filler = GrainFiller::new(&conf, BruteForce::from_centers(all_centers(&grains))).unwrap();
        assert!(filler.fill_oriented(&grains, &[]).is_err());
    }
}

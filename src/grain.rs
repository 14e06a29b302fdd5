//! Sample grain centers and their periodic images.
//!
//! Every grain is represented by a center inside the box together with its 26
//! translated copies in the neighbouring boxes. Atoms close to a box edge are
//! classified against these images, which makes the grain regions periodic.

use coord::Coord;
use error::{PolycrysError, Result};
use system::SimBox;

use rand::Rng;
use rand::distributions::{IndependentSample, Range};

/// Number of periodic images of every grain center, including itself.
pub const NUM_IMAGES: usize = 27;

/// Number of times a degenerate configuration is redrawn before giving up.
const MAX_REDRAWS: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq)]
/// One periodic image of a grain center.
pub struct GrainCenter {
    /// Id of the grain the image belongs to.
    pub grain_id: usize,
    /// Box translation of the image along x, y and z, each in {-1, 0, 1}.
    pub image: [i8; 3],
    /// Absolute position of the image.
    pub position: Coord,
}

impl GrainCenter {
    /// Whether this is the untranslated center inside the box.
    pub fn is_primary(&self) -> bool {
        self.image == [0, 0, 0]
    }
}

#[derive(Clone, Debug, PartialEq)]
/// All periodic images of a single grain's center.
pub struct GrainRecord {
    id: usize,
    images: Vec<GrainCenter>,
}

impl GrainRecord {
    /// Create the record of a grain centered at `center`, with its images
    /// translated by every combination of -1, 0 and +1 box lengths.
    ///
    /// # Errors
    /// Returns an error if the center is not finite.
    pub fn new(id: usize, center: Coord, simbox: &SimBox) -> Result<GrainRecord> {
        if !center.is_finite() {
            return Err(PolycrysError::invalid(format!("grain center {} is not finite", center)));
        }

        let mut images = Vec::with_capacity(NUM_IMAGES);
        for &dx in [-1, 0, 1].iter() {
            for &dy in [-1, 0, 1].iter() {
                for &dz in [-1, 0, 1].iter() {
                    let image = [dx, dy, dz];
                    images.push(GrainCenter {
                        grain_id: id,
                        image,
                        position: center + simbox.image_shift(image),
                    });
                }
            }
        }

        Ok(GrainRecord { id, images })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn images(&self) -> &[GrainCenter] {
        &self.images
    }

    /// The center inside the box.
    pub fn primary(&self) -> Coord {
        // Images are ordered with dx, dy, dz = -1, 0, 1 so (0, 0, 0) is the middle one.
        self.images[NUM_IMAGES / 2].position
    }
}

/// Collect the positions of all images of all grains.
pub fn all_centers(grains: &[GrainRecord]) -> Vec<Coord> {
    grains.iter()
          .flat_map(|g| g.images.iter().map(|c| c.position))
          .collect()
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Configuration for sampling grain centers.
pub struct Sampler {
    /// Number of grains.
    pub num_grains: usize,
    /// Redraw all centers if two of them coincide exactly. If not set such
    /// a configuration is kept as it is, with a warning.
    pub redraw_degenerate: bool,
}

impl Sampler {
    pub fn new(num_grains: usize) -> Sampler {
        Sampler { num_grains, redraw_degenerate: false }
    }

    /// Draw the grain centers uniformly inside the box and create their records.
    /// Grain ids are given in the order of sampling, starting from 0.
    ///
    /// # Errors
    /// Returns an error if no grains are requested, or if redrawing is enabled
    /// and no configuration without coinciding centers was found.
    pub fn sample<R: Rng>(&self, simbox: &SimBox, rng: &mut R) -> Result<Vec<GrainRecord>> {
        if self.num_grains == 0 {
            return Err(PolycrysError::invalid("at least one grain must be sampled"));
        }

        let mut centers = draw_centers(self.num_grains, simbox, rng);

        if self.redraw_degenerate {
            let mut attempts = 0;

            while has_coinciding(&centers) {
                attempts += 1;
                if attempts > MAX_REDRAWS {
                    return Err(PolycrysError::failure(format!(
                        "could not sample {} distinct grain centers in {} attempts",
                        self.num_grains, MAX_REDRAWS
                    )));
                }

                warn!("Grain centers coincide, redrawing (attempt {})", attempts);
                centers = draw_centers(self.num_grains, simbox, rng);
            }
        } else if has_coinciding(&centers) {
            warn!("Two grain centers coincide exactly, their grains will overlap");
        }

        centers.into_iter()
               .enumerate()
               .map(|(id, center)| {
                   info!("Grain {} centered at {}", id, center);
                   GrainRecord::new(id, center, simbox)
               })
               .collect()
    }
}

fn draw_centers<R: Rng>(num_grains: usize, simbox: &SimBox, rng: &mut R) -> Vec<Coord> {
    let size = simbox.size();
    let range_x = Range::new(0.0, size.x);
    let range_y = Range::new(0.0, size.y);
    let range_z = Range::new(0.0, size.z);

    (0..num_grains)
        .map(|_| {
            Coord::new(range_x.ind_sample(rng), range_y.ind_sample(rng), range_z.ind_sample(rng))
        })
        .collect()
}

fn has_coinciding(centers: &[Coord]) -> bool {
    centers.iter()
           .enumerate()
           .any(|(i, c1)| centers.iter().skip(i + 1).any(|c2| c1.exact_eq(c2)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, StdRng};

    fn setup_box() -> SimBox {
        SimBox::new(Coord::new(10.0, 20.0, 30.0)).unwrap()
    }

    fn setup_rng() -> StdRng {
        let seed: &[usize] = &[1, 2, 3, 4];
        StdRng::from_seed(seed)
    }

    #[test]
    fn every_grain_has_all_images() {
        let simbox = setup_box();
        let grains = Sampler::new(5).sample(&simbox, &mut setup_rng()).unwrap();

        assert_eq!(5, grains.len());
        assert_eq!(5 * NUM_IMAGES, all_centers(&grains).len());

        for (i, grain) in grains.iter().enumerate() {
            assert_eq!(i, grain.id());
            assert_eq!(NUM_IMAGES, grain.images().len());
            assert!(grain.images().iter().all(|c| c.grain_id == i));
        }
    }

    #[test]
    fn exactly_one_primary_image_which_is_in_the_box() {
        let simbox = setup_box();
        let grains = Sampler::new(3).sample(&simbox, &mut setup_rng()).unwrap();
        let drawn = draw_centers(3, &simbox, &mut setup_rng());

        for (grain, center) in grains.iter().zip(drawn.iter()) {
            let primaries: Vec<_> = grain.images().iter().filter(|c| c.is_primary()).collect();
            assert_eq!(1, primaries.len());
            assert!(primaries[0].position.exact_eq(center));
            assert!(grain.primary().exact_eq(center));
            assert!(simbox.contains(grain.primary()));
        }
    }

    #[test]
    fn primary_image_is_the_given_center() {
        let center = Coord::new(9.75, 0.5, 29.0);
        let grain = GrainRecord::new(2, center, &setup_box()).unwrap();

        assert!(grain.primary().exact_eq(&center));
        assert_eq!(1, grain.images().iter().filter(|c| c.position.exact_eq(&center)).count());
    }

    #[test]
    fn images_are_translated_by_the_box() {
        let simbox = setup_box();
        let center = Coord::new(1.0, 2.0, 3.0);
        let grain = GrainRecord::new(7, center, &simbox).unwrap();

        for image in grain.images() {
            let expected = center + Coord::new(10.0 * image.image[0] as f64,
                                               20.0 * image.image[1] as f64,
                                               30.0 * image.image[2] as f64);
            assert_eq!(expected, image.position);
        }

        let image_ids: Vec<_> = grain.images().iter().map(|c| c.image).collect();
        for dx in -1..2 {
            for dy in -1..2 {
                for dz in -1..2 {
                    assert!(image_ids.contains(&[dx, dy, dz]));
                }
            }
        }
    }

    #[test]
    fn same_seed_gives_same_centers() {
        let simbox = setup_box();
        let grains1 = Sampler::new(4).sample(&simbox, &mut setup_rng()).unwrap();
        let grains2 = Sampler::new(4).sample(&simbox, &mut setup_rng()).unwrap();

        assert_eq!(grains1, grains2);
    }

    #[test]
    fn zero_grains_is_an_error() {
        assert!(Sampler::new(0).sample(&setup_box(), &mut setup_rng()).is_err());
    }

    #[test]
    fn non_finite_center_is_an_error() {
        let center = Coord::new(::std::f64::NAN, 0.0, 0.0);
        assert!(GrainRecord::new(0, center, &setup_box()).is_err());
    }

    #[test]
    fn coinciding_centers_are_detected() {
        let c = Coord::new(1.0, 1.0, 1.0);
        assert!(has_coinciding(&[c, Coord::new(2.0, 1.0, 1.0), c]));
        assert!(!has_coinciding(&[c, Coord::new(2.0, 1.0, 1.0)]));
    }

    #[test]
    fn redrawing_keeps_the_grain_count() {
        let sampler = Sampler { num_grains: 6, redraw_degenerate: true };
        let grains = sampler.sample(&setup_box(), &mut setup_rng()).unwrap();
        let primaries: Vec<_> = grains.iter().map(|g| g.primary()).collect();

        assert_eq!(6, primaries.len());
        assert!(!has_coinciding(&primaries));
    }
}

//! Decide which grain a candidate atom position belongs to.
//!
//! A position belongs to a grain image if no other center image is strictly
//! closer to it. Ties are kept by every tied center, so this is a
//! closest-or-tied assignment rather than a strict Voronoi partition:
//! an atom exactly between two grains is filled by both of them.

use coord::Coord;
use error::{PolycrysError, Result};
use grain::{all_centers, GrainRecord};

/// Classifiers of positions into grain regions.
///
/// The brute force implementation compares against every center. A spatial index
/// can be used instead by implementing this trait.
pub trait Classify {
    /// Whether `point` is at least as close to `center` as to any other center.
    ///
    /// # Errors
    /// Returns an error if `point` is not finite.
    fn in_region(&self, point: Coord, center: Coord) -> Result<bool>;
}

#[derive(Clone, Debug)]
/// Classify positions by scanning all grain center images.
pub struct BruteForce {
    centers: Vec<Coord>,
}

impl BruteForce {
    /// Classify against all images of the given grains.
    pub fn new(grains: &[GrainRecord]) -> BruteForce {
        BruteForce { centers: all_centers(grains) }
    }

    /// Classify against an explicit list of centers.
    pub fn from_centers(centers: Vec<Coord>) -> BruteForce {
        BruteForce { centers }
    }

    pub fn centers(&self) -> &[Coord] {
        &self.centers
    }
}

impl Classify for BruteForce {
    fn in_region(&self, point: Coord, center: Coord) -> Result<bool> {
        in_region(point, center, &self.centers)
    }
}

/// Whether `point` is at least as close to `center` as to every other of
/// the `centers`, using squared distances.
///
/// Centers are compared by value: any center which is exactly equal to `center`
/// is skipped, whichever grain it belongs to. Only a strictly closer center
/// excludes the point.
///
/// # Errors
/// Returns an error if `point` is not finite.
///
/// # Examples
/// ```
/// # use polycrys::coord::Coord;
/// # use polycrys::classify::in_region;
/// let centers = vec![Coord::new(0.0, 0.0, 0.0), Coord::new(2.0, 0.0, 0.0)];
///
/// assert!(in_region(Coord::new(0.9, 0.0, 0.0), centers[0], &centers).unwrap());
/// assert!(!in_region(Coord::new(1.1, 0.0, 0.0), centers[0], &centers).unwrap());
/// ```
pub fn in_region(point: Coord, center: Coord, centers: &[Coord]) -> Result<bool> {
    if !point.is_finite() {
        return Err(PolycrysError::invalid(format!("cannot classify position {}", point)));
    }

    let dist_sq = point.distance_sq(center);

    Ok(!centers.iter()
               .filter(|c| !c.exact_eq(&center))
               .any(|&c| point.distance_sq(c) < dist_sq))
}

#[cfg(test)]
mod tests {
    use super::*;
    use system::SimBox;

    #[test]
    fn point_at_a_center_belongs_to_it() {
        let centers = vec![Coord::new(1.0, 1.0, 1.0), Coord::new(3.0, 4.0, 5.0)];

        for &c in centers.iter() {
            assert!(in_region(c, c, &centers).unwrap());
        }
    }

    #[test]
    fn equidistant_centers_both_keep_the_point() {
        let centers = vec![Coord::new(0.0, 0.0, 0.0), Coord::new(2.0, 0.0, 0.0)];
        let point = Coord::new(1.0, 5.0, -3.0);

        assert!(in_region(point, centers[0], &centers).unwrap());
        assert!(in_region(point, centers[1], &centers).unwrap());
    }

    #[test]
    fn strictly_closer_center_excludes_the_point() {
        let centers = vec![Coord::new(0.0, 0.0, 0.0), Coord::new(2.0, 0.0, 0.0)];
        let point = Coord::new(1.0 + 1e-9, 0.0, 0.0);

        assert!(!in_region(point, centers[0], &centers).unwrap());
        assert!(in_region(point, centers[1], &centers).unwrap());
    }

    #[test]
    fn center_missing_from_the_list_is_still_compared() {
        let centers = vec![Coord::new(5.0, 0.0, 0.0)];
        let center = Coord::new(0.0, 0.0, 0.0);

        assert!(in_region(Coord::new(1.0, 0.0, 0.0), center, &centers).unwrap());
        assert!(!in_region(Coord::new(4.0, 0.0, 0.0), center, &centers).unwrap());
    }

    #[test]
    fn coinciding_centers_do_not_exclude_each_other() {
        let c = Coord::new(1.0, 1.0, 1.0);
        let centers = vec![c, c];

        assert!(in_region(Coord::new(1.5, 1.0, 1.0), c, &centers).unwrap());
    }

    #[test]
    fn non_finite_point_is_an_error() {
        let centers = vec![Coord::ORIGO];
        let point = Coord::new(0.0, ::std::f64::NAN, 0.0);

        assert!(in_region(point, Coord::ORIGO, &centers).is_err());
    }

    #[test]
    fn periodic_image_claims_points_across_the_edge() {
        let simbox = SimBox::new(Coord::new(10.0, 10.0, 10.0)).unwrap();
        let grains = vec![
            GrainRecord::new(0, Coord::new(1.0, 5.0, 5.0), &simbox).unwrap(),
            GrainRecord::new(1, Coord::new(5.0, 5.0, 5.0), &simbox).unwrap(),
        ];
        let classifier = BruteForce::new(&grains);
        assert_eq!(54, classifier.centers().len());

        // Closer to the image of grain 0 at x = 11.0 than to grain 1 at x = 5.0
        let point = Coord::new(9.0, 5.0, 5.0);
        let image = Coord::new(11.0, 5.0, 5.0);

        assert!(classifier.in_region(point, image).unwrap());
        assert!(!classifier.in_region(point, grains[1].primary()).unwrap());
        assert!(!classifier.in_region(point, grains[0].primary()).unwrap());
    }
}

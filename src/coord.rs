//! Implement elementary coordinate operations.

use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::{Add, AddAssign, Sub, Neg, Mul};

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
/// A three-dimensional carthesian coordinate (Å).
///
/// # Examples
/// ```
/// # use polycrys::coord::Coord;
/// let coord1 = Coord::new(1.0, 0.0, 1.0);
/// let coord2 = Coord::new(0.5, 0.5, 0.5);
///
/// assert_eq!(Coord::new(1.5, 0.5, 1.5), coord1 + coord2);
/// assert_eq!(Coord::new(0.5, -0.5, 0.5), coord1 - coord2);
/// ```
pub struct Coord {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coord {
    /// A coordinate at origo.
    pub const ORIGO: Self = Coord { x: 0.0, y: 0.0, z: 0.0 };

    /// Construct a new coordinate.
    pub fn new(x: f64, y: f64, z: f64) -> Coord {
        Coord { x: x, y: y, z: z }
    }

    /// Unpack the coordinate into a tuple.
    ///
    /// # Examples
    /// ```
    /// # use polycrys::coord::Coord;
    /// let (x, y, z) = Coord::new(0.0, 1.0, 2.0).to_tuple();
    /// assert_eq!((0.0, 1.0, 2.0), (x, y, z));
    /// ```
    pub fn to_tuple(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }

    /// Whether all components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Scalar product with another coordinate.
    pub fn dot(self, other: Coord) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Length of the coordinate vector.
    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Component-wise product.
    ///
    /// # Examples
    /// ```
    /// # use polycrys::coord::Coord;
    /// let coord = Coord::new(1.0, 2.0, 3.0);
    /// assert_eq!(Coord::new(2.0, -2.0, 0.0), coord.scale(Coord::new(2.0, -1.0, 0.0)));
    /// ```
    pub fn scale(self, other: Coord) -> Coord {
        Coord::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    /// Calculate the absolute distance between two coordinates.
    ///
    /// # Examples
    /// ```
    /// # use polycrys::coord::Coord;
    /// let coord1 = Coord::new(0.0, 1.0, 4.0);
    /// let coord2 = Coord::new(4.0, 4.0, 4.0);
    /// assert!((coord1.distance(coord2) - 5.0).abs() < 1e-9);
    /// ```
    pub fn distance(self, other: Coord) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// The squared distance between two coordinates. Enough for ranking
    /// distances against each other.
    pub fn distance_sq(self, other: Coord) -> f64 {
        let dx = self - other;

        dx.x * dx.x + dx.y * dx.y + dx.z * dx.z
    }

    /// Exact equality of every component, without the tolerance used by `==`.
    pub fn exact_eq(&self, other: &Coord) -> bool {
        self.x == other.x && self.y == other.y && self.z == other.z
    }

    /// Return the coordinate with its position adjusted to lie within the input box.
    ///
    /// If an input box size side is 0.0 (or smaller) the coordinate is not changed
    /// along that side since it doesn't make sense.
    ///
    /// # Examples
    /// ```
    /// # use polycrys::coord::Coord;
    /// let box_size = Coord::new(1.0, 1.0, 1.0);
    /// let coord = Coord::new(0.5, 2.5, -2.5);
    /// assert_eq!(Coord::new(0.5, 0.5, 0.5), coord.with_pbc(box_size));
    /// ```
    pub fn with_pbc(self, box_size: Coord) -> Coord {
        let do_pbc = |c: f64, size: f64| {
            if size <= 0.0 {
                c
            } else {
                c - size * (c / size).floor()
            }
        };

        let (x, y, z) = self.to_tuple();
        Coord::new(do_pbc(x, box_size.x), do_pbc(y, box_size.y), do_pbc(z, box_size.z))
    }

    /// The shortest vector from `other` to this coordinate among all periodic
    /// images of the box (minimum image convention).
    ///
    /// # Examples
    /// ```
    /// # use polycrys::coord::Coord;
    /// let box_size = Coord::new(10.0, 10.0, 10.0);
    /// let delta = Coord::new(9.5, 0.0, 5.0).pbc_delta(Coord::new(0.5, 0.0, 1.0), box_size);
    /// assert_eq!(Coord::new(-1.0, 0.0, 4.0), delta);
    /// ```
    pub fn pbc_delta(self, other: Coord, box_size: Coord) -> Coord {
        let wrap = |d: f64, size: f64| {
            if size <= 0.0 {
                d
            } else {
                d - size * (d / size).round()
            }
        };

        let d = self - other;
        Coord::new(wrap(d.x, box_size.x), wrap(d.y, box_size.y), wrap(d.z, box_size.z))
    }
}

impl Display for Coord {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

impl From<[f64; 3]> for Coord {
    fn from(values: [f64; 3]) -> Coord {
        Coord::new(values[0], values[1], values[2])
    }
}

impl From<Coord> for [f64; 3] {
    fn from(coord: Coord) -> [f64; 3] {
        [coord.x, coord.y, coord.z]
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, other: Coord) -> Self::Output {
        Coord::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign for Coord {
    fn add_assign(&mut self, other: Coord) {
        *self = *self + other;
    }
}

impl Sub for Coord {
    type Output = Coord;

    fn sub(self, other: Coord) -> Self::Output {
        Coord::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Neg for Coord {
    type Output = Coord;

    fn neg(self) -> Self::Output {
        Coord { x: -self.x, y: -self.y, z: -self.z }
    }
}

impl Mul<f64> for Coord {
    type Output = Coord;

    fn mul(self, value: f64) -> Coord {
        Coord::new(self.x * value, self.y * value, self.z * value)
    }
}

impl PartialEq for Coord {
    fn eq(&self, other: &Coord) -> bool {
        let atol = 1e-9;
        (self.x - other.x).abs() < atol
            && (self.y - other.y).abs() < atol
            && (self.z - other.z).abs() < atol
    }
}

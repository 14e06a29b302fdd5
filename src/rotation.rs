//! Rotate crystals about an arbitrary axis through the origin with the
//! Rodrigues rotation formula.

use coord::Coord;
use error::{PolycrysError, Result};
use lattice::Crystal;

use std::f64::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq)]
/// A 3x3 rotation matrix, stored by rows.
pub struct Rotation {
    matrix: [[f64; 3]; 3],
}

impl Rotation {
    /// The rotation about `axis` by the angle `seed * pi / 2` radians:
    ///
    /// `R = I + K sin(theta) + K^2 (1 - cos(theta))`
    ///
    /// where `K` is the cross product matrix of the axis.
    ///
    /// The axis must be a unit vector: it is *not* normalized here, and a longer
    /// or shorter axis will scale the positions as well as rotating them.
    ///
    /// # Errors
    /// Returns an error if the axis is the zero vector or if the axis or
    /// seed is not finite.
    pub fn rodrigues(seed: f64, axis: Coord) -> Result<Rotation> {
        if !axis.is_finite() || !seed.is_finite() {
            return Err(PolycrysError::invalid(
                format!("cannot rotate by seed {} about axis {}", seed, axis)
            ));
        }
        if axis.exact_eq(&Coord::ORIGO) {
            return Err(PolycrysError::invalid("cannot rotate about a zero length axis"));
        }

        let theta = seed * PI / 2.0;
        let (sin, cos) = theta.sin_cos();
        let (ux, uy, uz) = axis.to_tuple();

        let k = [
            [0.0, -uz, uy],
            [uz, 0.0, -ux],
            [-uy, ux, 0.0],
        ];
        let kk = mat_mul(&k, &k);

        let mut matrix = [[0.0; 3]; 3];
        for i in 0..3 {
            for j in 0..3 {
                let identity = if i == j { 1.0 } else { 0.0 };
                matrix[i][j] = identity + k[i][j] * sin + kk[i][j] * (1.0 - cos);
            }
        }

        Ok(Rotation { matrix })
    }

    /// Rotate a single position.
    pub fn apply(&self, coord: Coord) -> Coord {
        let m = &self.matrix;
        let (x, y, z) = coord.to_tuple();

        Coord::new(
            m[0][0] * x + m[0][1] * y + m[0][2] * z,
            m[1][0] * x + m[1][1] * y + m[1][2] * z,
            m[2][0] * x + m[2][1] * y + m[2][2] * z,
        )
    }

    /// Rotate every position of a crystal in place.
    pub fn apply_to(&self, crystal: &mut Crystal) {
        for c in crystal.coords.iter_mut() {
            *c = self.apply(*c);
        }
    }
}

fn mat_mul(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut out = [[0.0; 3]; 3];

    for i in 0..3 {
        for j in 0..3 {
            out[i][j] = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }

    out
}

/// Return a copy of the crystal rotated about `axis` (through the origin) by
/// `seed * pi / 2` radians. See `Rotation::rodrigues` for the axis requirements.
///
/// # Examples
/// ```
/// # use polycrys::coord::Coord;
/// # use polycrys::lattice::Crystal;
/// # use polycrys::rotation::rotate;
/// let crystal = Crystal { coords: vec![Coord::new(1.0, 0.0, 0.0)] };
/// let rotated = rotate(&crystal, 1.0, Coord::new(0.0, 0.0, 1.0)).unwrap();
///
/// assert_eq!(vec![Coord::new(0.0, 1.0, 0.0)], rotated.coords);
/// ```
pub fn rotate(crystal: &Crystal, seed: f64, axis: Coord) -> Result<Crystal> {
    let rotation = Rotation::rodrigues(seed, axis)?;
    let mut rotated = crystal.clone();
    rotation.apply_to(&mut rotated);

    Ok(rotated)
}

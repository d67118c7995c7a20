use super::vec3d::Vec3D;
use strum_macros::Display;

/// Standard gravity in m/s².
const STANDARD_GRAVITY: f64 = 9.806_65;
/// Accelerometer readings below 10% of `g` are treated as free fall.
const FREE_FALL_GRAVITY_SQUARED: f64 = 0.01 * STANDARD_GRAVITY * STANDARD_GRAVITY;
/// Minimum magnitude of `E × A` before the horizontal field is considered unresolvable.
const MIN_HORIZONTAL_FIELD: f64 = 0.1;

/// Reasons a gravity/geomagnetic pair cannot be turned into an orientation.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum OrientationError {
    #[strum(to_string = "Device is in free fall, heading unavailable")]
    FreeFall,
    #[strum(to_string = "Sensor vectors are degenerate, heading unavailable")]
    Degenerate,
}

impl std::error::Error for OrientationError {}

/// Row-major rotation from device coordinates into the world frame
/// (x east, y magnetic north, z up), together with the inclination matrix
/// describing the dip of the geomagnetic field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationMatrix {
    rows: [Vec3D<f64>; 3],
    inclination_cos: f64,
    inclination_sin: f64,
}

impl RotationMatrix {
    /// Builds the rotation matrix from a gravity and a geomagnetic reading.
    ///
    /// The rows are `H = E × A` (east), `M = A × H` (north) and `A` (up),
    /// each normalized. The computation fails if the device is in free fall
    /// or if the two vectors are (close to) parallel.
    ///
    /// # Arguments
    /// * `gravity` - The latest accelerometer reading in m/s².
    /// * `geomagnetic` - The latest magnetometer reading in µT.
    ///
    /// # Returns
    /// The rotation matrix or an [`OrientationError`].
    pub fn from_gravity_and_geomagnetic(
        gravity: Vec3D<f64>,
        geomagnetic: Vec3D<f64>,
    ) -> Result<Self, OrientationError> {
        let norm_sq_a = gravity.abs_sq();
        if norm_sq_a < FREE_FALL_GRAVITY_SQUARED {
            return Err(OrientationError::FreeFall);
        }
        let h = geomagnetic.cross(gravity);
        let norm_h = h.abs();
        if norm_h < MIN_HORIZONTAL_FIELD || !norm_h.is_finite() {
            return Err(OrientationError::Degenerate);
        }
        let h = h.normalize();
        let a = gravity.normalize();
        let m = a.cross(h);

        let norm_e = geomagnetic.abs();
        let inclination_cos = geomagnetic.dot(m) / norm_e;
        let inclination_sin = geomagnetic.dot(a) / norm_e;

        Ok(Self { rows: [h, m, a], inclination_cos, inclination_sin })
    }

    /// Returns the element in row `r`, column `c`.
    pub fn get(&self, r: usize, c: usize) -> f64 {
        let row = self.rows[r];
        match c {
            0 => row.x(),
            1 => row.y(),
            _ => row.z(),
        }
    }

    /// Derives azimuth, pitch and roll (radians) from the rotation.
    ///
    /// Azimuth is the rotation about the `-z` axis, `0` when the device's
    /// y-axis points to magnetic north, positive towards east, in `[-π, π]`.
    pub fn orientation(&self) -> [f64; 3] {
        let azimuth = self.get(0, 1).atan2(self.get(1, 1));
        let pitch = (-self.get(2, 1)).asin();
        let roll = (-self.get(2, 0)).atan2(self.get(2, 2));
        [azimuth, pitch, roll]
    }

    /// Magnetic dip angle in radians, positive when the field points into the ground.
    pub fn inclination(&self) -> f64 { -self.inclination_sin.atan2(self.inclination_cos) }
}

use super::rotation::{OrientationError, RotationMatrix};
use super::vec3d::Vec3D;
use crate::event;
use strum_macros::Display;

/// The physical sensor a [`SensorSample`] originates from.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorSource {
    #[strum(serialize = "accelerometer")]
    Accelerometer,
    #[strum(serialize = "magnetometer")]
    Magnetometer,
}

/// A single tri-axis reading. Specific force in m/s² for the accelerometer,
/// magnetic flux density in µT for the magnetometer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    source: SensorSource,
    values: Vec3D<f64>,
}

impl SensorSample {
    pub fn new(source: SensorSource, values: Vec3D<f64>) -> Self { Self { source, values } }
    pub fn accelerometer(x: f64, y: f64, z: f64) -> Self {
        Self::new(SensorSource::Accelerometer, Vec3D::new(x, y, z))
    }
    pub fn magnetometer(x: f64, y: f64, z: f64) -> Self {
        Self::new(SensorSource::Magnetometer, Vec3D::new(x, y, z))
    }
    pub fn source(&self) -> SensorSource { self.source }
    pub fn values(&self) -> Vec3D<f64> { self.values }
}

/// Corrected compass heading in whole degrees, always within `[-180, 180]`.
///
/// The mount correction mirrors the raw azimuth: headings east of north
/// become negative, headings west of north positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bearing(i32);

impl Bearing {
    /// Applies the mount correction to a raw azimuth in `[0, 360)`.
    ///
    /// ```text
    /// raw <= 180  ->  -raw
    /// raw  > 180  ->  360 - raw
    /// ```
    pub fn from_raw_azimuth(raw: i32) -> Self {
        if raw <= 180 { Bearing(-raw) } else { Bearing(360 - raw) }
    }

    /// Normalizes an azimuth in radians into whole degrees in `[0, 360)` and
    /// applies the mount correction. Fractional degrees are truncated.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_azimuth_rad(azimuth: f64) -> Self {
        // `%` keeps the sum below 360 even when a tiny negative azimuth rounds up to 360.0
        let normalized = (azimuth.to_degrees() + 360.0) % 360.0;
        Self::from_raw_azimuth(normalized as i32)
    }

    pub fn degrees(self) -> i32 { self.0 }

    /// Wire representation sent to the actuator: decimal ASCII, no terminator.
    pub fn to_frame(self) -> Vec<u8> { self.0.to_string().into_bytes() }
}

impl std::fmt::Display for Bearing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

/// The latest sample of each source. Both must be present before a bearing
/// can be computed.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrientationState {
    gravity: Option<Vec3D<f64>>,
    geomagnetic: Option<Vec3D<f64>>,
}

impl OrientationState {
    pub fn gravity(&self) -> Option<Vec3D<f64>> { self.gravity }
    pub fn geomagnetic(&self) -> Option<Vec3D<f64>> { self.geomagnetic }
    pub fn is_ready(&self) -> bool { self.gravity.is_some() && self.geomagnetic.is_some() }
}

/// Turns raw accelerometer and magnetometer samples into a [`Bearing`].
#[derive(Debug, Default)]
pub struct OrientationEstimator {
    state: OrientationState,
}

impl OrientationEstimator {
    pub fn new() -> Self { Self::default() }

    pub fn state(&self) -> &OrientationState { &self.state }

    /// Stores `sample` under its source and recomputes the bearing.
    ///
    /// # Returns
    /// `Some(Bearing)` once both sources have reported and the pair is usable,
    /// `None` otherwise. `None` means "not ready yet", never an error.
    pub fn update(&mut self, sample: SensorSample) -> Option<Bearing> {
        match sample.source() {
            SensorSource::Accelerometer => self.state.gravity = Some(sample.values()),
            SensorSource::Magnetometer => self.state.geomagnetic = Some(sample.values()),
        }
        match self.try_bearing()? {
            Ok(bearing) => Some(bearing),
            Err(e) => {
                event!("Skipping {} update: {e}", sample.source());
                None
            }
        }
    }

    /// Computes the bearing from the currently held samples.
    ///
    /// # Returns
    /// `None` while a source is missing, otherwise the bearing or the reason
    /// the pair could not be resolved.
    pub fn try_bearing(&self) -> Option<Result<Bearing, OrientationError>> {
        let (gravity, geomagnetic) = (self.state.gravity?, self.state.geomagnetic?);
        Some(
            RotationMatrix::from_gravity_and_geomagnetic(gravity, geomagnetic)
                .map(|r| Bearing::from_azimuth_rad(r.orientation()[0])),
        )
    }
}

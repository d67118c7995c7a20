//! Compass heading estimation from raw accelerometer and magnetometer samples.
//! `rotation` resolves a gravity/geomagnetic pair into a rotation matrix,
//! `estimator` keeps the latest samples and applies the mount correction.

mod estimator;
mod rotation;
mod vec3d;

pub use estimator::{Bearing, OrientationEstimator, OrientationState, SensorSample, SensorSource};
pub use rotation::{OrientationError, RotationMatrix};
pub use vec3d::Vec3D;

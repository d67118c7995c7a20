use num::traits::{Num, NumCast, real::Real};
use std::ops::Mul;

/// A 3D vector generic over any numeric type.
///
/// Used for raw tri-axis sensor readings (specific force, magnetic flux density)
/// as well as for the rows of a [`RotationMatrix`](super::rotation::RotationMatrix).
///
/// # Type Parameters
/// * `T` - The functionality for the vector depends on traits implemented by `T`.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Vec3D<T> {
    /// The x-component of the vector.
    x: T,
    /// The y-component of the vector.
    y: T,
    /// The z-component of the vector.
    z: T,
}

impl<T: Copy> Vec3D<T> {
    /// Creates a new vector with the given components.
    ///
    /// # Arguments
    /// * `x` - The x-component of the vector.
    /// * `y` - The y-component of the vector.
    /// * `z` - The z-component of the vector.
    ///
    /// # Returns
    /// A new `Vec3D` object.
    pub const fn new(x: T, y: T, z: T) -> Self { Self { x, y, z } }

    /// Returns the x-component of the vector.
    pub const fn x(&self) -> T { self.x }

    /// Returns the y-component of the vector.
    pub const fn y(&self) -> T { self.y }

    /// Returns the z-component of the vector.
    pub const fn z(&self) -> T { self.z }
}

impl<T: Num + NumCast + Copy> Vec3D<T> {
    /// Computes the dot product of the current vector with another vector.
    ///
    /// ```text
    /// dot_product = (x1 * x2) + (y1 * y2) + (z1 * z2)
    /// ```
    pub fn dot(self, other: Vec3D<T>) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Computes the cross product `self × other`.
    ///
    /// # Arguments
    /// * `other` - The right-hand operand.
    ///
    /// # Returns
    /// A vector perpendicular to both operands, following the right-hand rule.
    pub fn cross(self, other: Vec3D<T>) -> Vec3D<T> {
        Vec3D::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Squared magnitude, avoiding the square root.
    pub fn abs_sq(self) -> T { self.dot(self) }
}

impl<T> Vec3D<T>
where T: Real + NumCast
{
    /// Computes the magnitude (absolute value) of the vector.
    pub fn abs(&self) -> T { (self.x.powi(2) + self.y.powi(2) + self.z.powi(2)).sqrt() }

    /// Normalizes the vector to have a magnitude of 1.
    /// If the magnitude is zero, the original vector is returned unmodified.
    pub fn normalize(self) -> Self {
        let magnitude = self.abs();
        if magnitude.is_zero() { self } else { self * (T::one() / magnitude) }
    }
}

impl<T: Num + Copy> Mul<T> for Vec3D<T> {
    type Output = Vec3D<T>;

    fn mul(self, rhs: T) -> Self::Output {
        Vec3D { x: self.x * rhs, y: self.y * rhs, z: self.z * rhs }
    }
}

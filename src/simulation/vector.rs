//! 3-D vector primitive used for every position, velocity and acceleration.
//!
//! `Vector3` is nalgebra's `Vector3<f64>`: it is `Copy`, binary operators
//! return new values, and the in-place operators (`+=`, `-=`, `*=`, `/=`)
//! touch only the receiver. nalgebra already provides
//! - vector-vector `+` / `-`, `component_mul` / `component_div`
//! - vector-scalar `v * s`, `s * v`, `v / s`, `add_scalar`
//! - `dot`
//!
//! [`VectorOps`] adds the remaining operations under the names the simulator
//! uses (length, distance, angle, reset, `sub_scalar`). A scalar-first sum
//! `s + v` is `v.add_scalar(s)`; `f64 + Vector3` cannot be implemented
//! outside nalgebra.

pub type Vector3 = nalgebra::Vector3<f64>;

/// Extra vector operations on [`Vector3`]
pub trait VectorOps {
    /// |v|^2
    fn length_squared(&self) -> f64;

    /// |v|
    fn length(&self) -> f64;

    /// |self - other|^2
    fn distance_squared(&self, other: &Vector3) -> f64;

    /// |self - other|
    fn distance(&self, other: &Vector3) -> f64;

    /// acos(u.v / (|u||v|))
    ///
    /// Undefined for a zero-length operand: the result is NaN, callers must
    /// not ask for the angle against a zero vector.
    fn angle_radians(&self, other: &Vector3) -> f64;

    /// [`VectorOps::angle_radians`] converted to degrees
    fn angle_degrees(&self, other: &Vector3) -> f64;

    /// Subtract `s` from every component
    fn sub_scalar(&self, s: f64) -> Vector3;

    /// Reset to (0, 0, 0) in place
    fn reset(&mut self);

    /// Overwrite all three components
    fn set(&mut self, x: f64, y: f64, z: f64);
}

impl VectorOps for Vector3 {
    fn length_squared(&self) -> f64 {
        self.dot(self)
    }

    fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    fn distance_squared(&self, other: &Vector3) -> f64 {
        (self - other).length_squared()
    }

    fn distance(&self, other: &Vector3) -> f64 {
        self.distance_squared(other).sqrt()
    }

    fn angle_radians(&self, other: &Vector3) -> f64 {
        // no clamping: a zero-length operand yields NaN
        (self.dot(other) / (self.length() * other.length())).acos()
    }

    fn angle_degrees(&self, other: &Vector3) -> f64 {
        self.angle_radians(other).to_degrees()
    }

    fn sub_scalar(&self, s: f64) -> Vector3 {
        self.map(|c| c - s)
    }

    fn reset(&mut self) {
        self.fill(0.0);
    }

    fn set(&mut self, x: f64, y: f64, z: f64) {
        self.x = x;
        self.y = y;
        self.z = z;
    }
}

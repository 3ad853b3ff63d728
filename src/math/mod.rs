pub mod roots;

use std::ops::{Add, Div, Mul, Sub};

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Trait for types that can be used as positions, tangent vectors and
/// polynomial coefficients of a spline.
///
/// Implemented for plain `f64` (one-dimensional curves) and for
/// [`Vector2`]/[`Vector3`].
pub trait SplineVector:
    Copy
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f64, Output = Self>
    + Div<f64, Output = Self>
{
    /// Euclidean norm.
    fn norm(&self) -> f64;
}

impl SplineVector for f64 {
    fn norm(&self) -> f64 {
        self.abs()
    }
}

impl SplineVector for Vector2 {
    fn norm(&self) -> f64 {
        self.magnitude()
    }
}

impl SplineVector for Vector3 {
    fn norm(&self) -> f64 {
        self.magnitude()
    }
}

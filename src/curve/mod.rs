mod hermite;
mod kochanek_bartels;
mod monotone;
mod shape_preserving;

pub use kochanek_bartels::Tcb;
pub use monotone::MonotoneCubicSpline;

use crate::error::{CurveError, Result};
use crate::grid::Grid;
use crate::math::SplineVector;

/// A single cubic polynomial segment in monomial form.
///
/// Coefficients refer to the normalized local parameter `t ∈ [0, 1]` of the
/// grid interval the segment covers.
#[derive(Debug, Clone, Copy)]
pub struct CubicSegment<V> {
    coefficients: [V; 4],
}

impl<V: SplineVector> CubicSegment<V> {
    /// Converts Hermite data (endpoint values and tangents) to monomial
    /// coefficients. `delta` is the width of the grid interval; the
    /// tangents are given per global parameter unit.
    ///
    /// ```text
    /// [a0]   [ 1,  0,          0,      0] [x0]
    /// [a1] = [ 0,  0,      delta,      0] [x1]
    /// [a2]   [-3,  3, -2 * delta, -delta] [v0]
    /// [a3]   [ 2, -2,      delta,  delta] [v1]
    /// ```
    pub(crate) fn from_hermite(x0: V, x1: V, v0: V, v1: V, delta: f64) -> Self {
        Self {
            coefficients: [
                x0,
                v0 * delta,
                (x1 - x0) * 3.0 - (v0 * 2.0 + v1) * delta,
                (x0 - x1) * 2.0 + (v0 + v1) * delta,
            ],
        }
    }

    /// Returns the monomial coefficients `[a0, a1, a2, a3]`.
    #[must_use]
    pub fn coefficients(&self) -> &[V; 4] {
        &self.coefficients
    }

    /// Evaluates the segment at local parameter `t ∈ [0, 1]`.
    #[must_use]
    pub fn evaluate(&self, t: f64) -> V {
        let [a0, a1, a2, a3] = self.coefficients;
        ((a3 * t + a2) * t + a1) * t + a0
    }

    /// Evaluates the derivative with respect to the local parameter.
    #[must_use]
    pub fn derivative(&self, t: f64) -> V {
        let [_, a1, a2, a3] = self.coefficients;
        (a3 * (3.0 * t) + a2 * 2.0) * t + a1
    }
}

/// A piecewise cubic curve over a knot [`Grid`].
///
/// The value type `V` selects the dimension: `f64` for one-dimensional
/// curves, [`Vector2`](crate::math::Vector2) or
/// [`Vector3`](crate::math::Vector3) for planar and spatial curves.
/// Immutable after construction; evaluation never fails and clamps the
/// query parameter to the grid's range.
#[derive(Debug, Clone)]
pub struct PiecewiseCubicCurve<V> {
    segments: Box<[CubicSegment<V>]>,
    grid: Grid,
}

impl<V: SplineVector> PiecewiseCubicCurve<V> {
    /// Creates a curve from explicit segments and a grid.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no segments or if the grid does not
    /// have exactly one knot more than there are segments.
    pub fn new(segments: impl Into<Box<[CubicSegment<V>]>>, grid: Grid) -> Result<Self> {
        let segments = segments.into();
        if segments.is_empty() {
            return Err(CurveError::NoSegments.into());
        }
        if segments.len() + 1 != grid.len() {
            return Err(CurveError::GridVsSegments {
                grid: grid.len(),
                segments: segments.len(),
            }
            .into());
        }
        Ok(Self { segments, grid })
    }

    /// Returns the knot sequence.
    #[must_use]
    pub fn grid(&self) -> &[f64] {
        self.grid.as_slice()
    }

    /// Returns the segments.
    #[must_use]
    pub fn segments(&self) -> &[CubicSegment<V>] {
        &self.segments
    }

    /// Evaluates the curve at parameter `t`.
    ///
    /// Parameters outside the grid's range are clamped to the first/last
    /// knot.
    #[must_use]
    pub fn evaluate(&self, t: f64) -> V {
        let (t, index, _) = self.local_parameter(t);
        self.segments[index].evaluate(t)
    }

    /// Evaluates the first derivative (velocity) at parameter `t`.
    ///
    /// At an interior knot this is the outgoing tangent of the segment
    /// starting there.
    #[must_use]
    pub fn velocity(&self, t: f64) -> V {
        let (t, index, delta) = self.local_parameter(t);
        self.segments[index].derivative(t) / delta
    }

    /// Evaluates the curve at every parameter in `times`.
    ///
    /// Equivalent to calling [`evaluate`](Self::evaluate) element-wise.
    #[must_use]
    pub fn evaluate_many(&self, times: &[f64]) -> Vec<V> {
        times.iter().map(|&t| self.evaluate(t)).collect()
    }

    fn local_parameter(&self, t: f64) -> (f64, usize, f64) {
        let (t, index) = self.grid.locate(t);
        let t0 = self.grid.as_slice()[index];
        let t1 = self.grid.as_slice()[index + 1];
        ((t - t0) / (t1 - t0), index, t1 - t0)
    }
}

use crate::error::{MonotoneError, Result};
use crate::math::roots::newton_bisect;

use super::PiecewiseCubicCurve;

/// Parameter tolerance for the per-segment cubic inversion.
const INVERSION_XTOL: f64 = 1e-12;
const INVERSION_MAX_ITER: usize = 100;

/// A one-dimensional cubic spline that is globally monotone
/// (non-decreasing or non-increasing) and therefore invertible.
///
/// The underlying shape-preserving curve is exposed for direct
/// parameter-to-value evaluation; [`get_time`](Self::get_time) performs the
/// inverse value-to-parameter lookup.
#[derive(Debug, Clone)]
pub struct MonotoneCubicSpline {
    curve: PiecewiseCubicCurve<f64>,
    values: Box<[f64]>,
    increasing: bool,
}

enum Inversion {
    Below,
    Above,
    Unique(f64),
    Plateau { first: f64 },
}

impl MonotoneCubicSpline {
    /// Creates a monotone cubic spline through the given values.
    ///
    /// Passing `None` for `grid` uses unit-spaced knots starting at zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the values are not monotone, plus all
    /// conditions of
    /// [`new_shape_preserving`](PiecewiseCubicCurve::new_shape_preserving).
    pub fn new(values: &[f64], grid: Option<&[f64]>) -> Result<Self> {
        let slopes = vec![None; values.len()];
        Self::with_slopes(values, &slopes, grid)
    }

    /// Creates a monotone cubic spline with caller-supplied slopes.
    ///
    /// # Errors
    ///
    /// Returns an error if the values are not monotone, plus all
    /// conditions of
    /// [`new_shape_preserving_with_slopes`](PiecewiseCubicCurve::new_shape_preserving_with_slopes)
    /// (slope validation rejects slopes that would break monotonicity).
    pub fn with_slopes(
        values: &[f64],
        optional_slopes: &[Option<f64>],
        grid: Option<&[f64]>,
    ) -> Result<Self> {
        let non_decreasing = !values.windows(2).any(|w| w[0] > w[1]);
        let non_increasing = !values.windows(2).any(|w| w[0] < w[1]);
        if !non_decreasing && !non_increasing {
            return Err(MonotoneError::NotMonotone.into());
        }
        let curve = PiecewiseCubicCurve::new_shape_preserving_with_slopes(
            values,
            optional_slopes,
            grid,
            false,
        )?;
        Ok(Self {
            curve,
            values: values.into(),
            increasing: non_decreasing,
        })
    }

    /// Returns the underlying curve for parameter-to-value evaluation.
    #[must_use]
    pub fn curve(&self) -> &PiecewiseCubicCurve<f64> {
        &self.curve
    }

    /// Consumes the spline, returning the underlying curve.
    #[must_use]
    pub fn into_curve(self) -> PiecewiseCubicCurve<f64> {
        self.curve
    }

    /// Returns the parameter at which the spline attains `value`.
    ///
    /// The containing segment is found by binary search over the knot
    /// values; within the segment the cubic is solved by Newton's method
    /// seeded with linear interpolation and safeguarded by bisection.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` lies outside the spline's value range
    /// or is attained on a plateau (repeated knot value), where the
    /// parameter would be ambiguous.
    pub fn get_time(&self, value: f64) -> Result<f64> {
        match self.invert(value) {
            Inversion::Unique(parameter) => Ok(parameter),
            Inversion::Plateau { .. } => Err(MonotoneError::AmbiguousValue { value }.into()),
            Inversion::Below | Inversion::Above => {
                let (min, max) = self.value_range();
                Err(MonotoneError::ValueOutOfRange { value, min, max }.into())
            }
        }
    }

    /// Returns the parameter for every value in `values`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`get_time`](Self::get_time), for any element.
    pub fn get_time_many(&self, values: &[f64]) -> Result<Vec<f64>> {
        values.iter().map(|&value| self.get_time(value)).collect()
    }

    /// Like [`get_time`](Self::get_time), but total: out-of-range values
    /// are clamped to the first/last knot and a plateau resolves to its
    /// first parameter.
    pub(crate) fn get_time_clamped(&self, value: f64) -> f64 {
        let knots = self.curve.grid();
        match self.invert(value) {
            Inversion::Unique(parameter) => parameter,
            Inversion::Plateau { first } => first,
            Inversion::Below => knots[0],
            Inversion::Above => knots[knots.len() - 1],
        }
    }

    fn value_range(&self) -> (f64, f64) {
        let first = self.values[0];
        let last = self.values[self.values.len() - 1];
        if self.increasing {
            (first, last)
        } else {
            (last, first)
        }
    }

    fn invert(&self, value: f64) -> Inversion {
        let (min, max) = self.value_range();
        if value.is_nan() || value < min {
            return Inversion::Below;
        }
        if value > max {
            return Inversion::Above;
        }
        let values = &self.values;
        let knots = self.curve.grid();
        // Indices of the knot values equal to `value` (empty range if the
        // value falls strictly inside a segment).
        let (start, end) = if self.increasing {
            (
                values.partition_point(|&v| v < value),
                values.partition_point(|&v| v <= value),
            )
        } else {
            (
                values.partition_point(|&v| v > value),
                values.partition_point(|&v| v >= value),
            )
        };
        match end - start {
            1 => Inversion::Unique(knots[start]),
            0 => {
                // `value` is strictly between values[start - 1] and
                // values[start]; it cannot match the first or last knot, so
                // 1 <= start <= len - 1.
                let index = start - 1;
                Inversion::Unique(self.solve_segment(index, value))
            }
            _ => Inversion::Plateau {
                first: knots[start],
            },
        }
    }

    /// Solves `segment(t) == value` for the segment's local parameter and
    /// maps it back to the global parameter.
    fn solve_segment(&self, index: usize, value: f64) -> f64 {
        let [a0, a1, a2, a3] = *self.curve.segments()[index].coefficients();
        let f = |t: f64| ((a3 * t + a2) * t + a1) * t + a0 - value;
        let df = |t: f64| (3.0 * a3 * t + 2.0 * a2) * t + a1;
        let lower = self.values[index];
        let upper = self.values[index + 1];
        let seed = (value - lower) / (upper - lower);
        let local = newton_bisect(f, df, 0.0, 1.0, seed, INVERSION_XTOL, INVERSION_MAX_ITER);
        let t0 = self.curve.grid()[index];
        let t1 = self.curve.grid()[index + 1];
        t0 + local * (t1 - t0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::SplineError;
    use approx::assert_relative_eq;

    #[test]
    fn linear_inversion() {
        let spline = MonotoneCubicSpline::new(&[1.0, 2.0], Some(&[3.0, 4.0])).unwrap();
        assert_eq!(spline.get_time(1.0).unwrap(), 3.0);
        assert_eq!(spline.get_time(1.5).unwrap(), 3.5);
        assert_eq!(spline.get_time(2.0).unwrap(), 4.0);
    }

    #[test]
    fn out_of_range_is_an_error() {
        let spline = MonotoneCubicSpline::new(&[1.0, 2.0], Some(&[3.0, 4.0])).unwrap();
        assert!(matches!(
            spline.get_time(0.5).unwrap_err(),
            SplineError::Monotone(MonotoneError::ValueOutOfRange { min, max, .. })
                if min == 1.0 && max == 2.0
        ));
        assert!(spline.get_time(2.5).is_err());
    }

    #[test]
    fn plateau_is_ambiguous() {
        let spline =
            MonotoneCubicSpline::new(&[1.0, 2.0, 2.0, 3.0], Some(&[4.0, 5.0, 6.0, 7.0])).unwrap();
        assert!(matches!(
            spline.get_time(2.0).unwrap_err(),
            SplineError::Monotone(MonotoneError::AmbiguousValue { value }) if value == 2.0
        ));
        // Values off the plateau still invert.
        assert_eq!(spline.get_time(1.0).unwrap(), 4.0);
        assert_eq!(spline.get_time(3.0).unwrap(), 7.0);
    }

    #[test]
    fn not_monotone() {
        let result = MonotoneCubicSpline::new(&[0.0, 2.0, 1.0], None);
        assert!(matches!(
            result.unwrap_err(),
            SplineError::Monotone(MonotoneError::NotMonotone)
        ));
    }

    #[test]
    fn round_trip() {
        let spline =
            MonotoneCubicSpline::new(&[0.0, 1.0, 4.0, 5.0, 9.0], None).unwrap();
        let grid = spline.curve().grid();
        let (first, last) = (grid[0], grid[grid.len() - 1]);
        for i in 0..=100 {
            let t = first + (last - first) * f64::from(i) / 100.0;
            let value = spline.curve().evaluate(t);
            let recovered = spline.get_time(value).unwrap();
            assert_relative_eq!(recovered, t, epsilon = 1e-8);
        }
    }

    #[test]
    fn decreasing_round_trip() {
        let values = [9.0, 5.0, 4.0, 1.0, 0.0];
        let spline = MonotoneCubicSpline::new(&values, None).unwrap();
        for (i, &value) in values.iter().enumerate() {
            assert_relative_eq!(spline.get_time(value).unwrap(), i as f64);
        }
        let t = spline.get_time(7.0).unwrap();
        assert_relative_eq!(spline.curve().evaluate(t), 7.0, epsilon = 1e-9);
    }

    #[test]
    fn batch_equals_elementwise() {
        let spline = MonotoneCubicSpline::new(&[0.0, 1.0, 4.0], None).unwrap();
        let queries = [0.0, 0.5, 1.0, 2.0, 4.0];
        let batch = spline.get_time_many(&queries).unwrap();
        for (&value, &parameter) in queries.iter().zip(&batch) {
            assert_eq!(spline.get_time(value).unwrap(), parameter);
        }
    }

    #[test]
    fn clamped_lookup() {
        let spline = MonotoneCubicSpline::new(&[1.0, 2.0], Some(&[3.0, 4.0])).unwrap();
        assert_eq!(spline.get_time_clamped(0.0), 3.0);
        assert_eq!(spline.get_time_clamped(9.0), 4.0);
        assert_eq!(spline.get_time_clamped(1.5), 3.5);
    }
}

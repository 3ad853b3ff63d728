use crate::error::{Result, ShapeError};
use crate::grid::Grid;

use super::PiecewiseCubicCurve;

impl PiecewiseCubicCurve<f64> {
    /// Creates a one-dimensional shape-preserving cubic spline.
    ///
    /// Interior tangents are derived from the adjacent secants and clamped
    /// so that the curve introduces no extrema beyond those present in the
    /// data (Dougherty et al. 1989, eq. 4.2). Passing `None` for `grid`
    /// uses unit-spaced knots starting at zero.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than two values, if the grid
    /// length does not match the number of values (open) or one more
    /// (closed), or if the grid contains NaN or is not strictly ascending.
    pub fn new_shape_preserving(
        values: &[f64],
        grid: Option<&[f64]>,
        closed: bool,
    ) -> Result<Self> {
        let slopes = vec![None; values.len()];
        Self::new_shape_preserving_with_slopes(values, &slopes, grid, closed)
    }

    /// Creates a shape-preserving cubic spline with caller-supplied slopes.
    ///
    /// Every `Some` slope is validated against the two adjacent secants at
    /// its knot; `None` slopes are derived as in
    /// [`new_shape_preserving`](Self::new_shape_preserving).
    ///
    /// # Errors
    ///
    /// In addition to the conditions of
    /// [`new_shape_preserving`](Self::new_shape_preserving): slope count
    /// mismatch, a slope steeper than three times the smaller adjacent
    /// secant, or a slope whose sign disagrees with the adjacent secants.
    /// The latter two name the offending knot index.
    pub fn new_shape_preserving_with_slopes(
        values: &[f64],
        optional_slopes: &[Option<f64>],
        grid: Option<&[f64]>,
        closed: bool,
    ) -> Result<Self> {
        if values.len() < 2 {
            return Err(ShapeError::TooFewValues.into());
        }
        if optional_slopes.len() != values.len() {
            return Err(ShapeError::SlopesVsValues {
                slopes: optional_slopes.len(),
                values: values.len(),
            }
            .into());
        }
        let expected_grid = values.len() + usize::from(closed);
        #[allow(clippy::cast_precision_loss)]
        let mut grid: Vec<f64> = match grid {
            Some(knots) => {
                if knots.len() != expected_grid {
                    return Err(ShapeError::GridVsValues {
                        grid: knots.len(),
                        values: values.len(),
                        closed,
                    }
                    .into());
                }
                knots.to_vec()
            }
            None => (0..expected_grid).map(|i| i as f64).collect(),
        };
        Grid::check(&grid)?;

        let mut values = values.to_vec();
        if closed {
            // Close the loop, plus one temporary value to compute the
            // wrap vertex's slope.
            values.push(values[0]);
            values.push(values[1]);
            grid.push(grid[grid.len() - 1] + grid[1] - grid[0]);
        }

        let mut slopes = Vec::new();
        for i in 0..values.len() - 2 {
            let x_1 = values[i];
            let x0 = values[i + 1];
            let x1 = values[i + 2];
            let t_1 = grid[i];
            let t0 = grid[i + 1];
            let t1 = grid[i + 2];
            let left = (x0 - x_1) / (t0 - t_1);
            let right = (x1 - x0) / (t1 - t0);
            let index = (i + 1) % optional_slopes.len();
            let slope = match optional_slopes[index] {
                Some(slope) => verify_slope(slope, left, right, index)?,
                None => fix_slope((left + right) / 2.0, left, right),
            };
            slopes.push(slope); // incoming
            slopes.push(slope); // outgoing
        }

        if closed {
            // The wrap vertex's outgoing slope belongs to the first segment.
            slopes.rotate_right(1);
            values.pop();
            grid.pop();
        } else if optional_slopes.len() == 2 {
            let chord = (values[1] - values[0]) / (grid[1] - grid[0]);
            let first = match optional_slopes[0] {
                Some(slope) => Some(verify_slope(slope, chord, chord, 0)?),
                None => None,
            };
            let second = match optional_slopes[1] {
                Some(slope) => Some(verify_slope(slope, chord, chord, 1)?),
                None => None,
            };
            slopes.push(end_condition(first, second, chord));
            slopes.push(end_condition(second, first, chord));
        } else {
            let start_chord = (values[1] - values[0]) / (grid[1] - grid[0]);
            let start = match optional_slopes[0] {
                Some(slope) => Some(verify_slope(slope, start_chord, start_chord, 0)?),
                None => None,
            };
            slopes.insert(0, end_condition(start, slopes.first().copied(), start_chord));

            let last = values.len() - 1;
            let end_chord = (values[last] - values[last - 1]) / (grid[last] - grid[last - 1]);
            let end = match optional_slopes[last] {
                Some(slope) => Some(verify_slope(slope, end_chord, end_chord, last)?),
                None => None,
            };
            slopes.push(end_condition(end, slopes.last().copied(), end_chord));
        }

        Self::new_hermite(&values, &slopes, &grid)
    }
}

/// End slope of an open curve: a verified caller-supplied slope wins,
/// otherwise the slope is derived from the neighboring (inner) slope,
/// falling back to the chord.
fn end_condition(own: Option<f64>, inner: Option<f64>, chord: f64) -> f64 {
    own.unwrap_or_else(|| inner.map_or(chord, |inner| end_slope(inner, chord)))
}

/// Chooses an end slope that minimizes the change in slope within the
/// first/last segment, given the slope at the inner end of that segment.
fn end_slope(inner_slope: f64, chord_slope: f64) -> f64 {
    if chord_slope < 0.0 {
        return -end_slope(-inner_slope, -chord_slope);
    }
    if inner_slope <= chord_slope {
        3.0 * chord_slope - 2.0 * inner_slope
    } else {
        (3.0 * chord_slope - inner_slope) / 2.0
    }
}

/// Clamps a slope so the curve preserves the shape of the data.
/// See Dougherty et al. (1989), eq. (4.2).
fn fix_slope(slope: f64, left: f64, right: f64) -> f64 {
    if left * right <= 0.0 {
        0.0
    } else if right > 0.0 {
        slope.clamp(0.0, 3.0 * left.abs().min(right.abs()))
    } else {
        slope.clamp(-3.0 * left.abs().min(right.abs()), 0.0)
    }
}

#[allow(clippy::float_cmp)]
fn verify_slope(
    slope: f64,
    left: f64,
    right: f64,
    index: usize,
) -> std::result::Result<f64, ShapeError> {
    let fixed = fix_slope(slope, left, right);
    if fixed == slope {
        Ok(slope)
    } else if left * right < 0.0 {
        Err(ShapeError::SlopeTooSteep {
            index,
            slope,
            maximum: 0.0,
        })
    } else if left * slope < 0.0 {
        Err(ShapeError::SlopeWrongSign { index, slope })
    } else {
        Err(ShapeError::SlopeTooSteep {
            index,
            slope,
            maximum: fixed,
        })
    }
}

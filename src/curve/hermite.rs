use crate::error::{CurveError, Result};
use crate::grid::Grid;
use crate::math::SplineVector;

use super::{CubicSegment, PiecewiseCubicCurve};

impl<V: SplineVector> PiecewiseCubicCurve<V> {
    /// Creates a piecewise cubic Hermite curve.
    ///
    /// `tangents` holds the outgoing and incoming tangent of every segment,
    /// i.e. exactly two tangents per segment. Adjacent segments may
    /// therefore meet with different tangents.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than two positions, if the
    /// tangent count does not equal twice the segment count, if the grid
    /// length does not match the number of positions, or if the grid is
    /// invalid (NaN or not strictly ascending).
    pub fn new_hermite(positions: &[V], tangents: &[V], grid: &[f64]) -> Result<Self> {
        if positions.len() < 2 {
            return Err(CurveError::TooFewPositions.into());
        }
        let segments_len = positions.len() - 1;
        if tangents.len() != 2 * segments_len {
            return Err(CurveError::TangentsVsSegments {
                tangents: tangents.len(),
                segments: segments_len,
            }
            .into());
        }
        if grid.len() != positions.len() {
            return Err(CurveError::GridVsPositions {
                grid: grid.len(),
                positions: positions.len(),
            }
            .into());
        }
        let grid = Grid::new(grid)?;
        let knots = grid.as_slice();
        let mut segments = Vec::with_capacity(segments_len);
        for i in 0..segments_len {
            segments.push(CubicSegment::from_hermite(
                positions[i],
                positions[i + 1],
                tangents[2 * i],
                tangents[2 * i + 1],
                knots[i + 1] - knots[i],
            ));
        }
        Self::new(segments, grid)
    }
}

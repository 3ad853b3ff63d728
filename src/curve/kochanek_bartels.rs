use crate::error::{KochanekBartelsError, Result};
use crate::grid::Grid;
use crate::math::SplineVector;

use super::PiecewiseCubicCurve;

/// Tension/continuity/bias shape parameters of one Kochanek-Bartels vertex.
///
/// All three default to zero, which reproduces a Catmull-Rom tangent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tcb {
    /// Sharpness of the curve at the vertex (`1` collapses the tangent).
    pub tension: f64,
    /// Symmetry between incoming and outgoing tangent.
    pub continuity: f64,
    /// Skew towards the previous (`> 0`) or next (`< 0`) chord.
    pub bias: f64,
}

impl Tcb {
    /// Creates a TCB triple.
    #[must_use]
    pub fn new(tension: f64, continuity: f64, bias: f64) -> Self {
        Self {
            tension,
            continuity,
            bias,
        }
    }
}

impl<V: SplineVector> PiecewiseCubicCurve<V> {
    /// Creates a Kochanek-Bartels curve with a grid derived from
    /// centripetal parameterization (chord lengths raised to the power
    /// `0.5`, accumulated from zero).
    ///
    /// Open curves need one TCB triple per interior vertex
    /// (`positions.len() - 2`); the free ends are unshaped. Closed curves
    /// wrap around and need one triple per vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than two positions, if the TCB
    /// count does not match the open/closed rule, or if two consecutive
    /// positions coincide (centripetal parameterization breaks down).
    pub fn new_centripetal_kochanek_bartels(
        positions: &[V],
        tcb: &[Tcb],
        closed: bool,
    ) -> Result<Self> {
        kochanek_bartels(positions, tcb, None, closed)
    }

    /// Creates a Kochanek-Bartels curve over an explicit grid.
    ///
    /// The grid must have one knot per position for open curves, plus one
    /// loop-closing knot for closed curves.
    ///
    /// # Errors
    ///
    /// Same conditions as
    /// [`new_centripetal_kochanek_bartels`](Self::new_centripetal_kochanek_bartels),
    /// plus grid length mismatch and invalid grids (NaN, not strictly
    /// ascending).
    pub fn new_kochanek_bartels(
        positions: &[V],
        tcb: &[Tcb],
        grid: &[f64],
        closed: bool,
    ) -> Result<Self> {
        kochanek_bartels(positions, tcb, Some(grid), closed)
    }
}

fn kochanek_bartels<V: SplineVector>(
    positions: &[V],
    tcb: &[Tcb],
    explicit_grid: Option<&[f64]>,
    closed: bool,
) -> Result<PiecewiseCubicCurve<V>> {
    let n = positions.len();
    if n < 2 {
        return Err(KochanekBartelsError::TooFewPositions.into());
    }
    let expected_tcb = if closed { n } else { n - 2 };
    if tcb.len() != expected_tcb {
        return Err(KochanekBartelsError::TcbVsPositions {
            tcb: tcb.len(),
            positions: n,
            closed,
        }
        .into());
    }

    // Closed curves are handled by wrapping the first two vertices around,
    // which makes every vertex interior; the temporary tail is removed
    // again below.
    let mut positions = positions.to_vec();
    if closed {
        positions.push(positions[0]);
        positions.push(positions[1]);
    }

    let mut grid = match explicit_grid {
        Some(knots) => {
            if knots.len() != n + usize::from(closed) {
                return Err(KochanekBartelsError::GridVsPositions {
                    grid: knots.len(),
                    positions: n,
                    closed,
                }
                .into());
            }
            Grid::check(knots)?;
            let mut grid = knots.to_vec();
            if closed {
                // Temporary knot for the wrap interval up to vertex 1.
                grid.push(grid[grid.len() - 1] + (knots[1] - knots[0]));
            }
            grid
        }
        None => centripetal_grid(&positions)?,
    };

    let mut tangents = Vec::new();
    for i in 0..positions.len() - 2 {
        let x_1 = positions[i];
        let x0 = positions[i + 1];
        let x1 = positions[i + 2];
        let t_1 = grid[i];
        let t0 = grid[i + 1];
        let t1 = grid[i + 2];
        let Tcb {
            tension,
            continuity,
            bias,
        } = tcb[(i + usize::from(closed)) % tcb.len()];
        let a = (1.0 - tension) * (1.0 + continuity) * (1.0 + bias);
        let b = (1.0 - tension) * (1.0 - continuity) * (1.0 - bias);
        let c = (1.0 - tension) * (1.0 - continuity) * (1.0 + bias);
        let d = (1.0 - tension) * (1.0 + continuity) * (1.0 - bias);

        // Grid-interval weighting keeps the speed continuous across
        // unequal knot spacing.
        let denominator = (t1 - t0) * (t0 - t_1) * (t1 - t_1);
        let incoming = ((x0 - x_1) * (c * (t1 - t0).powi(2))
            + (x1 - x0) * (d * (t0 - t_1).powi(2)))
            / denominator;
        let outgoing = ((x0 - x_1) * (a * (t1 - t0).powi(2))
            + (x1 - x0) * (b * (t0 - t_1).powi(2)))
            / denominator;
        tangents.push(incoming);
        tangents.push(outgoing);
    }

    if closed {
        // The wrap vertex's outgoing tangent belongs to the first segment.
        tangents.rotate_right(1);
        positions.pop();
        grid.pop();
    } else if n == 2 {
        // Straight line.
        let tangent = (positions[1] - positions[0]) / (grid[1] - grid[0]);
        tangents.push(tangent);
        tangents.push(tangent);
    } else {
        // One-sided chord estimates at the free ends (Catmull-Rom-like,
        // zero tension/continuity/bias).
        let start = (positions[1] - positions[0]) / (grid[1] - grid[0]);
        let end = (positions[n - 1] - positions[n - 2]) / (grid[n - 1] - grid[n - 2]);
        tangents.insert(0, start);
        tangents.push(end);
    }

    PiecewiseCubicCurve::new_hermite(&positions, &tangents, &grid)
}

fn centripetal_grid<V: SplineVector>(positions: &[V]) -> Result<Vec<f64>> {
    let mut grid = Vec::with_capacity(positions.len());
    grid.push(0.0);
    for (i, pair) in positions.windows(2).enumerate() {
        let delta = (pair[1] - pair[0]).norm().sqrt();
        if delta == 0.0 {
            return Err(KochanekBartelsError::RepeatedPosition { index: i + 1 }.into());
        }
        let last = grid[grid.len() - 1];
        grid.push(last + delta);
    }
    Ok(grid)
}

use crate::error::GridError;

/// An ordered sequence of strictly ascending knot values delimiting the
/// segments of a piecewise curve.
///
/// A grid is immutable once constructed; a curve over `n` segments owns a
/// grid of `n + 1` knots.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid(Box<[f64]>);

impl Grid {
    /// Creates a grid from the given knot values.
    ///
    /// # Errors
    ///
    /// Returns an error if any knot is NaN or if the knots are not strictly
    /// ascending, naming the offending index.
    pub fn new(knots: impl Into<Box<[f64]>>) -> Result<Self, GridError> {
        let knots = knots.into();
        Self::check(&knots)?;
        Ok(Self(knots))
    }

    /// Validates a candidate knot sequence without building a grid.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Grid::new`].
    pub fn check(knots: &[f64]) -> Result<(), GridError> {
        if let Some(index) = knots.iter().copied().position(f64::is_nan) {
            return Err(GridError::Nan { index });
        }
        if let Some(index) = knots.windows(2).position(|w| w[0] >= w[1]) {
            return Err(GridError::NotAscending { index: index + 1 });
        }
        Ok(())
    }

    /// Returns the knots as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Returns the number of knots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the grid has no knots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Clamps `t` into the grid's range and returns it together with the
    /// index of the segment containing it.
    ///
    /// The last knot belongs to the last segment. Requires at least two
    /// knots (guaranteed for any grid owned by a curve).
    #[must_use]
    pub fn locate(&self, t: f64) -> (f64, usize) {
        let knots = &self.0;
        let first = knots[0];
        let last = knots[knots.len() - 1];
        let t = t.clamp(first, last);
        let index = knots.partition_point(|&knot| knot <= t).min(knots.len() - 1) - 1;
        (t, index)
    }
}

use crate::curve::{MonotoneCubicSpline, PiecewiseCubicCurve, Tcb};
use crate::error::{Result, ShapeError, SplineError, TrajectoryError};
use crate::math::SplineVector;

/// One control vertex of a [`TrajectorySpline`].
///
/// Only the position is mandatory. A time pins the vertex to an instant, a
/// speed prescribes the magnitude of the velocity there (and requires a
/// time), and the shape parameters control the Kochanek-Bartels tangent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint<V> {
    /// Position of the vertex.
    pub position: V,
    /// Time at which the curve passes through the position, if pinned.
    pub time: Option<f64>,
    /// Target magnitude of `d position / d time` at the vertex.
    pub speed: Option<f64>,
    /// Tension/continuity/bias shape parameters.
    pub shape: Tcb,
}

impl<V> Waypoint<V> {
    /// Creates a waypoint with no time, no speed and default shape.
    #[must_use]
    pub fn new(position: V) -> Self {
        Self {
            position,
            time: None,
            speed: None,
            shape: Tcb::default(),
        }
    }
}

/// A spline through positions that is evaluated by *time*.
///
/// The positions are interpolated by a centripetal Kochanek-Bartels curve
/// over an internal parameter `u`; a monotone cubic time map `u → time`
/// fitted to the pinned times and speeds supplies the reparameterization.
/// Waypoints without a time get one assigned by the time map.
#[derive(Debug, Clone)]
pub struct TrajectorySpline<V> {
    path: PiecewiseCubicCurve<V>,
    time_map: MonotoneCubicSpline,
    grid: Box<[f64]>,
}

impl<V: SplineVector> TrajectorySpline<V> {
    /// Creates an open trajectory.
    ///
    /// The first and last waypoint must carry a time and must have default
    /// shape parameters (free ends are unshaped).
    ///
    /// # Errors
    ///
    /// Returns an error for fewer than two waypoints, repeated positions,
    /// shaped or un-timed endpoints, a speed on a waypoint without a time,
    /// non-positive or unsatisfiable speeds, and NaN or non-ascending
    /// times.
    pub fn open(waypoints: &[Waypoint<V>]) -> Result<Self> {
        Self::build(waypoints, None)
    }

    /// Creates a closed trajectory that returns to the first waypoint at
    /// `end_time`.
    ///
    /// All waypoints may carry shape parameters (consumed cyclically); the
    /// loop is closed without duplicating the first position.
    ///
    /// # Errors
    ///
    /// Same conditions as [`open`](Self::open), except that endpoints may
    /// be shaped and the closing time is given explicitly.
    pub fn closed(waypoints: &[Waypoint<V>], end_time: f64) -> Result<Self> {
        Self::build(waypoints, Some(end_time))
    }

    fn build(waypoints: &[Waypoint<V>], end_time: Option<f64>) -> Result<Self> {
        let closed = end_time.is_some();
        let n = waypoints.len();
        if n < 2 {
            return Err(crate::error::KochanekBartelsError::TooFewPositions.into());
        }

        let tcb: Vec<Tcb> = if closed {
            waypoints.iter().map(|w| w.shape).collect()
        } else {
            for index in [0, n - 1] {
                if waypoints[index].shape != Tcb::default() {
                    return Err(TrajectoryError::ShapedEndpoint { index }.into());
                }
            }
            waypoints[1..n - 1].iter().map(|w| w.shape).collect()
        };
        let positions: Vec<V> = waypoints.iter().map(|w| w.position).collect();
        let path = PiecewiseCubicCurve::new_centripetal_kochanek_bartels(&positions, &tcb, closed)?;
        let u = path.grid().to_vec();

        let mut times: Vec<Option<f64>> = waypoints.iter().map(|w| w.time).collect();
        let mut speeds: Vec<Option<f64>> = waypoints.iter().map(|w| w.speed).collect();
        if let Some(end_time) = end_time {
            times.push(Some(end_time));
            // The wrap vertex shares the first waypoint's speed.
            speeds.push(speeds[0]);
        }
        debug_assert_eq!(times.len(), u.len());

        if times[0].is_none() {
            return Err(TrajectoryError::FirstTimeMissing.into());
        }
        if times[times.len() - 1].is_none() {
            return Err(TrajectoryError::LastTimeMissing.into());
        }
        for (index, (&time, &speed)) in times.iter().zip(&speeds).enumerate() {
            if let Some(speed) = speed {
                if time.is_none() {
                    return Err(TrajectoryError::SpeedWithoutTime { index: index % n }.into());
                }
                if !speed.is_finite() || speed <= 0.0 {
                    return Err(TrajectoryError::NonPositiveSpeed {
                        index: index % n,
                        speed,
                    }
                    .into());
                }
            }
        }

        // The time map is anchored at the vertices with pinned times; a
        // pinned speed becomes the slope dt/du = |dp/du| / speed there.
        let mut anchor_index = Vec::new();
        let mut anchor_u = Vec::new();
        let mut anchor_time = Vec::new();
        let mut anchor_slope = Vec::new();
        for (index, (&time, &speed)) in times.iter().zip(&speeds).enumerate() {
            let Some(time) = time else { continue };
            if time.is_nan() {
                return Err(TrajectoryError::TimeNan { index: index % n }.into());
            }
            if let Some(&previous) = anchor_time.last() {
                if time <= previous {
                    return Err(TrajectoryError::TimesNotAscending { index: index % n }.into());
                }
            }
            anchor_index.push(index);
            anchor_u.push(u[index]);
            anchor_time.push(time);
            anchor_slope.push(speed.map(|speed| path.velocity(u[index]).norm() / speed));
        }

        let time_map = MonotoneCubicSpline::with_slopes(&anchor_time, &anchor_slope, Some(&anchor_u))
            .map_err(|error| match error {
                SplineError::Shape(
                    ShapeError::SlopeTooSteep { index, .. }
                    | ShapeError::SlopeWrongSign { index, .. },
                ) => {
                    let waypoint = anchor_index[index];
                    TrajectoryError::IncompatibleSpeed {
                        index: waypoint % n,
                        speed: speeds[waypoint].unwrap_or(f64::NAN),
                    }
                    .into()
                }
                other => other,
            })?;

        // Waypoints without a time get the time the map assigns to their
        // position on the curve.
        let mut grid = Vec::with_capacity(u.len());
        for (index, &time) in times.iter().enumerate() {
            match time {
                Some(time) => grid.push(time),
                None => grid.push(time_map.curve().evaluate(u[index])),
            }
        }
        if let Some(index) = grid.windows(2).position(|w| w[0] >= w[1]) {
            return Err(TrajectoryError::TimesNotAscending {
                index: (index + 1) % n,
            }
            .into());
        }

        Ok(Self {
            path,
            time_map,
            grid: grid.into(),
        })
    }

    /// Evaluates the trajectory at time `t`.
    ///
    /// Times outside the trajectory's range are clamped to its start/end.
    #[must_use]
    pub fn evaluate(&self, t: f64) -> V {
        let t = t.clamp(self.grid[0], self.grid[self.grid.len() - 1]);
        self.path.evaluate(self.time_map.get_time_clamped(t))
    }

    /// Evaluates the trajectory at every time in `times`.
    ///
    /// Equivalent to calling [`evaluate`](Self::evaluate) element-wise.
    #[must_use]
    pub fn evaluate_many(&self, times: &[f64]) -> Vec<V> {
        times.iter().map(|&t| self.evaluate(t)).collect()
    }

    /// Returns the resolved time of every waypoint (plus the loop-closing
    /// time for closed trajectories).
    #[must_use]
    pub fn grid(&self) -> &[f64] {
        &self.grid
    }

    /// Returns the position curve over the internal parameter `u`.
    #[must_use]
    pub fn position_curve(&self) -> &PiecewiseCubicCurve<V> {
        &self.path
    }

    /// Returns the monotone time map `u → time`.
    #[must_use]
    pub fn time_map(&self) -> &MonotoneCubicSpline {
        &self.time_map
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::SplineError;
    use crate::math::Vector3;
    use approx::assert_relative_eq;

    fn timed(position: f64, time: f64) -> Waypoint<f64> {
        Waypoint {
            time: Some(time),
            ..Waypoint::new(position)
        }
    }

    #[test]
    fn linear_in_time() {
        let spline = TrajectorySpline::open(&[timed(1.0, 0.0), timed(2.0, 3.0)]).unwrap();
        assert_relative_eq!(spline.evaluate(1.5), 1.5, epsilon = 1e-9);
        assert_eq!(spline.grid(), &[0.0, 3.0]);
    }

    #[test]
    fn clamps_outside_time_range() {
        let spline = TrajectorySpline::open(&[timed(1.0, 0.0), timed(2.0, 3.0)]).unwrap();
        assert_eq!(spline.evaluate(-1.0), 1.0);
        assert_eq!(spline.evaluate(4.0), 2.0);
    }

    #[test]
    fn interpolates_positions_at_resolved_times() {
        let waypoints = [
            Waypoint {
                time: Some(0.0),
                ..Waypoint::new(Vector3::new(0.0, 0.0, 0.0))
            },
            Waypoint::new(Vector3::new(1.0, 2.0, 0.0)),
            Waypoint::new(Vector3::new(3.0, 1.0, 1.0)),
            Waypoint {
                time: Some(10.0),
                ..Waypoint::new(Vector3::new(4.0, 0.0, 0.0))
            },
        ];
        let spline = TrajectorySpline::open(&waypoints).unwrap();
        let grid = spline.grid().to_vec();
        assert_eq!(grid.len(), waypoints.len());
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[3], 10.0);
        assert!(grid.windows(2).all(|w| w[0] < w[1]));
        for (&t, waypoint) in grid.iter().zip(&waypoints) {
            assert_relative_eq!(spline.evaluate(t), waypoint.position, epsilon = 1e-6);
        }
    }

    #[test]
    fn closed_trajectory_returns_to_start() {
        let waypoints = [
            Waypoint::<f64> {
                time: Some(0.0),
                ..Waypoint::new(1.0)
            },
            Waypoint::new(2.0),
        ];
        let spline = TrajectorySpline::closed(&waypoints, 3.0).unwrap();
        assert_eq!(spline.grid().len(), 3);
        assert_relative_eq!(spline.evaluate(0.0), 1.0, epsilon = 1e-9);
        assert_relative_eq!(spline.evaluate(1.5), 2.0, epsilon = 1e-9);
        assert_relative_eq!(spline.evaluate(3.0), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn speed_pins_the_velocity_magnitude() {
        let waypoints = [
            Waypoint {
                time: Some(0.0),
                speed: Some(0.25),
                ..Waypoint::new(0.0)
            },
            timed(1.0, 2.0),
        ];
        let spline = TrajectorySpline::open(&waypoints).unwrap();
        // |dp/dt| at t = 0 should match the requested speed.
        let h = 1e-6;
        let velocity = (spline.evaluate(h) - spline.evaluate(0.0)) / h;
        assert_relative_eq!(velocity.abs(), 0.25, epsilon = 1e-3);
    }

    #[test]
    fn first_time_missing() {
        let result = TrajectorySpline::open(&[Waypoint::new(0.0), timed(1.0, 1.0)]);
        assert!(matches!(
            result.unwrap_err(),
            SplineError::Trajectory(TrajectoryError::FirstTimeMissing)
        ));
    }

    #[test]
    fn last_time_missing() {
        let result = TrajectorySpline::open(&[timed(0.0, 0.0), Waypoint::new(1.0)]);
        assert!(matches!(
            result.unwrap_err(),
            SplineError::Trajectory(TrajectoryError::LastTimeMissing)
        ));
    }

    #[test]
    fn speed_without_time() {
        let waypoints = [
            timed(0.0, 0.0),
            Waypoint {
                speed: Some(1.0),
                ..Waypoint::new(1.0)
            },
            timed(2.0, 4.0),
        ];
        let result = TrajectorySpline::open(&waypoints);
        assert!(matches!(
            result.unwrap_err(),
            SplineError::Trajectory(TrajectoryError::SpeedWithoutTime { index: 1 })
        ));
    }

    #[test]
    fn non_positive_speed() {
        let waypoints = [
            Waypoint {
                time: Some(0.0),
                speed: Some(-1.0),
                ..Waypoint::new(0.0)
            },
            timed(1.0, 1.0),
        ];
        let result = TrajectorySpline::open(&waypoints);
        assert!(matches!(
            result.unwrap_err(),
            SplineError::Trajectory(TrajectoryError::NonPositiveSpeed { index: 0, speed })
                if speed == -1.0
        ));
    }

    #[test]
    fn incompatible_speed() {
        // Moving from 0 to 1 in one second while crawling at both ends
        // cannot be done with a monotone time map.
        let waypoints = [
            Waypoint {
                time: Some(0.0),
                speed: Some(1e-3),
                ..Waypoint::new(0.0)
            },
            Waypoint {
                time: Some(1.0),
                speed: Some(1e-3),
                ..Waypoint::new(1.0)
            },
        ];
        let result = TrajectorySpline::open(&waypoints);
        assert!(matches!(
            result.unwrap_err(),
            SplineError::Trajectory(TrajectoryError::IncompatibleSpeed { index: 0, .. })
        ));
    }

    #[test]
    fn incompatible_speed_after_untimed_waypoint() {
        // The reported index is the waypoint's, even when earlier
        // waypoints without a time leave gaps in the anchor sequence.
        let waypoints = [
            timed(0.0, 0.0),
            Waypoint::new(1.0),
            timed(2.0, 2.0),
            Waypoint {
                time: Some(3.0),
                speed: Some(1e-3),
                ..Waypoint::new(3.0)
            },
        ];
        let result = TrajectorySpline::open(&waypoints);
        assert!(matches!(
            result.unwrap_err(),
            SplineError::Trajectory(TrajectoryError::IncompatibleSpeed { index: 3, speed })
                if speed == 1e-3
        ));
    }

    #[test]
    fn times_not_ascending() {
        let result = TrajectorySpline::open(&[timed(0.0, 1.0), timed(1.0, 1.0)]);
        assert!(matches!(
            result.unwrap_err(),
            SplineError::Trajectory(TrajectoryError::TimesNotAscending { index: 1 })
        ));
    }

    #[test]
    fn time_nan() {
        let result = TrajectorySpline::open(&[timed(0.0, 0.0), timed(1.0, f64::NAN)]);
        assert!(matches!(
            result.unwrap_err(),
            SplineError::Trajectory(TrajectoryError::TimeNan { index: 1 })
        ));
    }

    #[test]
    fn shaped_endpoint_on_open_curve() {
        let waypoints = [
            Waypoint {
                time: Some(0.0),
                shape: Tcb::new(1.0, 0.0, 0.0),
                ..Waypoint::new(0.0)
            },
            timed(1.0, 1.0),
        ];
        let result = TrajectorySpline::open(&waypoints);
        assert!(matches!(
            result.unwrap_err(),
            SplineError::Trajectory(TrajectoryError::ShapedEndpoint { index: 0 })
        ));
    }

    #[test]
    fn too_few_waypoints() {
        let result = TrajectorySpline::open(&[timed(0.0, 0.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn batch_equals_elementwise() {
        let spline = TrajectorySpline::open(&[timed(1.0, 0.0), timed(2.0, 3.0)]).unwrap();
        let times = [-0.5, 0.0, 0.7, 1.9, 3.0, 3.5];
        let batch = spline.evaluate_many(&times);
        for (&t, &position) in times.iter().zip(&batch) {
            assert_eq!(spline.evaluate(t), position);
        }
    }
}

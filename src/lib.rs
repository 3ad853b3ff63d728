//! Keyframe spline construction and evaluation.
//!
//! Turns sparse, possibly irregular keyframe data (positions, optional
//! times, speeds and per-vertex shape parameters) into continuous curves:
//!
//! * [`curve::PiecewiseCubicCurve`] — piecewise cubic Hermite curves in
//!   one, two or three dimensions, with Kochanek-Bartels
//!   (tension/continuity/bias) and shape-preserving constructors.
//! * [`curve::MonotoneCubicSpline`] — monotone 1D splines supporting
//!   value-to-parameter inversion.
//! * [`trajectory::TrajectorySpline`] — positions traversed according to
//!   per-waypoint time and speed constraints, evaluated by time.
//!
//! All curve objects are immutable after construction; every validation
//! happens eagerly in the constructors, which return structured errors.

pub mod curve;
pub mod error;
pub mod grid;
pub mod math;
pub mod trajectory;

pub use error::{Result, SplineError};

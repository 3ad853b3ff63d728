use thiserror::Error;

/// Top-level error type for the keyspline engine.
#[derive(Debug, Error)]
pub enum SplineError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error(transparent)]
    KochanekBartels(#[from] KochanekBartelsError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Monotone(#[from] MonotoneError),

    #[error(transparent)]
    Trajectory(#[from] TrajectoryError),
}

/// Errors related to knot grids.
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("index {index}: NaN values are not allowed in grid")]
    Nan { index: usize },

    #[error("index {index}: grid values must be strictly ascending")]
    NotAscending { index: usize },
}

/// Errors related to piecewise cubic curve construction.
#[derive(Debug, Error, PartialEq)]
pub enum CurveError {
    #[error("there must be at least one segment")]
    NoSegments,

    #[error("length of grid ({grid}) must be one more than number of segments ({segments})")]
    GridVsSegments { grid: usize, segments: usize },

    #[error("there must be at least two positions")]
    TooFewPositions,

    #[error(
        "exactly two tangents per segment are required \
         (got {tangents} tangents for {segments} segments)"
    )]
    TangentsVsSegments { tangents: usize, segments: usize },

    #[error("length of grid ({grid}) must be the same as number of positions ({positions})")]
    GridVsPositions { grid: usize, positions: usize },
}

/// Errors related to the Kochanek-Bartels tangent solver.
#[derive(Debug, Error, PartialEq)]
pub enum KochanekBartelsError {
    #[error("there must be at least two positions")]
    TooFewPositions,

    #[error("number of positions ({positions}) must be {} number of TCB triples ({tcb})",
        if *.closed { "the same as" } else { "two more than" })]
    TcbVsPositions {
        tcb: usize,
        positions: usize,
        closed: bool,
    },

    #[error("length of grid ({grid}) must be {} number of positions ({positions})",
        if *.closed { "one more than" } else { "the same as" })]
    GridVsPositions {
        grid: usize,
        positions: usize,
        closed: bool,
    },

    #[error("repeated position (at index {index}) is not allowed")]
    RepeatedPosition { index: usize },
}

/// Errors related to shape-preserving slope selection.
#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("there must be at least two values")]
    TooFewValues,

    #[error("length of grid ({grid}) must be {} number of values ({values})",
        if *.closed { "one more than" } else { "the same as" })]
    GridVsValues {
        grid: usize,
        values: usize,
        closed: bool,
    },

    #[error("number of slopes ({slopes}) must be the same as number of values ({values})")]
    SlopesVsValues { slopes: usize, values: usize },

    #[error("slope at index {index} too steep ({slope}; maximum: {maximum})")]
    SlopeTooSteep {
        index: usize,
        slope: f64,
        maximum: f64,
    },

    #[error("slope at index {index} has wrong sign ({slope})")]
    SlopeWrongSign { index: usize, slope: f64 },
}

/// Errors related to monotone splines and value-to-parameter inversion.
#[derive(Debug, Error, PartialEq)]
pub enum MonotoneError {
    #[error("values must be monotonically non-decreasing or non-increasing")]
    NotMonotone,

    #[error("value {value} is outside the representable range [{min}, {max}]")]
    ValueOutOfRange { value: f64, min: f64, max: f64 },

    #[error("value {value} is attained on a whole plateau, its parameter is ambiguous")]
    AmbiguousValue { value: f64 },
}

/// Errors related to the composite position-time-speed spline.
#[derive(Debug, Error, PartialEq)]
pub enum TrajectoryError {
    #[error("index {index}: tension/continuity/bias is not allowed at the ends of an open curve")]
    ShapedEndpoint { index: usize },

    #[error("the first waypoint must have a time")]
    FirstTimeMissing,

    #[error("the last waypoint must have a time")]
    LastTimeMissing,

    #[error("index {index}: speed is only allowed if time is given")]
    SpeedWithoutTime { index: usize },

    #[error("index {index}: speed must be positive and finite (got {speed})")]
    NonPositiveSpeed { index: usize, speed: f64 },

    #[error("index {index}: speed ({speed}) cannot be reached with the given time constraints")]
    IncompatibleSpeed { index: usize, speed: f64 },

    #[error("index {index}: time values are not allowed to be NaN")]
    TimeNan { index: usize },

    #[error("index {index}: time values must be strictly ascending")]
    TimesNotAscending { index: usize },
}

/// Convenience type alias for results using [`SplineError`].
pub type Result<T> = std::result::Result<T, SplineError>;

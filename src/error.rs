use thiserror::Error;

/// Top-level error type for polyloop.
#[derive(Debug, Error)]
pub enum PolyloopError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors raised when a loop or polygon is geometrically invalid.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("too few points: {count} after reduction, at least 3 required")]
    TooFewPoints { count: usize },

    #[error("point {index} is {distance} off the loop plane")]
    NonPlanar { index: usize, distance: f64 },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to malformed operation input.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for results using [`PolyloopError`].
pub type Result<T> = std::result::Result<T, PolyloopError>;

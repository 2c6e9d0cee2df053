//! Error types for Skyburst.

use thiserror::Error;

/// Top-level error type for Skyburst operations.
#[derive(Debug, Error)]
pub enum SkyburstError {
    /// Burst shape validation errors
    #[error("Shape error: {0}")]
    Shape(#[from] ShapeError),

    /// Launch/spec validation errors
    #[error("Launch error: {0}")]
    Launch(#[from] LaunchError),

    /// Color could not be parsed
    #[error("Invalid color: {0}")]
    Color(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Malformed burst shape input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    /// Raster grid has no rows or no columns
    #[error("pixel grid is empty")]
    EmptyGrid,

    /// Raster grid row width differs from the first row
    #[error("pixel grid row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        /// Offending row index
        row: usize,
        /// Width of the first row
        expected: usize,
        /// Width of the offending row
        actual: usize,
    },

    /// Spherical shape with no segments
    #[error("spherical burst needs at least one segment")]
    ZeroSegments,

    /// Size factor is not a finite positive number
    #[error("burst size must be finite and positive, got {0}")]
    InvalidSize(f32),

    /// Raster cell spacing is not a finite positive number
    #[error("cell spacing must be finite and positive, got {0}")]
    InvalidSpacing(f32),
}

/// Malformed launch parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LaunchError {
    /// Launch duration is not a finite positive number
    #[error("launch duration must be finite and positive, got {0}")]
    InvalidDuration(f32),

    /// Origin and target coincide, so there is no launch direction
    #[error("launch origin and target are the same point")]
    DegenerateLaunch,

    /// Origin or target has a NaN/infinite component
    #[error("launch coordinates must be finite")]
    NonFiniteCoordinate,

    /// Multi-layer burst with zero layers
    #[error("a burst needs at least one layer")]
    ZeroLayers,

    /// Per-layer lifetime stagger is negative or not finite
    #[error("layer stagger must be finite and non-negative, got {0}")]
    InvalidStagger(f32),
}

/// Result type alias for Skyburst operations.
pub type SkyburstResult<T> = Result<T, SkyburstError>;

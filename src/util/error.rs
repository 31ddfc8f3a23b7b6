//! Error types for the boxy library.

use thiserror::Error;

/// Main error type for cuboid and anchor operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Not enough points to describe a cuboid
    #[error("Insufficient points: need {min}-{max}, got {got}")]
    InsufficientPoints { min: usize, max: usize, got: usize },

    /// Wrong number of components (faces, edges, vertices) selected
    #[error("Invalid {kind} count: expected {min}-{max}, got {got}")]
    InvalidComponentCount {
        kind: &'static str,
        min: usize,
        max: usize,
        got: usize,
    },

    /// Component index does not exist on the mesh
    #[error("{kind} index {index} out of range (count: {count})")]
    ComponentOutOfRange {
        kind: &'static str,
        index: usize,
        count: usize,
    },

    /// Points do not describe any cuboid
    #[error("Could not infer valid cuboid from {0} points")]
    NoCuboid(usize),

    /// Zero-length or otherwise unusable vector
    #[error("Degenerate vector: {0}")]
    DegenerateVector(String),

    /// Rotation must be a multiple of 90 degrees
    #[error("Invalid rotation: {0} is not a multiple of 90 degrees")]
    InvalidRotation(f64),

    /// Unknown anchor name or attribute index
    #[error("Invalid anchor: {0}")]
    InvalidAnchor(String),

    /// Unknown side name
    #[error("Invalid side: {0}")]
    InvalidSide(String),

    /// Face is not a planar rectangle
    #[error("Invalid quad: {0}")]
    InvalidQuad(String),

    /// Face pair is not two opposite faces of a cuboid
    #[error("Invalid cuboid faces: {0}")]
    InvalidCuboidFaces(String),

    /// Geometry has no points
    #[error("Empty geometry: {0}")]
    EmptyGeometry(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create a degenerate vector error.
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateVector(msg.into())
    }

    /// Create a component count error.
    pub fn count(kind: &'static str, min: usize, max: usize, got: usize) -> Self {
        Self::InvalidComponentCount { kind, min, max, got }
    }
}

/// Result type alias for boxy operations.
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for scene validation and rendering.

use thiserror::Error;

/// Errors that abort a render before or while it runs.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("Only {usable} usable worker thread(s) after reserving one for the system, at least 2 are required")]
    UnusableThreadCount { usable: usize },

    #[error("Thread count {requested} is outside the supported range 1..={max}")]
    ThreadCountOutOfRange { requested: usize, max: usize },

    #[error("Failed to create worker thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

/// Errors found while validating a scene description.
#[derive(Error, Debug, PartialEq)]
pub enum SceneError {
    #[error("Sphere {index} is degenerate (center and radius must be finite, radius non-zero)")]
    DegenerateSphere { index: usize },

    #[error("Sphere {index} has an invalid material: {reason}")]
    InvalidMaterial { index: usize, reason: String },
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

//! Error types for the ray tracer.

use thiserror::Error;

/// Main error type for the ray tracer.
#[derive(Error, Debug)]
pub enum Error {
    /// Errors reported by the graphics pipeline collaborator
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// Window creation or management errors
    #[error("Window error: {0}")]
    Window(String),

    /// Resource loading errors
    #[error("Resource error: {0}")]
    Resource(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// A scene index outside of the scene registry.
    #[error("scene index {index} is out of range (registry holds {count} scenes)")]
    SceneIndexOutOfRange { index: usize, count: usize },

    /// The fullscreen framebuffer does not have the requested size.
    ///
    /// Benchmark results are only comparable at the exact requested resolution.
    #[error(
        "framebuffer fullscreen size mismatch (requested: {}x{}, got: {}x{})",
        requested.0, requested.1, actual.0, actual.1
    )]
    FramebufferSizeMismatch {
        requested: (u32, u32),
        actual: (u32, u32),
    },

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using the ray tracer's Error type.
pub type Result<T> = std::result::Result<T, Error>;

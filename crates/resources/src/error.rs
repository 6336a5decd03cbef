//! Error types for resource loading.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for resource loading operations.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// A scene was built without any models.
    #[error("Scene '{0}' contains no models")]
    NoModels(String),

    /// A scene handle was created without textures.
    #[error("Scene contains no textures")]
    NoTextures,

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding error.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}

/// Result type alias for resource operations.
pub type ResourceResult<T> = Result<T, ResourceError>;

impl From<ResourceError> for tracer_core::Error {
    fn from(err: ResourceError) -> Self {
        tracer_core::Error::Resource(err.to_string())
    }
}

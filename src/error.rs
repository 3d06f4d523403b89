// Error types module
// Failures reported by the photo library adapter

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while querying or writing the photo library
#[derive(Debug, Error)]
pub enum LibraryError {
    /// The library root does not exist or is not a directory
    #[error("photo library not found at {}", .0.display())]
    NotFound(PathBuf),

    /// Reading or writing inside the library failed
    #[error("photo library I/O failed at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The image could not be encoded into the library
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

impl LibraryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

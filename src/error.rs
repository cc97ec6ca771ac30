//! Error types shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HelixError>;

#[derive(Debug, Error)]
pub enum HelixError {
    /// Load attempted but no archive exists at the path
    #[error("no saved field at {}", path.display())]
    MissingArchive { path: PathBuf },

    /// Archive dimensions differ from the configured field size
    #[error("archive shape {found:?} does not match field shape {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: Vec<usize>,
    },

    #[error("malformed archive: {0}")]
    ArchiveFormat(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("wav encoding error: {0}")]
    Wav(#[from] hound::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("audio output error: {0}")]
    Audio(String),
}

impl HelixError {
    /// Whether this error is informational rather than a failure shown to the user
    pub fn is_informational(&self) -> bool {
        matches!(self, HelixError::MissingArchive { .. })
    }
}

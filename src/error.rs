use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading screen content.
#[derive(Debug, Error)]
pub enum ContentError {
    /// No file matched the content key under the content root.
    #[error("content '{key}' not found under '{}'", .root.display())]
    NotFound { key: String, root: PathBuf },

    /// The file exists but could not be read.
    #[error("failed to read content '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The file could not be decoded as an image.
    #[error("failed to decode image '{key}': {source}")]
    Image {
        key: String,
        #[source]
        source: image::ImageError,
    },

    /// The file could not be parsed as a TTF/OTF font.
    #[error("failed to parse font '{key}': {reason}")]
    Font { key: String, reason: String },
}

//! Storage error types.

/// Errors from writing the application document.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem write failed
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Document could not be serialized
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors from storing an uploaded schedule image.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// No usable filename after sanitizing
    #[error("invalid filename: {0:?}")]
    InvalidFilename(String),

    /// Uploaded file isn't an image
    #[error("unsupported content type: {0}")]
    NotAnImage(String),

    /// Writing the file failed
    #[error("failed to write upload: {0}")]
    Io(#[from] std::io::Error),
}

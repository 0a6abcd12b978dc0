//! Error types for the QnA hub library.

use thiserror::Error;

/// All errors that can occur in the QnA hub library.
#[derive(Error, Debug)]
pub enum QnaError {
    /// Question not found by ID.
    #[error("Question {0} not found")]
    QuestionNotFound(u64),

    /// Viewer not found by ID.
    #[error("Viewer {0} not found")]
    ViewerNotFound(u64),

    /// Cursor token could not be decoded or belongs to another sort order.
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    /// Malformed filter, sort, page size or record input.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Transient failure of the underlying store.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A record changed between read and write.
    #[error("Version conflict on {entity} {id}")]
    VersionConflict { entity: &'static str, id: u64 },

    /// A toggle committed the viewer's vote state but could not apply the
    /// counter delta. Not retryable: re-running the toggle would undo the vote.
    #[error("Partial write: {0}")]
    PartialWrite(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot payload could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Compression error.
    #[error("Compression error: {0}")]
    Compression(String),

    /// Invalid magic bytes in file header.
    #[error("Invalid magic bytes in file header")]
    InvalidMagic,

    /// Unsupported format version.
    #[error("Unsupported format version: {0}")]
    UnsupportedVersion(u32),

    /// Snapshot payload is inconsistent with its header.
    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),

    /// File is empty or truncated.
    #[error("File is empty or truncated")]
    Truncated,
}

impl QnaError {
    /// Whether this error means a referenced record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::QuestionNotFound(_) | Self::ViewerNotFound(_))
    }

    /// Whether retrying the same call later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable(_) | Self::VersionConflict { .. }
        )
    }

    /// HTTP-equivalent status code for adapters that expose the hub over HTTP.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::QuestionNotFound(_) | Self::ViewerNotFound(_) => 404,
            Self::InvalidCursor(_) | Self::Validation(_) => 400,
            Self::VersionConflict { .. } => 409,
            Self::StoreUnavailable(_) => 503,
            _ => 500,
        }
    }
}

/// Convenience result type for QnA hub operations.
pub type QnaResult<T> = Result<T, QnaError>;

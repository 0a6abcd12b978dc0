//! All data types for the QnA hub library.

pub mod error;
pub mod header;
pub mod question;
pub mod sort;
pub mod viewer;

pub use error::{QnaError, QnaResult};
pub use header::{FileHeader, HEADER_SIZE};
pub use question::{Answer, Difficulty, InterviewType, Question, QuestionBuilder, QuestionPatch};
pub use sort::{SortKey, SortOrder, SortPosition};
pub use viewer::{Viewer, VoteDirection};

/// Question identifier (assigned sequentially by the store).
pub type QuestionId = u64;

/// Viewer identifier (assigned sequentially by the store).
pub type ViewerId = u64;

/// Magic bytes at the start of every .qnah snapshot file.
pub const QNAH_MAGIC: [u8; 4] = [0x51, 0x4E, 0x41, 0x48]; // "QNAH"

/// Current snapshot format version.
pub const FORMAT_VERSION: u32 = 1;

/// Maximum size of question and answer texts: 64KB.
pub const MAX_TEXT_SIZE: usize = 65_536;

/// Maximum size of short labels (company, category, username).
pub const MAX_LABEL_SIZE: usize = 128;

/// Maximum size of a listing search string.
pub const MAX_SEARCH_SIZE: usize = 256;

/// Returns the current time as Unix epoch microseconds.
pub fn now_micros() -> u64 {
    chrono::Utc::now().timestamp_micros() as u64
}

/// Trim a required text field and check it against a size limit.
pub(crate) fn require_text(field: &str, value: &str, max: usize) -> QnaResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(QnaError::Validation(format!("{field} must not be empty")));
    }
    if trimmed.len() > max {
        return Err(QnaError::Validation(format!(
            "{field} exceeds maximum size: {} > {max}",
            trimmed.len()
        )));
    }
    Ok(trimmed.to_string())
}

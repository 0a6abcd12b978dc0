//! QnA Hub: engagement and listing engine for an interview-question sharing hub.
//!
//! Shared question records carry aggregate vote and view counters; per-viewer
//! records carry vote direction and bookmarks. The engines keep the two
//! consistent, serve cursor-paginated listings, and project a viewer's state
//! onto listings without writing it back to the shared records.

pub mod cli;
pub mod config;
pub mod engine;
pub mod format;
pub mod index;
pub mod store;
pub mod types;

// Re-export commonly used types at the crate root
pub use config::{FlipDelta, HubConfig};
pub use engine::{
    Cursor, EngagementEngine, ListingFilter, ListingQuery, Page, QuestionHub, QuestionView,
    ViewCounter, ViewProjector, VoteOutcome, VoteTransition,
};
pub use format::{SnapshotReader, SnapshotWriter};
pub use index::{AuthorIndex, CategoryIndex, TemporalIndex};
pub use store::{ContentStore, MemoryStore, QuestionScan, Snapshot, ViewerStore};
pub use types::{
    now_micros, Answer, Difficulty, InterviewType, QnaError, QnaResult, Question,
    QuestionBuilder, QuestionId, QuestionPatch, SortKey, SortOrder, SortPosition, Viewer,
    ViewerId, VoteDirection, MAX_LABEL_SIZE, MAX_TEXT_SIZE,
};

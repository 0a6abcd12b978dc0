//! Persistence boundary: store traits consumed by the engines, plus the
//! in-memory implementation backing the CLI and tests.

pub mod memory;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::{
    QnaResult, Question, QuestionId, SortOrder, SortPosition, Viewer, ViewerId,
};

pub use memory::MemoryStore;

/// A bounded, filtered, ordered read of questions.
#[derive(Debug, Clone)]
pub struct QuestionScan {
    /// Lowercased substring the question text must contain. Empty = no filter.
    pub search: String,
    /// Category labels, OR semantics. Empty = all categories.
    pub categories: BTreeSet<String>,
    /// Order of the returned records.
    pub sort: SortOrder,
    /// Maximum number of records to return.
    pub limit: usize,
    /// Only records strictly after this position are returned.
    pub after: Option<SortPosition>,
}

impl QuestionScan {
    /// An unfiltered scan of the first `limit` records in `sort` order.
    pub fn new(sort: SortOrder, limit: usize) -> Self {
        Self {
            search: String::new(),
            categories: BTreeSet::new(),
            sort,
            limit,
            after: None,
        }
    }

    /// Whether a question passes the search and category predicates.
    pub fn matches(&self, question: &Question) -> bool {
        (self.categories.is_empty() || self.categories.contains(&question.category))
            && question.matches_search(&self.search)
    }
}

/// Question persistence.
///
/// `save_question` is a compare-and-swap on [`Question::version`]: it fails
/// with `VersionConflict` when the stored version differs from the submitted
/// one, and otherwise stores the record with the version incremented.
pub trait ContentStore: Send + Sync {
    /// Look up a question by ID.
    fn find_question(&self, id: QuestionId) -> QnaResult<Option<Question>>;

    /// Run a filtered, ordered, cursor-bounded scan.
    fn find_questions(&self, scan: &QuestionScan) -> QnaResult<Vec<Question>>;

    /// Look up several questions, in the order given. Missing IDs are skipped.
    fn find_questions_by_ids(&self, ids: &[QuestionId]) -> QnaResult<Vec<Question>>;

    /// Questions posted by an author, newest first.
    fn find_questions_by_author(&self, author: ViewerId, limit: usize)
        -> QnaResult<Vec<Question>>;

    /// Insert a new question, assigning its ID. Returns the stored record.
    fn insert_question(&self, question: Question) -> QnaResult<Question>;

    /// Replace a question (compare-and-swap on version). Returns the stored record.
    fn save_question(&self, question: &Question) -> QnaResult<Question>;

    /// Delete a question. Returns whether it existed.
    fn delete_question(&self, id: QuestionId) -> QnaResult<bool>;

    /// Distinct category labels, sorted.
    fn categories(&self) -> QnaResult<Vec<String>>;
}

/// Viewer persistence, with the same compare-and-swap contract as
/// [`ContentStore::save_question`].
pub trait ViewerStore: Send + Sync {
    /// Look up a viewer by ID.
    fn find_viewer(&self, id: ViewerId) -> QnaResult<Option<Viewer>>;

    /// Look up a viewer by username (case-insensitive).
    fn find_viewer_by_username(&self, username: &str) -> QnaResult<Option<Viewer>>;

    /// Insert a new viewer, assigning its ID. Usernames must be unique.
    fn insert_viewer(&self, viewer: Viewer) -> QnaResult<Viewer>;

    /// Replace a viewer (compare-and-swap on version). Returns the stored record.
    fn save_viewer(&self, viewer: &Viewer) -> QnaResult<Viewer>;
}

/// Full store contents, as persisted in a .qnah file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Next question ID to assign.
    pub next_question_id: QuestionId,
    /// Next viewer ID to assign.
    pub next_viewer_id: ViewerId,
    /// All questions, ascending by ID.
    pub questions: Vec<Question>,
    /// All viewers, ascending by ID.
    pub viewers: Vec<Viewer>,
}

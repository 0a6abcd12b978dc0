//! Viewer engagement records: per-user vote and bookmark sets.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{now_micros, require_text, QuestionId, ViewerId, MAX_LABEL_SIZE};
use crate::types::error::QnaResult;

/// Direction of a viewer's vote on a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Return a human-readable name for this direction.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    /// Counter contribution of a single vote in this direction.
    pub fn sign(&self) -> i64 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}

impl std::fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A viewer's engagement state across all questions.
///
/// `upvoted` and `downvoted` are disjoint at all times; only the
/// engagement engine mutates them, through [`Viewer::set_vote`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewer {
    /// Unique identifier (assigned sequentially by the store).
    pub id: ViewerId,
    /// Display name, unique across viewers.
    pub username: String,
    /// Questions this viewer has upvoted.
    pub upvoted: BTreeSet<QuestionId>,
    /// Questions this viewer has downvoted.
    pub downvoted: BTreeSet<QuestionId>,
    /// Questions this viewer has bookmarked.
    pub bookmarks: BTreeSet<QuestionId>,
    /// When the viewer registered (Unix epoch microseconds).
    pub created_at: u64,
    /// Store-managed record version for optimistic concurrency.
    #[serde(default)]
    pub version: u64,
}

impl Viewer {
    /// Create a viewer with empty engagement state. The id will be 0
    /// (assigned by the store on insertion).
    pub fn new(username: &str) -> QnaResult<Self> {
        Ok(Self {
            id: 0,
            username: require_text("username", username, MAX_LABEL_SIZE)?,
            upvoted: BTreeSet::new(),
            downvoted: BTreeSet::new(),
            bookmarks: BTreeSet::new(),
            created_at: now_micros(),
            version: 0,
        })
    }

    /// Current vote direction on a question, if any.
    pub fn vote_on(&self, question_id: QuestionId) -> Option<VoteDirection> {
        if self.upvoted.contains(&question_id) {
            Some(VoteDirection::Up)
        } else if self.downvoted.contains(&question_id) {
            Some(VoteDirection::Down)
        } else {
            None
        }
    }

    /// Replace the vote on a question, keeping the two sets disjoint.
    pub fn set_vote(&mut self, question_id: QuestionId, vote: Option<VoteDirection>) {
        self.upvoted.remove(&question_id);
        self.downvoted.remove(&question_id);
        match vote {
            Some(VoteDirection::Up) => {
                self.upvoted.insert(question_id);
            }
            Some(VoteDirection::Down) => {
                self.downvoted.insert(question_id);
            }
            None => {}
        }
    }

    /// Whether a question is bookmarked.
    pub fn has_bookmark(&self, question_id: QuestionId) -> bool {
        self.bookmarks.contains(&question_id)
    }
}

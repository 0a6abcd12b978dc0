//! Listing sort orders and positions within them.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{Question, QuestionId};
use crate::types::error::{QnaError, QnaResult};

/// Sort order for listings. Every order is total: ties on the primary key
/// are broken by question id, so a position is never ambiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most recent first, ties newest id first.
    #[default]
    Newest,
    /// Highest vote count first, ties in insertion order.
    Votes,
    /// Company name ascending (byte-wise), ties in insertion order.
    Company,
}

impl SortOrder {
    /// Return the canonical name for this sort order.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Votes => "votes",
            Self::Company => "company",
        }
    }

    /// Parse a sort order from its name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "newest" => Some(Self::Newest),
            "votes" => Some(Self::Votes),
            "company" => Some(Self::Company),
            _ => None,
        }
    }

    /// The sort key of a question under this order.
    pub fn key_of(&self, question: &Question) -> SortKey {
        match self {
            Self::Newest => SortKey::CreatedAt(question.created_at),
            Self::Votes => SortKey::Votes(question.votes),
            Self::Company => SortKey::Company(question.company.clone()),
        }
    }

    /// Compare two questions under this order.
    pub fn compare(&self, a: &Question, b: &Question) -> Ordering {
        match self {
            Self::Newest => b
                .created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id)),
            Self::Votes => b.votes.cmp(&a.votes).then_with(|| a.id.cmp(&b.id)),
            Self::Company => a
                .company
                .cmp(&b.company)
                .then_with(|| a.id.cmp(&b.id)),
        }
    }

    /// Where a question falls relative to a position: `Greater` means the
    /// question sorts strictly after it.
    ///
    /// The position must have been minted under this order; a foreign key
    /// kind places every question after it.
    pub fn compare_to_position(&self, question: &Question, position: &SortPosition) -> Ordering {
        match (self, &position.key) {
            (Self::Newest, SortKey::CreatedAt(ts)) => ts
                .cmp(&question.created_at)
                .then_with(|| position.id.cmp(&question.id)),
            (Self::Votes, SortKey::Votes(votes)) => votes
                .cmp(&question.votes)
                .then_with(|| question.id.cmp(&position.id)),
            (Self::Company, SortKey::Company(company)) => question
                .company
                .as_str()
                .cmp(company.as_str())
                .then_with(|| question.id.cmp(&position.id)),
            _ => Ordering::Greater,
        }
    }

    /// Whether a question sorts strictly after a position.
    pub fn is_after(&self, question: &Question, position: &SortPosition) -> bool {
        self.compare_to_position(question, position) == Ordering::Greater
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for SortOrder {
    type Err = QnaError;

    fn from_str(s: &str) -> QnaResult<Self> {
        Self::from_name(s).ok_or_else(|| QnaError::Validation(format!("unknown sort order: {s}")))
    }
}

/// Primary sort-key value captured from a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "k", content = "v", rename_all = "lowercase")]
pub enum SortKey {
    CreatedAt(u64),
    Votes(i64),
    Company(String),
}

impl SortKey {
    /// The sort order this key belongs to.
    pub fn order(&self) -> SortOrder {
        match self {
            Self::CreatedAt(_) => SortOrder::Newest,
            Self::Votes(_) => SortOrder::Votes,
            Self::Company(_) => SortOrder::Company,
        }
    }
}

/// A point in a sorted listing: the key and id of the last item seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortPosition {
    pub key: SortKey,
    pub id: QuestionId,
}

impl SortPosition {
    /// The position occupied by a question under an order.
    pub fn of(order: SortOrder, question: &Question) -> Self {
        Self {
            key: order.key_of(question),
            id: question.id,
        }
    }

    /// The sort order this position was minted under.
    pub fn order(&self) -> SortOrder {
        self.key.order()
    }
}

//! Temporal index of sorted (created_at, question_id) pairs for recency scans.

use crate::types::{Question, QuestionId};

/// Sorted list of (created_at, question_id) pairs.
pub struct TemporalIndex {
    /// Sorted ascending; the newest question is last.
    entries: Vec<(u64, QuestionId)>,
}

impl TemporalIndex {
    /// Create a new, empty temporal index.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Question IDs newest first, starting strictly after `(created_at, id)`
    /// in that order, or from the newest entry when `after` is `None`.
    pub fn newest_after(
        &self,
        after: Option<(u64, QuestionId)>,
    ) -> impl Iterator<Item = QuestionId> + '_ {
        let end = match after {
            Some(entry) => self.entries.partition_point(|e| *e < entry),
            None => self.entries.len(),
        };
        self.entries[..end].iter().rev().map(|(_, id)| *id)
    }

    /// Rebuild the entire index from a slice of questions.
    pub fn rebuild(&mut self, questions: &[Question]) {
        self.entries.clear();
        self.entries.reserve(questions.len());
        for question in questions {
            self.entries.push((question.created_at, question.id));
        }
        self.entries.sort_unstable();
    }

    /// Incrementally add a question.
    pub fn add(&mut self, question: &Question) {
        let entry = (question.created_at, question.id);
        let pos = self.entries.partition_point(|e| *e < entry);
        self.entries.insert(pos, entry);
    }

    /// Remove a question from the index.
    pub fn remove(&mut self, id: QuestionId, created_at: u64) {
        if let Ok(pos) = self.entries.binary_search(&(created_at, id)) {
            self.entries.remove(pos);
        }
    }
}

impl Default for TemporalIndex {
    fn default() -> Self {
        Self::new()
    }
}

//! Author index: maps each viewer to the sorted IDs of questions they posted.

use std::collections::HashMap;

use crate::types::{Question, QuestionId, ViewerId};

/// Maps each author to a sorted list of question IDs.
pub struct AuthorIndex {
    index: HashMap<ViewerId, Vec<QuestionId>>,
}

impl AuthorIndex {
    /// Create a new, empty author index.
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
        }
    }

    /// Get all question IDs posted by an author, oldest first.
    pub fn get(&self, author: ViewerId) -> &[QuestionId] {
        self.index
            .get(&author)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Count authors with at least one question.
    pub fn author_count(&self) -> usize {
        self.index.len()
    }

    /// Rebuild the entire index from a slice of questions.
    pub fn rebuild(&mut self, questions: &[Question]) {
        self.index.clear();
        for question in questions {
            self.index
                .entry(question.author)
                .or_default()
                .push(question.id);
        }
        for list in self.index.values_mut() {
            list.sort_unstable();
        }
    }

    /// Incrementally add a question.
    pub fn add(&mut self, question: &Question) {
        let list = self.index.entry(question.author).or_default();
        let pos = list.binary_search(&question.id).unwrap_or_else(|p| p);
        list.insert(pos, question.id);
    }

    /// Remove a question from the index.
    pub fn remove(&mut self, id: QuestionId, author: ViewerId) {
        if let Some(list) = self.index.get_mut(&author) {
            if let Ok(pos) = list.binary_search(&id) {
                list.remove(pos);
            }
            if list.is_empty() {
                self.index.remove(&author);
            }
        }
    }
}

impl Default for AuthorIndex {
    fn default() -> Self {
        Self::new()
    }
}

//! Index by category. Maps each category label to sorted question IDs.

use std::collections::HashMap;

use crate::types::{Question, QuestionId};

/// Maps each category label to a sorted list of question IDs.
pub struct CategoryIndex {
    index: HashMap<String, Vec<QuestionId>>,
}

impl CategoryIndex {
    /// Create a new, empty category index.
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
        }
    }

    /// Get all question IDs in any of the given categories, merged and sorted.
    pub fn get_any<'a>(&self, categories: impl IntoIterator<Item = &'a String>) -> Vec<QuestionId> {
        let mut result: Vec<QuestionId> = Vec::new();
        for category in categories {
            if let Some(ids) = self.index.get(category.as_str()) {
                result.extend_from_slice(ids);
            }
        }
        result.sort_unstable();
        result.dedup();
        result
    }

    /// All known category labels, sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.index.keys().cloned().collect();
        labels.sort();
        labels
    }

    /// Rebuild the entire index from a slice of questions.
    pub fn rebuild(&mut self, questions: &[Question]) {
        self.index.clear();
        for question in questions {
            self.index
                .entry(question.category.clone())
                .or_default()
                .push(question.id);
        }
        for list in self.index.values_mut() {
            list.sort_unstable();
        }
    }

    /// Incrementally add a question.
    pub fn add(&mut self, question: &Question) {
        let list = self.index.entry(question.category.clone()).or_default();
        let pos = list.binary_search(&question.id).unwrap_or_else(|p| p);
        list.insert(pos, question.id);
    }

    /// Remove a question from the index. Empty categories disappear.
    pub fn remove(&mut self, id: QuestionId, category: &str) {
        if let Some(list) = self.index.get_mut(category) {
            if let Ok(pos) = list.binary_search(&id) {
                list.remove(pos);
            }
            if list.is_empty() {
                self.index.remove(category);
            }
        }
    }
}

impl Default for CategoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

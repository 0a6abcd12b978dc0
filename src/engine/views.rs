//! Best-effort view counting.

use crate::config::HubConfig;
use crate::store::ContentStore;
use crate::types::{QnaError, QnaResult, Question, QuestionId};

use super::with_retries;

/// Increments question view counters.
pub struct ViewCounter {
    max_attempts: u32,
}

impl ViewCounter {
    /// Create a view counter.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Create from hub configuration.
    pub fn from_config(config: &HubConfig) -> Self {
        Self::new(config.max_write_retries)
    }

    /// Add one view to a question and return the updated record.
    ///
    /// A missing question yields `Ok(None)`. If every attempt loses a version
    /// race the increment is dropped and the current record is returned.
    /// Only store failures propagate.
    pub fn record_view<S: ContentStore + ?Sized>(
        &self,
        store: &S,
        question_id: QuestionId,
    ) -> QnaResult<Option<Question>> {
        let result = with_retries(self.max_attempts, "record_view", || {
            let mut question = store
                .find_question(question_id)?
                .ok_or(QnaError::QuestionNotFound(question_id))?;
            question.views = question.views.saturating_add(1);
            store.save_question(&question)
        });

        match result {
            Ok(question) => Ok(Some(question)),
            Err(QnaError::QuestionNotFound(_)) => {
                log::debug!("view on missing question {question_id} ignored");
                Ok(None)
            }
            Err(QnaError::VersionConflict { .. }) => {
                log::warn!("view on question {question_id} dropped after repeated conflicts");
                store.find_question(question_id)
            }
            Err(e) => Err(e),
        }
    }
}

impl Default for ViewCounter {
    fn default() -> Self {
        Self::from_config(&HubConfig::default())
    }
}

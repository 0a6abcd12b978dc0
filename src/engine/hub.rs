//! The hub facade. One entry point composing listing, projection, engagement
//! and view counting over a single store, plus the author-side operations.

use std::collections::BTreeSet;

use crate::config::HubConfig;
use crate::store::{ContentStore, ViewerStore};
use crate::types::{
    now_micros, require_text, Answer, QnaError, QnaResult, Question, QuestionId, QuestionPatch,
    Viewer, ViewerId, MAX_TEXT_SIZE,
};

use super::engagement::{EngagementEngine, VoteOutcome};
use super::listing::{ListingFilter, ListingQuery, Page};
use super::projection::{QuestionView, ViewProjector};
use super::views::ViewCounter;
use super::with_retries;

/// Maximum number of questions returned by [`QuestionHub::authored_by`].
pub const AUTHORED_LIMIT: usize = 100;

/// Request-level operations over a store.
pub struct QuestionHub<S> {
    store: S,
    engagement: EngagementEngine,
    listing: ListingQuery,
    projector: ViewProjector,
    views: ViewCounter,
    max_attempts: u32,
}

impl<S: ContentStore + ViewerStore> QuestionHub<S> {
    /// Create a hub over a store.
    pub fn new(store: S, config: &HubConfig) -> Self {
        Self {
            store,
            engagement: EngagementEngine::from_config(config),
            listing: ListingQuery::from_config(config),
            projector: ViewProjector::new(),
            views: ViewCounter::from_config(config),
            max_attempts: config.max_write_retries.max(1),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the hub, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }

    // ==================== Viewers ====================

    /// Register a new viewer with empty engagement state.
    pub fn register_viewer(&self, username: &str) -> QnaResult<Viewer> {
        let viewer = self.store.insert_viewer(Viewer::new(username)?)?;
        log::info!("registered viewer {} ({})", viewer.id, viewer.username);
        Ok(viewer)
    }

    /// Look up a viewer.
    pub fn viewer(&self, viewer_id: ViewerId) -> QnaResult<Viewer> {
        self.store
            .find_viewer(viewer_id)?
            .ok_or(QnaError::ViewerNotFound(viewer_id))
    }

    // ==================== Reading ====================

    /// One page of questions, annotated for `viewer_id` when given.
    pub fn browse(
        &self,
        viewer_id: Option<ViewerId>,
        filter: &ListingFilter,
    ) -> QnaResult<Page<QuestionView>> {
        let page = self.listing.list(&self.store, filter)?;
        self.projector.project_page(&self.store, page, viewer_id)
    }

    /// Look up a question without counting a view.
    pub fn get_question(&self, question_id: QuestionId) -> QnaResult<Question> {
        self.store
            .find_question(question_id)?
            .ok_or(QnaError::QuestionNotFound(question_id))
    }

    /// Open a question's detail view: counts a view, then projects the
    /// updated record for `viewer_id`.
    pub fn open_question(
        &self,
        question_id: QuestionId,
        viewer_id: Option<ViewerId>,
    ) -> QnaResult<QuestionView> {
        let question = self
            .views
            .record_view(&self.store, question_id)?
            .ok_or(QnaError::QuestionNotFound(question_id))?;
        let mut projected = self
            .projector
            .project(&self.store, vec![question], viewer_id)?;
        projected
            .pop()
            .ok_or(QnaError::QuestionNotFound(question_id))
    }

    /// Count a view. Best-effort: a missing question yields `Ok(None)`.
    pub fn record_view(&self, question_id: QuestionId) -> QnaResult<Option<Question>> {
        self.views.record_view(&self.store, question_id)
    }

    /// Distinct category labels, sorted.
    pub fn categories(&self) -> QnaResult<Vec<String>> {
        self.store.categories()
    }

    /// Questions the viewer posted, newest first, annotated for that viewer.
    pub fn authored_by(&self, viewer_id: ViewerId) -> QnaResult<Vec<QuestionView>> {
        let viewer = self.viewer(viewer_id)?;
        let questions = self
            .store
            .find_questions_by_author(viewer_id, AUTHORED_LIMIT)?;
        Ok(self.projector.annotate(questions, Some(&viewer)))
    }

    /// Questions the viewer upvoted.
    pub fn upvoted_by(&self, viewer_id: ViewerId) -> QnaResult<Vec<Question>> {
        let viewer = self.viewer(viewer_id)?;
        self.questions_in(&viewer.upvoted)
    }

    /// Questions the viewer downvoted.
    pub fn downvoted_by(&self, viewer_id: ViewerId) -> QnaResult<Vec<Question>> {
        let viewer = self.viewer(viewer_id)?;
        self.questions_in(&viewer.downvoted)
    }

    /// Questions the viewer bookmarked.
    pub fn bookmarked_by(&self, viewer_id: ViewerId) -> QnaResult<Vec<Question>> {
        let viewer = self.viewer(viewer_id)?;
        self.questions_in(&viewer.bookmarks)
    }

    fn questions_in(&self, ids: &BTreeSet<QuestionId>) -> QnaResult<Vec<Question>> {
        let ids: Vec<QuestionId> = ids.iter().copied().collect();
        self.store.find_questions_by_ids(&ids)
    }

    // ==================== Engagement ====================

    /// Toggle an upvote.
    pub fn toggle_upvote(
        &self,
        question_id: QuestionId,
        viewer_id: ViewerId,
    ) -> QnaResult<VoteOutcome> {
        self.engagement
            .toggle_upvote(&self.store, question_id, viewer_id)
    }

    /// Toggle a downvote.
    pub fn toggle_downvote(
        &self,
        question_id: QuestionId,
        viewer_id: ViewerId,
    ) -> QnaResult<VoteOutcome> {
        self.engagement
            .toggle_downvote(&self.store, question_id, viewer_id)
    }

    /// Toggle a bookmark. Returns the viewer's bookmark set.
    pub fn toggle_bookmark(
        &self,
        question_id: QuestionId,
        viewer_id: ViewerId,
    ) -> QnaResult<BTreeSet<QuestionId>> {
        self.engagement
            .toggle_bookmark(&self.store, question_id, viewer_id)
    }

    // ==================== Authoring ====================

    /// Post a new question. Counters start at zero whatever the input says.
    pub fn create_question(&self, mut question: Question) -> QnaResult<Question> {
        self.viewer(question.author)?;
        question.votes = 0;
        question.views = 0;
        question.answers.clear();
        let stored = self.store.insert_question(question)?;
        log::info!(
            "viewer {} posted question {} in {}",
            stored.author,
            stored.id,
            stored.category
        );
        Ok(stored)
    }

    /// Edit a question. Only its author may edit; for anyone else the
    /// question does not exist.
    pub fn update_question(
        &self,
        question_id: QuestionId,
        author: ViewerId,
        patch: &QuestionPatch,
    ) -> QnaResult<Question> {
        with_retries(self.max_attempts, "update_question", || {
            let mut question = self.owned_question(question_id, author)?;
            patch.apply(&mut question)?;
            self.store.save_question(&question)
        })
    }

    /// Delete a question. Only its author may delete.
    pub fn delete_question(&self, question_id: QuestionId, author: ViewerId) -> QnaResult<()> {
        self.owned_question(question_id, author)?;
        if !self.store.delete_question(question_id)? {
            return Err(QnaError::QuestionNotFound(question_id));
        }
        log::info!("viewer {author} deleted question {question_id}");
        Ok(())
    }

    /// Append a community answer.
    pub fn answer_question(
        &self,
        question_id: QuestionId,
        author: ViewerId,
        text: &str,
    ) -> QnaResult<Question> {
        self.viewer(author)?;
        let text = require_text("answer", text, MAX_TEXT_SIZE)?;
        with_retries(self.max_attempts, "answer_question", || {
            let mut question = self.get_question(question_id)?;
            question.answers.push(Answer {
                author,
                text: text.clone(),
                created_at: now_micros(),
            });
            self.store.save_question(&question)
        })
    }

    fn owned_question(&self, question_id: QuestionId, author: ViewerId) -> QnaResult<Question> {
        let question = self.get_question(question_id)?;
        if question.author != author {
            return Err(QnaError::QuestionNotFound(question_id));
        }
        Ok(question)
    }
}

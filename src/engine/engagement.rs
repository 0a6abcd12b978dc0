//! Vote and bookmark toggles. The engagement engine is the only writer of question vote counters.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::{FlipDelta, HubConfig};
use crate::store::{ContentStore, ViewerStore};
use crate::types::{QnaError, QnaResult, QuestionId, ViewerId, VoteDirection};

use super::with_retries;

/// One step of the per-viewer vote state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTransition {
    /// Vote state before the toggle.
    pub from: Option<VoteDirection>,
    /// Vote state after the toggle.
    pub to: Option<VoteDirection>,
    /// Change applied to the question's vote counter.
    pub delta: i64,
}

impl VoteTransition {
    /// Compute the transition for pressing `pressed` while in state `from`.
    ///
    /// | from     | pressed | to      | delta            |
    /// |----------|---------|---------|------------------|
    /// | none     | up      | up      | +1               |
    /// | up       | up      | none    | -1               |
    /// | down     | up      | up      | +flip magnitude  |
    ///
    /// and symmetrically for `down`.
    pub fn compute(from: Option<VoteDirection>, pressed: VoteDirection, flip: FlipDelta) -> Self {
        let (to, delta) = match from {
            None => (Some(pressed), pressed.sign()),
            Some(current) if current == pressed => (None, -pressed.sign()),
            Some(_) => (Some(pressed), pressed.sign() * flip.magnitude()),
        };
        Self { from, to, delta }
    }
}

/// Result of a vote toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteOutcome {
    /// The question voted on.
    pub question_id: QuestionId,
    /// Aggregate vote counter after the toggle.
    pub votes: i64,
    /// The viewer's vote state after the toggle.
    pub my_vote: Option<VoteDirection>,
}

/// The engagement engine owns every vote-counter transition.
///
/// Each toggle reads the question and the viewer, saves the viewer's new
/// vote sets, then applies the counter delta to the question. Both saves are
/// version-checked. A conflict on the viewer restarts the toggle, up to
/// `max_attempts` times. Once the viewer is saved the delta is re-applied
/// until it lands; any other failure at that point is a `PartialWrite`.
pub struct EngagementEngine {
    flip_delta: FlipDelta,
    max_attempts: u32,
}

impl EngagementEngine {
    /// Create a new engagement engine.
    pub fn new(flip_delta: FlipDelta, max_attempts: u32) -> Self {
        Self {
            flip_delta,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Create an engine from hub configuration.
    pub fn from_config(config: &HubConfig) -> Self {
        Self::new(config.flip_delta, config.max_write_retries)
    }

    /// The configured flip policy.
    pub fn flip_delta(&self) -> FlipDelta {
        self.flip_delta
    }

    /// Toggle an upvote. Returns the new counter value and vote state.
    pub fn toggle_upvote<S>(
        &self,
        store: &S,
        question_id: QuestionId,
        viewer_id: ViewerId,
    ) -> QnaResult<VoteOutcome>
    where
        S: ContentStore + ViewerStore + ?Sized,
    {
        self.toggle_vote(store, question_id, viewer_id, VoteDirection::Up)
    }

    /// Toggle a downvote. Returns the new counter value and vote state.
    pub fn toggle_downvote<S>(
        &self,
        store: &S,
        question_id: QuestionId,
        viewer_id: ViewerId,
    ) -> QnaResult<VoteOutcome>
    where
        S: ContentStore + ViewerStore + ?Sized,
    {
        self.toggle_vote(store, question_id, viewer_id, VoteDirection::Down)
    }

    /// Flip a bookmark. Independent of vote state; returns the viewer's
    /// bookmark set after the flip.
    pub fn toggle_bookmark<S>(
        &self,
        store: &S,
        question_id: QuestionId,
        viewer_id: ViewerId,
    ) -> QnaResult<BTreeSet<QuestionId>>
    where
        S: ViewerStore + ?Sized,
    {
        let saved = with_retries(self.max_attempts, "toggle_bookmark", || {
            let mut viewer = store
                .find_viewer(viewer_id)?
                .ok_or(QnaError::ViewerNotFound(viewer_id))?;
            if !viewer.bookmarks.remove(&question_id) {
                viewer.bookmarks.insert(question_id);
            }
            store.save_viewer(&viewer)
        })?;

        log::debug!(
            "viewer {viewer_id} bookmark on question {question_id}: {}",
            saved.has_bookmark(question_id)
        );
        Ok(saved.bookmarks)
    }

    fn toggle_vote<S>(
        &self,
        store: &S,
        question_id: QuestionId,
        viewer_id: ViewerId,
        pressed: VoteDirection,
    ) -> QnaResult<VoteOutcome>
    where
        S: ContentStore + ViewerStore + ?Sized,
    {
        let transition = with_retries(self.max_attempts, "toggle_vote", || {
            if store.find_question(question_id)?.is_none() {
                return Err(QnaError::QuestionNotFound(question_id));
            }
            let mut viewer = store
                .find_viewer(viewer_id)?
                .ok_or(QnaError::ViewerNotFound(viewer_id))?;

            let transition =
                VoteTransition::compute(viewer.vote_on(question_id), pressed, self.flip_delta);
            viewer.set_vote(question_id, transition.to);
            store.save_viewer(&viewer)?;
            Ok(transition)
        })?;

        let votes = Self::apply_delta(store, question_id, viewer_id, transition.delta)?;

        log::debug!(
            "viewer {viewer_id} pressed {pressed} on question {question_id}: {:?} -> {:?} ({:+}), votes now {votes}",
            transition.from,
            transition.to,
            transition.delta
        );

        Ok(VoteOutcome {
            question_id,
            votes,
            my_vote: transition.to,
        })
    }

    /// Apply a committed transition's delta to the counter. The delta is a
    /// pure increment on a fresh read, so conflicts are retried until it lands.
    fn apply_delta<S>(
        store: &S,
        question_id: QuestionId,
        viewer_id: ViewerId,
        delta: i64,
    ) -> QnaResult<i64>
    where
        S: ContentStore + ?Sized,
    {
        let mut attempt: u64 = 1;
        loop {
            let saved = store.find_question(question_id).and_then(|found| {
                let mut question = found.ok_or(QnaError::QuestionNotFound(question_id))?;
                question.votes += delta;
                store.save_question(&question)
            });
            match saved {
                Ok(question) => return Ok(question.votes),
                Err(QnaError::VersionConflict { .. }) => {
                    log::warn!(
                        "apply_vote_delta: version conflict on question {question_id}, retrying (attempt {attempt})"
                    );
                    attempt += 1;
                }
                Err(e) => {
                    log::warn!(
                        "viewer {viewer_id} vote on question {question_id} saved but counter delta {delta} was not applied: {e}"
                    );
                    return Err(QnaError::PartialWrite(format!(
                        "vote by viewer {viewer_id} on question {question_id} recorded, counter delta {delta:+} not applied: {e}"
                    )));
                }
            }
        }
    }
}

impl Default for EngagementEngine {
    fn default() -> Self {
        Self::from_config(&HubConfig::default())
    }
}

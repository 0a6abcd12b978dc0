//! Viewer projection: annotates shared questions with one viewer's engagement state.

use serde::Serialize;

use crate::store::ViewerStore;
use crate::types::{QnaResult, Question, Viewer, ViewerId, VoteDirection};

use super::listing::Page;

/// A question as seen by one viewer. Derived on every read and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionView {
    #[serde(flatten)]
    pub question: Question,
    /// The viewer's vote on this question.
    pub my_vote: Option<VoteDirection>,
    /// Whether the viewer bookmarked this question.
    pub bookmarked: bool,
}

impl QuestionView {
    /// A view with no viewer-specific state.
    pub fn anonymous(question: Question) -> Self {
        Self {
            question,
            my_vote: None,
            bookmarked: false,
        }
    }

    /// A view annotated for `viewer`.
    pub fn for_viewer(question: Question, viewer: &Viewer) -> Self {
        let my_vote = viewer.vote_on(question.id);
        let bookmarked = viewer.has_bookmark(question.id);
        Self {
            question,
            my_vote,
            bookmarked,
        }
    }
}

/// Produces [`QuestionView`]s. Reads viewer state; writes nothing.
pub struct ViewProjector;

impl ViewProjector {
    /// Create a new projector.
    pub fn new() -> Self {
        Self
    }

    /// Annotate a batch of questions for a viewer.
    ///
    /// The viewer record is read once for the whole batch. With no viewer,
    /// or a viewer ID the store does not know, items come back unannotated.
    pub fn project<S: ViewerStore + ?Sized>(
        &self,
        store: &S,
        items: Vec<Question>,
        viewer_id: Option<ViewerId>,
    ) -> QnaResult<Vec<QuestionView>> {
        let viewer = match viewer_id {
            Some(id) => {
                let viewer = store.find_viewer(id)?;
                if viewer.is_none() {
                    log::debug!("viewer {id} not found; returning unannotated items");
                }
                viewer
            }
            None => None,
        };
        Ok(self.annotate(items, viewer.as_ref()))
    }

    /// Annotate a page, keeping its pagination state.
    pub fn project_page<S: ViewerStore + ?Sized>(
        &self,
        store: &S,
        page: Page<Question>,
        viewer_id: Option<ViewerId>,
    ) -> QnaResult<Page<QuestionView>> {
        let Page {
            items,
            next_cursor,
            has_more,
        } = page;
        Ok(Page {
            items: self.project(store, items, viewer_id)?,
            next_cursor,
            has_more,
        })
    }

    /// Annotate with an already loaded viewer record.
    pub fn annotate(&self, items: Vec<Question>, viewer: Option<&Viewer>) -> Vec<QuestionView> {
        match viewer {
            Some(viewer) => items
                .into_iter()
                .map(|q| QuestionView::for_viewer(q, viewer))
                .collect(),
            None => items.into_iter().map(QuestionView::anonymous).collect(),
        }
    }
}

impl Default for ViewProjector {
    fn default() -> Self {
        Self::new()
    }
}

//! In-memory store holding questions and viewers with secondary indexes behind a lock.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{ContentStore, QuestionScan, Snapshot, ViewerStore};
use crate::index::{AuthorIndex, CategoryIndex, TemporalIndex};
use crate::types::{
    QnaError, QnaResult, Question, QuestionId, SortKey, SortOrder, Viewer, ViewerId,
};

struct StoreState {
    questions: BTreeMap<QuestionId, Question>,
    viewers: BTreeMap<ViewerId, Viewer>,
    /// Lowercased username -> viewer ID.
    usernames: HashMap<String, ViewerId>,
    next_question_id: QuestionId,
    next_viewer_id: ViewerId,
    category_index: CategoryIndex,
    author_index: AuthorIndex,
    temporal_index: TemporalIndex,
}

impl StoreState {
    fn empty() -> Self {
        Self {
            questions: BTreeMap::new(),
            viewers: BTreeMap::new(),
            usernames: HashMap::new(),
            next_question_id: 1,
            next_viewer_id: 1,
            category_index: CategoryIndex::new(),
            author_index: AuthorIndex::new(),
            temporal_index: TemporalIndex::new(),
        }
    }

    fn index_question(&mut self, question: &Question) {
        self.category_index.add(question);
        self.author_index.add(question);
        self.temporal_index.add(question);
    }

    fn deindex_question(&mut self, question: &Question) {
        self.category_index.remove(question.id, &question.category);
        self.author_index.remove(question.id, question.author);
        self.temporal_index.remove(question.id, question.created_at);
    }
}

/// Thread-safe in-memory implementation of [`ContentStore`] and [`ViewerStore`].
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::empty()),
        }
    }

    /// Create from a snapshot, rebuilding all indexes.
    pub fn from_snapshot(snapshot: Snapshot) -> QnaResult<Self> {
        let mut state = StoreState::empty();

        for viewer in snapshot.viewers {
            if viewer.upvoted.intersection(&viewer.downvoted).next().is_some() {
                return Err(QnaError::Validation(format!(
                    "viewer {} has overlapping vote sets",
                    viewer.id
                )));
            }
            let key = viewer.username.to_lowercase();
            if state.usernames.insert(key, viewer.id).is_some() {
                return Err(QnaError::Validation(format!(
                    "duplicate username: {}",
                    viewer.username
                )));
            }
            let id = viewer.id;
            if state.viewers.insert(id, viewer).is_some() {
                return Err(QnaError::Corrupt(format!("duplicate viewer id {id}")));
            }
        }
        for question in snapshot.questions {
            let id = question.id;
            if state.questions.insert(id, question).is_some() {
                return Err(QnaError::Corrupt(format!("duplicate question id {id}")));
            }
        }

        let questions: Vec<Question> = state.questions.values().cloned().collect();
        state.category_index.rebuild(&questions);
        state.author_index.rebuild(&questions);
        state.temporal_index.rebuild(&questions);

        let max_question = state.questions.keys().next_back().copied().unwrap_or(0);
        let max_viewer = state.viewers.keys().next_back().copied().unwrap_or(0);
        state.next_question_id = snapshot.next_question_id.max(max_question + 1);
        state.next_viewer_id = snapshot.next_viewer_id.max(max_viewer + 1);

        Ok(Self {
            state: RwLock::new(state),
        })
    }

    /// Copy out the full store contents.
    pub fn snapshot(&self) -> QnaResult<Snapshot> {
        let state = self.read()?;
        Ok(Snapshot {
            next_question_id: state.next_question_id,
            next_viewer_id: state.next_viewer_id,
            questions: state.questions.values().cloned().collect(),
            viewers: state.viewers.values().cloned().collect(),
        })
    }

    /// Number of questions.
    pub fn question_count(&self) -> QnaResult<usize> {
        Ok(self.read()?.questions.len())
    }

    /// Number of viewers.
    pub fn viewer_count(&self) -> QnaResult<usize> {
        Ok(self.read()?.viewers.len())
    }

    /// Number of distinct authors with at least one question.
    pub fn author_count(&self) -> QnaResult<usize> {
        Ok(self.read()?.author_index.author_count())
    }

    fn read(&self) -> QnaResult<RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|_| QnaError::StoreUnavailable("store lock poisoned".into()))
    }

    fn write(&self) -> QnaResult<RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|_| QnaError::StoreUnavailable("store lock poisoned".into()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentStore for MemoryStore {
    fn find_question(&self, id: QuestionId) -> QnaResult<Option<Question>> {
        Ok(self.read()?.questions.get(&id).cloned())
    }

    fn find_questions(&self, scan: &QuestionScan) -> QnaResult<Vec<Question>> {
        let state = self.read()?;
        if scan.limit == 0 {
            return Ok(Vec::new());
        }

        if scan.sort == SortOrder::Newest {
            // Walk the temporal index from the cursor; stops as soon as the page is full.
            let after = scan.after.as_ref().and_then(|p| match p.key {
                SortKey::CreatedAt(ts) => Some((ts, p.id)),
                _ => None,
            });
            let mut result = Vec::with_capacity(scan.limit);
            for id in state.temporal_index.newest_after(after) {
                if let Some(question) = state.questions.get(&id) {
                    if scan.matches(question) {
                        result.push(question.clone());
                        if result.len() == scan.limit {
                            break;
                        }
                    }
                }
            }
            return Ok(result);
        }

        let mut candidates: Vec<&Question> = if scan.categories.is_empty() {
            state.questions.values().collect()
        } else {
            state
                .category_index
                .get_any(&scan.categories)
                .iter()
                .filter_map(|id| state.questions.get(id))
                .collect()
        };

        candidates.retain(|q| {
            scan.matches(q)
                && scan
                    .after
                    .as_ref()
                    .map_or(true, |position| scan.sort.is_after(q, position))
        });
        candidates.sort_by(|a, b| scan.sort.compare(a, b));
        candidates.truncate(scan.limit);

        Ok(candidates.into_iter().cloned().collect())
    }

    fn find_questions_by_ids(&self, ids: &[QuestionId]) -> QnaResult<Vec<Question>> {
        let state = self.read()?;
        Ok(ids
            .iter()
            .filter_map(|id| state.questions.get(id).cloned())
            .collect())
    }

    fn find_questions_by_author(
        &self,
        author: ViewerId,
        limit: usize,
    ) -> QnaResult<Vec<Question>> {
        let state = self.read()?;
        let mut questions: Vec<&Question> = state
            .author_index
            .get(author)
            .iter()
            .filter_map(|id| state.questions.get(id))
            .collect();
        questions.sort_by(|a, b| SortOrder::Newest.compare(a, b));
        Ok(questions.into_iter().take(limit).cloned().collect())
    }

    fn insert_question(&self, mut question: Question) -> QnaResult<Question> {
        question.validate()?;
        let mut state = self.write()?;

        question.id = state.next_question_id;
        question.version = 0;
        state.next_question_id += 1;

        state.index_question(&question);
        state.questions.insert(question.id, question.clone());
        Ok(question)
    }

    fn save_question(&self, question: &Question) -> QnaResult<Question> {
        let mut state = self.write()?;
        let stored = state
            .questions
            .get(&question.id)
            .ok_or(QnaError::QuestionNotFound(question.id))?;
        if stored.version != question.version {
            return Err(QnaError::VersionConflict {
                entity: "question",
                id: question.id,
            });
        }

        let previous = stored.clone();
        let mut updated = question.clone();
        updated.version = previous.version + 1;

        if previous.category != updated.category
            || previous.author != updated.author
            || previous.created_at != updated.created_at
        {
            state.deindex_question(&previous);
            state.index_question(&updated);
        }
        state.questions.insert(updated.id, updated.clone());
        Ok(updated)
    }

    fn delete_question(&self, id: QuestionId) -> QnaResult<bool> {
        let mut state = self.write()?;
        match state.questions.remove(&id) {
            Some(question) => {
                state.deindex_question(&question);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn categories(&self) -> QnaResult<Vec<String>> {
        Ok(self.read()?.category_index.categories())
    }
}

impl ViewerStore for MemoryStore {
    fn find_viewer(&self, id: ViewerId) -> QnaResult<Option<Viewer>> {
        Ok(self.read()?.viewers.get(&id).cloned())
    }

    fn find_viewer_by_username(&self, username: &str) -> QnaResult<Option<Viewer>> {
        let state = self.read()?;
        Ok(state
            .usernames
            .get(&username.trim().to_lowercase())
            .and_then(|id| state.viewers.get(id))
            .cloned())
    }

    fn insert_viewer(&self, mut viewer: Viewer) -> QnaResult<Viewer> {
        let mut state = self.write()?;
        let key = viewer.username.to_lowercase();
        if state.usernames.contains_key(&key) {
            return Err(QnaError::Validation(format!(
                "username already taken: {}",
                viewer.username
            )));
        }

        viewer.id = state.next_viewer_id;
        viewer.version = 0;
        state.next_viewer_id += 1;

        state.usernames.insert(key, viewer.id);
        state.viewers.insert(viewer.id, viewer.clone());
        Ok(viewer)
    }

    fn save_viewer(&self, viewer: &Viewer) -> QnaResult<Viewer> {
        let mut state = self.write()?;
        let stored = state
            .viewers
            .get(&viewer.id)
            .ok_or(QnaError::ViewerNotFound(viewer.id))?;
        if stored.version != viewer.version {
            return Err(QnaError::VersionConflict {
                entity: "viewer",
                id: viewer.id,
            });
        }
        if stored.username.to_lowercase() != viewer.username.to_lowercase() {
            return Err(QnaError::Validation("username cannot be changed".into()));
        }

        let mut updated = viewer.clone();
        updated.version = stored.version + 1;
        state.viewers.insert(updated.id, updated.clone());
        Ok(updated)
    }
}

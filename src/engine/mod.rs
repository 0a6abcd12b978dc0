//! High-level operations: engagement, listing, projection and view counting.

pub mod cursor;
pub mod engagement;
pub mod hub;
pub mod listing;
pub mod projection;
pub mod views;

pub use cursor::Cursor;
pub use engagement::{EngagementEngine, VoteOutcome, VoteTransition};
pub use hub::QuestionHub;
pub use listing::{ListingFilter, ListingQuery, Page};
pub use projection::{QuestionView, ViewProjector};
pub use views::ViewCounter;

use crate::types::{QnaError, QnaResult};

/// Run a read-modify-write closure, re-running it on version conflicts
/// until it succeeds or `max_attempts` runs have been made.
pub(crate) fn with_retries<T>(
    max_attempts: u32,
    operation: &str,
    mut op: impl FnMut() -> QnaResult<T>,
) -> QnaResult<T> {
    let mut attempt = 1;
    loop {
        match op() {
            Err(QnaError::VersionConflict { entity, id }) if attempt < max_attempts => {
                log::warn!(
                    "{operation}: version conflict on {entity} {id}, retrying ({attempt}/{max_attempts})"
                );
                attempt += 1;
            }
            result => return result,
        }
    }
}

//! Opaque pagination cursors.
//!
//! A cursor captures the sort order it was minted under together with the
//! sort-key value and id of the last item on the page. Tokens are URL-safe
//! base64 over a small JSON object, so they can travel in query strings.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::types::{QnaError, QnaResult, Question, SortOrder, SortPosition};

/// Current cursor token version.
const CURSOR_VERSION: u32 = 1;

/// Longest token accepted for decoding.
const MAX_TOKEN_LEN: usize = 1024;

#[derive(Serialize, Deserialize)]
struct CursorToken {
    v: u32,
    sort: SortOrder,
    after: SortPosition,
}

/// A decoded pagination cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    /// Sort order the cursor was minted under.
    pub sort: SortOrder,
    /// Position of the last item already returned.
    pub after: SortPosition,
}

impl Cursor {
    /// Mint a cursor pointing just past `last` under `sort`.
    pub fn after(sort: SortOrder, last: &Question) -> Self {
        Self {
            sort,
            after: SortPosition::of(sort, last),
        }
    }

    /// Encode as an opaque token.
    pub fn encode(&self) -> String {
        let token = CursorToken {
            v: CURSOR_VERSION,
            sort: self.sort,
            after: self.after.clone(),
        };
        // Serializing plain enums and integers cannot fail.
        let json = serde_json::to_vec(&token).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decode an opaque token.
    pub fn decode(token: &str) -> QnaResult<Self> {
        let token = token.trim();
        if token.is_empty() || token.len() > MAX_TOKEN_LEN {
            return Err(QnaError::InvalidCursor("malformed token".into()));
        }
        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|e| QnaError::InvalidCursor(format!("not base64: {e}")))?;
        let decoded: CursorToken = serde_json::from_slice(&bytes)
            .map_err(|e| QnaError::InvalidCursor(format!("unreadable token: {e}")))?;

        if decoded.v != CURSOR_VERSION {
            return Err(QnaError::InvalidCursor(format!(
                "unsupported cursor version {}",
                decoded.v
            )));
        }
        if decoded.after.order() != decoded.sort {
            return Err(QnaError::InvalidCursor(
                "cursor key does not match its sort order".into(),
            ));
        }

        Ok(Self {
            sort: decoded.sort,
            after: decoded.after,
        })
    }

    /// Decode a token and check it was minted under `sort`. Returns the
    /// position to resume after.
    pub fn resume(token: &str, sort: SortOrder) -> QnaResult<SortPosition> {
        let cursor = Self::decode(token)?;
        if cursor.sort != sort {
            return Err(QnaError::InvalidCursor(format!(
                "cursor was issued for sort '{}' but the request sorts by '{}'; restart pagination",
                cursor.sort, sort
            )));
        }
        Ok(cursor.after)
    }
}

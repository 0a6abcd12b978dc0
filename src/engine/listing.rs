//! Listing queries: search, category filter, sort and cursor pagination in one bounded read.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::HubConfig;
use crate::store::{ContentStore, QuestionScan};
use crate::types::{QnaError, QnaResult, Question, SortOrder, MAX_LABEL_SIZE, MAX_SEARCH_SIZE};

use super::cursor::Cursor;

/// Typed listing request.
///
/// Cursors are tied to the sort order: change `sort` (or the filter) and
/// pagination must restart with `cursor = None`.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    /// Substring to look for in the question text (case-insensitive).
    pub search: Option<String>,
    /// Category labels, OR semantics.
    pub categories: BTreeSet<String>,
    /// Sort order.
    pub sort: SortOrder,
    /// Items per page. `None` uses the configured default.
    pub page_size: Option<usize>,
    /// Token from a previous page's `next_cursor`.
    pub cursor: Option<String>,
}

impl ListingFilter {
    /// An unfiltered first page in `newest` order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search text.
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Add a category to the filter.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    /// Set the sort order.
    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Set the page size.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Resume from a cursor token.
    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// The same filter positioned at `next_cursor`.
    pub fn next_page(&self, next_cursor: Option<&str>) -> Self {
        let mut next = self.clone();
        next.cursor = next_cursor.map(str::to_string);
        next
    }
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Items on this page, in sort order.
    pub items: Vec<T>,
    /// Token for the following page; `None` when this is the last page.
    pub next_cursor: Option<String>,
    /// Whether more items follow this page.
    pub has_more: bool,
}

/// Executes listing requests against a content store.
pub struct ListingQuery {
    default_page_size: usize,
    max_page_size: usize,
}

impl ListingQuery {
    /// Create a listing query with page size bounds.
    pub fn new(default_page_size: usize, max_page_size: usize) -> Self {
        Self {
            default_page_size,
            max_page_size,
        }
    }

    /// Create from hub configuration.
    pub fn from_config(config: &HubConfig) -> Self {
        Self::new(config.default_page_size, config.max_page_size)
    }

    /// Fetch one page.
    ///
    /// Reads `page_size + 1` records strictly after the cursor; the extra
    /// record only signals that another page exists and is not returned.
    pub fn list<S: ContentStore + ?Sized>(
        &self,
        store: &S,
        filter: &ListingFilter,
    ) -> QnaResult<Page<Question>> {
        let scan = self.plan(filter)?;
        let page_size = scan.limit - 1;

        let mut items = store.find_questions(&scan)?;
        let has_more = items.len() > page_size;
        items.truncate(page_size);

        let next_cursor = if has_more {
            items
                .last()
                .map(|last| Cursor::after(filter.sort, last).encode())
        } else {
            None
        };

        log::debug!(
            "listed {} questions (sort {}, has_more {has_more})",
            items.len(),
            filter.sort
        );

        Ok(Page {
            items,
            next_cursor,
            has_more,
        })
    }

    /// Validate a filter and turn it into a store scan.
    pub fn plan(&self, filter: &ListingFilter) -> QnaResult<QuestionScan> {
        let page_size = filter.page_size.unwrap_or(self.default_page_size);
        if page_size == 0 || page_size > self.max_page_size {
            return Err(QnaError::Validation(format!(
                "page size must be between 1 and {}, got {page_size}",
                self.max_page_size
            )));
        }

        let search = filter.search.as_deref().map(str::trim).unwrap_or("");
        if search.len() > MAX_SEARCH_SIZE {
            return Err(QnaError::Validation(format!(
                "search exceeds maximum size: {} > {MAX_SEARCH_SIZE}",
                search.len()
            )));
        }

        let mut categories = BTreeSet::new();
        for category in &filter.categories {
            let label = category.trim();
            if label.is_empty() || label.len() > MAX_LABEL_SIZE {
                return Err(QnaError::Validation(format!(
                    "invalid category label: {category:?}"
                )));
            }
            categories.insert(label.to_string());
        }

        let after = match filter.cursor.as_deref() {
            Some(token) => Some(Cursor::resume(token, filter.sort)?),
            None => None,
        };

        Ok(QuestionScan {
            search: search.to_lowercase(),
            categories,
            sort: filter.sort,
            limit: page_size + 1,
            after,
        })
    }
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self::from_config(&HubConfig::default())
    }
}

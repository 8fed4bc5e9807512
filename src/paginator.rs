//! Cursor-driven traversal of message search results

use crate::error::{ExtractError, Result};
use crate::types::{MessageId, Page, SearchCursor};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info};

/// A message search service
pub trait MessageSearch {
    /// Return the page of matches for `query` starting at `cursor`
    fn search(&mut self, query: &str, cursor: &SearchCursor) -> Result<Page>;
}

impl<F> MessageSearch for F
where
    F: FnMut(&str, &SearchCursor) -> Result<Page>,
{
    fn search(&mut self, query: &str, cursor: &SearchCursor) -> Result<Page> {
        self(query, cursor)
    }
}

/// Lazily walk every message matching `query`, page by page
pub fn for_each_match<S: MessageSearch>(query: impl Into<String>, search: S) -> SearchPaginator<S> {
    SearchPaginator::new(query, search)
}

/// Iterator over the message ids of a search.
///
/// Starts at the first page and follows `next_cursor` until the service
/// returns an empty one. A paginator is consumed by iteration and cannot be
/// rewound; start a new one for a fresh traversal. The first error ends the
/// traversal.
pub struct SearchPaginator<S> {
    search: S,
    query: String,
    cursor: Option<SearchCursor>,
    sent: HashSet<SearchCursor>,
    buffered: VecDeque<MessageId>,
    pending_error: Option<ExtractError>,
    pages: usize,
}

impl<S: MessageSearch> SearchPaginator<S> {
    pub fn new(query: impl Into<String>, search: S) -> Self {
        Self {
            search,
            query: query.into(),
            cursor: Some(SearchCursor::first()),
            sent: HashSet::new(),
            buffered: VecDeque::new(),
            pending_error: None,
            pages: 0,
        }
    }

    /// Number of pages requested so far
    #[must_use]
    pub const fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// Fetch the next whole page of ids, or `None` once exhausted
    pub fn next_page(&mut self) -> Option<Result<Vec<MessageId>>> {
        if let Some(err) = self.pending_error.take() {
            return Some(Err(err));
        }

        let cursor = self.cursor.take()?;
        self.sent.insert(cursor.clone());

        let page = match self.search.search(&self.query, &cursor) {
            Ok(page) => page,
            Err(e) => return Some(Err(e)),
        };
        self.pages += 1;

        info!(
            "Processing {} messages (page {})",
            page.message_ids.len(),
            self.pages
        );

        if page.next_cursor.is_empty() {
            debug!("Search exhausted after {} pages", self.pages);
        } else if self.sent.contains(&page.next_cursor) {
            self.pending_error = Some(ExtractError::RepeatedCursor(page.next_cursor.0));
        } else {
            self.cursor = Some(page.next_cursor);
        }

        Some(Ok(page.message_ids))
    }
}

impl<S: MessageSearch> Iterator for SearchPaginator<S> {
    type Item = Result<MessageId>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(id) = self.buffered.pop_front() {
                return Some(Ok(id));
            }

            match self.next_page()? {
                Ok(ids) => self.buffered.extend(ids),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

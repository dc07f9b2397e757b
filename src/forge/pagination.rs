//! Cursor bookkeeping for queries that page several nested collections at
//! once.
//!
//! Each sub-collection owns a [`PageCursor`]. A driving loop keeps issuing
//! requests while any cursor still has pages; a collection that runs out
//! keeps its final cursor and stops contributing nodes while the others
//! continue.
use crate::{ChangelingError, Result, forge::request::Page};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    #[default]
    Pending,
    Exhausted,
}

/// Position within one paginated collection.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageCursor {
    cursor: Option<String>,
    state: CursorState,
}

impl PageCursor {
    /// Cursor to send with the next request; `None` means the first page.
    pub fn cursor(&self) -> Option<String> {
        self.cursor.clone()
    }

    pub fn has_more(&self) -> bool {
        self.state == CursorState::Pending
    }

    /// Record a received page and return the nodes that belong to the
    /// collection. Pages arriving after exhaustion contribute nothing.
    pub fn advance<T>(&mut self, page: Page<T>) -> Result<Vec<T>> {
        if !self.has_more() {
            return Ok(vec![]);
        }

        if page.has_next_page {
            let next = page.end_cursor.ok_or_else(|| {
                ChangelingError::Api(
                    "upstream reported another page without an end cursor"
                        .into(),
                )
            })?;
            self.cursor = Some(next);
        } else {
            if page.end_cursor.is_some() {
                self.cursor = page.end_cursor;
            }
            self.state = CursorState::Exhausted;
        }

        Ok(page.nodes)
    }
}

/// Cursors for `N` independently paginated collections queried together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorSet<const N: usize> {
    cursors: [PageCursor; N],
}

impl<const N: usize> Default for CursorSet<N> {
    fn default() -> Self {
        Self {
            cursors: std::array::from_fn(|_| PageCursor::default()),
        }
    }
}

impl<const N: usize> CursorSet<N> {
    pub fn cursor(&self, index: usize) -> Option<String> {
        self.cursors[index].cursor()
    }

    pub fn advance<T>(&mut self, index: usize, page: Page<T>) -> Result<Vec<T>> {
        self.cursors[index].advance(page)
    }

    /// True while at least one collection still has pages to fetch.
    pub fn has_more(&self) -> bool {
        self.cursors.iter().any(PageCursor::has_more)
    }
}

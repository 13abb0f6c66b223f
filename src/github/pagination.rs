//! Cursor-based pagination state for GraphQL connections.
//!
//! A fetch holds exactly one [`PageInfo`] at a time: the cursor of the page
//! it just consumed. The value is replaced on every page and discarded once
//! the final page is reached.

use serde::Deserialize;

/// Page position of a GraphQL connection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Opaque cursor of the last node in the page, when non-empty.
    pub end_cursor: Option<String>,
    /// Whether another page exists after this one.
    pub has_next_page: bool,
}

impl PageInfo {
    /// Creates page state from a cursor and continuation flag.
    #[must_use]
    pub const fn new(end_cursor: Option<String>, has_next_page: bool) -> Self {
        Self {
            end_cursor,
            has_next_page,
        }
    }

    /// Returns true when this is the final page.
    #[must_use]
    pub const fn is_last_page(&self) -> bool {
        !self.has_next_page
    }
}

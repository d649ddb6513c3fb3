//! Page window navigation

use serde::{Deserialize, Serialize};
use staffdesk_transport::{Filters, ListQuery};

/// Offset/limit window over a list endpoint.
///
/// Every navigation returns a new window; nothing here knows about the network.
/// `total` is passed in from the last successful load and never guessed locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
}

impl Pagination {
    /// A window at offset 0; a zero `limit` is raised to 1.
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            offset: 0,
        }
    }

    #[must_use]
    pub fn first(self) -> Self {
        Self { offset: 0, ..self }
    }

    /// Clamped at zero.
    #[must_use]
    pub fn previous(self) -> Self {
        Self {
            offset: self.offset.saturating_sub(self.limit),
            ..self
        }
    }

    /// Unconditional: stepping past the end yields an empty page rather than a clamp,
    /// since `total` may lag a concurrent mutation.
    #[must_use]
    pub fn next(self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit),
            ..self
        }
    }

    /// Start of the page holding record `total - 1`; zero when there are no records.
    #[must_use]
    pub fn last(self, total: u32) -> Self {
        let offset = match total.checked_sub(1) {
            Some(last_index) => (last_index / self.limit) * self.limit,
            None => 0,
        };
        Self { offset, ..self }
    }

    /// Jump to 1-based page `page`; page 0 is treated as page 1.
    #[must_use]
    pub fn at_page(self, page: u32) -> Self {
        Self {
            offset: page.saturating_sub(1).saturating_mul(self.limit),
            ..self
        }
    }

    /// Change the page size and go back to the first page.
    #[must_use]
    pub fn with_limit(self, limit: u32) -> Self {
        Self::new(limit)
    }

    /// 1-based page number of the window.
    pub fn page_number(self) -> u32 {
        self.offset / self.limit + 1
    }

    /// Number of pages needed for `total` records (at least 1).
    pub fn page_count(self, total: u32) -> u32 {
        total.div_ceil(self.limit).max(1)
    }

    pub fn has_previous(self) -> bool {
        self.offset > 0
    }

    pub fn has_next(self, total: u32) -> bool {
        self.offset.saturating_add(self.limit) < total
    }

    /// Query for this window with `filters`.
    pub fn to_query(self, filters: &Filters) -> ListQuery {
        ListQuery::new(self.limit, self.offset, filters.clone())
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(20)
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Server-assigned identifier shared by every record type.
pub type RecordId = i64;

/// Resource-specific list filters, keyed by query parameter name.
///
/// Ordered so that the same filters always produce the same query string.
pub type Filters = BTreeMap<String, String>;

// ============ Pagination ============

/// Offset-based window over a filtered list endpoint.
///
/// # Default
///
/// The default is `limit = 20, offset = 0` with no filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Maximum number of items in the window.
    pub limit: u32,
    /// Index of the first item in the window.
    pub offset: u32,
    /// Resource-specific filters, forwarded verbatim as query parameters.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub filters: Filters,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
            filters: Filters::new(),
        }
    }
}

impl ListQuery {
    /// Create a query for one window with the given filters.
    pub fn new(limit: u32, offset: u32, filters: Filters) -> Self {
        Self {
            limit,
            offset,
            filters,
        }
    }

    /// Flatten into `(name, value)` pairs for the query string.
    ///
    /// `limit` and `offset` always come first; a filter may not override them.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("limit".to_string(), self.limit.to_string()),
            ("offset".to_string(), self.offset.to_string()),
        ];
        pairs.extend(
            self.filters
                .iter()
                .filter(|(key, _)| key.as_str() != "limit" && key.as_str() != "offset")
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        pairs
    }
}

/// One window of a list endpoint.
///
/// `total` is the backend's count of every record matching the filters, not the
/// length of `items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// Items in the requested window.
    pub items: Vec<T>,
    /// Total number of items matching the filters.
    pub total: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u32) -> Self {
        Self { items, total }
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Convert every item, keeping `total`; stops at the first conversion error.
    pub fn try_map_items<U, E>(
        self,
        f: impl FnMut(T) -> Result<U, E>,
    ) -> Result<PaginatedResponse<U>, E> {
        let items = self.items.into_iter().map(f).collect::<Result<Vec<_>, _>>()?;
        Ok(PaginatedResponse {
            items,
            total: self.total,
        })
    }
}

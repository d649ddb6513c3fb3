//! 列表加载服务
//!
//! Fetches one page window and guards the cached list against out-of-order responses.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::traits::{Record, Transport};
use crate::types::{ListQuery, Operation, PageError, PaginatedResponse};

/// Decode one JSON record returned by the transport.
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> CoreResult<T> {
    serde_json::from_value(value).map_err(|e| CoreError::SerializationError(e.to_string()))
}

/// Paginated, filtered fetch against one transport
pub struct ListLoader {
    transport: Arc<dyn Transport>,
}

impl ListLoader {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetch and decode one window.
    pub async fn fetch<E: Record>(
        &self,
        endpoint: &str,
        query: &ListQuery,
    ) -> CoreResult<PaginatedResponse<E>> {
        log::debug!(
            "Loading {endpoint} limit={} offset={}",
            query.limit,
            query.offset
        );
        let page = self.transport.list(endpoint, query).await?;
        page.try_map_items(decode)
    }
}

/// Handle for one issued load. Only the most recently issued ticket may apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
    query: ListQuery,
}

impl LoadTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }
}

/// What happened to a finished load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Items and total were replaced
    Applied,
    /// A newer load was issued meanwhile; the response was dropped
    Stale,
    /// The load failed; the cached items are untouched
    Failed(PageError),
}

/// Locally cached page window
#[derive(Debug, Clone)]
pub struct ListState<E> {
    items: Vec<E>,
    total: u32,
    loading: bool,
    issued_seq: u64,
}

impl<E> Default for ListState<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            loading: false,
            issued_seq: 0,
        }
    }
}

impl<E> ListState<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new load; every earlier ticket becomes stale.
    pub fn begin(&mut self, query: ListQuery) -> LoadTicket {
        self.issued_seq += 1;
        self.loading = true;
        LoadTicket {
            seq: self.issued_seq,
            query,
        }
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.seq == self.issued_seq
    }

    /// Apply a finished load if its ticket is still the latest.
    ///
    /// A failure never clears the cached items.
    pub fn apply(
        &mut self,
        ticket: &LoadTicket,
        result: CoreResult<PaginatedResponse<E>>,
    ) -> LoadOutcome {
        if !self.is_current(ticket) {
            log::debug!(
                "Dropping stale list response #{} (latest is #{})",
                ticket.seq,
                self.issued_seq
            );
            return LoadOutcome::Stale;
        }
        self.loading = false;
        match result {
            Ok(page) => {
                self.items = page.items;
                self.total = page.total;
                LoadOutcome::Applied
            }
            Err(e) => {
                if e.is_expected() {
                    log::warn!("List load failed: {e}");
                } else {
                    log::error!("List load failed: {e}");
                }
                LoadOutcome::Failed(PageError::from_error(Operation::Load, &e))
            }
        }
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ErrorKind, Filters};
    use staffdesk_transport::TransportError;

    fn query(offset: u32) -> ListQuery {
        ListQuery::new(20, offset, Filters::new())
    }

    #[test]
    fn latest_ticket_applies() {
        let mut state: ListState<i64> = ListState::new();
        let ticket = state.begin(query(0));
        assert!(state.is_loading());

        let outcome = state.apply(&ticket, Ok(PaginatedResponse::new(vec![1, 2], 2)));
        assert_eq!(outcome, LoadOutcome::Applied);
        assert_eq!(state.items(), &[1, 2]);
        assert!(!state.is_loading());
    }

    #[test]
    fn out_of_order_response_is_dropped() {
        let mut state: ListState<i64> = ListState::new();
        let older = state.begin(query(20));
        let newer = state.begin(query(40));

        assert_eq!(
            state.apply(&newer, Ok(PaginatedResponse::new(vec![41], 45))),
            LoadOutcome::Applied
        );
        assert_eq!(
            state.apply(&older, Ok(PaginatedResponse::new(vec![21], 45))),
            LoadOutcome::Stale
        );
        assert_eq!(state.items(), &[41]);
    }

    #[test]
    fn loading_stays_until_latest_resolves() {
        let mut state: ListState<i64> = ListState::new();
        let older = state.begin(query(0));
        let _newer = state.begin(query(20));

        state.apply(&older, Ok(PaginatedResponse::new(vec![1], 40)));
        assert!(state.is_loading());
    }

    #[test]
    fn failure_keeps_cached_items() {
        let mut state: ListState<i64> = ListState::new();
        let first = state.begin(query(0));
        state.apply(&first, Ok(PaginatedResponse::new(vec![1, 2, 3], 3)));

        let second = state.begin(query(0));
        let outcome = state.apply(
            &second,
            Err(CoreError::Transport(TransportError::Network {
                detail: "connection reset".to_string(),
            })),
        );

        let LoadOutcome::Failed(page_error) = outcome else {
            panic!("expected a failed load");
        };
        assert_eq!(page_error.kind, ErrorKind::Connectivity);
        assert_eq!(state.items(), &[1, 2, 3]);
        assert_eq!(state.total(), 3);
        assert!(!state.is_loading());
    }
}

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::types::{ListQuery, PaginatedResponse, RecordId};

/// Authenticated round trip to the records backend.
///
/// Records cross this boundary as raw JSON; decoding into a typed entity is the
/// caller's job. Implementations own authentication forwarding, timeouts and retry
/// policy, and classify every failure into a [`TransportError`](crate::TransportError).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch one window of `endpoint` matching `query.filters`.
    async fn list(&self, endpoint: &str, query: &ListQuery) -> Result<PaginatedResponse<Value>>;

    /// Create a record and return the backend's representation of it.
    async fn create(&self, endpoint: &str, body: Value) -> Result<Value>;

    /// Replace the record `id` and return the backend's representation of it.
    async fn update(&self, endpoint: &str, id: RecordId, body: Value) -> Result<Value>;

    /// Delete the record `id`. A "no content" response is success.
    async fn delete(&self, endpoint: &str, id: RecordId) -> Result<()>;
}

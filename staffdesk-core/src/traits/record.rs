//! Cached record abstraction

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use staffdesk_transport::RecordId;

/// A server-owned entity with a stable integer id.
///
/// Decoded from the JSON the transport returns; the controller only ever holds a
/// cached copy of the current page window.
pub trait Record: DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    fn id(&self) -> RecordId;
}

//! Document store abstraction
//!
//! The engine sits in front of an arbitrary get/put/delete document store
//! and never talks to a concrete backend directly. Connection handling,
//! authentication and index lifecycle all belong to the implementor.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Opaque caller-owned document content
pub type Document = Value;

/// Suffix appended to a live index name to derive its history index
pub const HISTORY_SUFFIX: &str = "-history";

/// Reserved type under which archived snapshots are stored, disjoint from
/// any caller-chosen document type
pub const REVISION_TYPE: &str = "revision";

/// Derive the history index name for a live index
pub fn history_index(index: &str) -> String {
    format!("{index}{HISTORY_SUFFIX}")
}

/// Outcome of a put: the id the document landed under, and whether the
/// document did not exist before this call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutResponse {
    pub id: String,
    pub created: bool,
}

/// Capability required from the underlying document store
///
/// Implementations must treat each call as an independent unit; the engine
/// assumes no transactions or compare-and-swap across calls.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document; `None` is an expected state, not an error
    async fn get(&self, index: &str, doc_type: &str, id: &str) -> Result<Option<Document>>;

    /// Create or overwrite a document. With `id` absent the store allocates
    /// one; with `force_insert` the put fails if the id is already taken.
    async fn put(
        &self,
        index: &str,
        doc_type: &str,
        doc: &Document,
        id: Option<&str>,
        force_insert: bool,
    ) -> Result<PutResponse>;

    /// Remove a document; removing an absent document is a no-op
    async fn delete(&self, index: &str, doc_type: &str, id: &str) -> Result<()>;
}

//! Content-addressed snapshot archive
//!
//! Full copies of superseded document content, stored under the reserved
//! `revision` type of the history index and keyed by content digest.
//! Writing the same digest twice is harmless: content addressing
//! guarantees identical bytes.

use std::sync::Arc;

use crate::digest::ContentDigest;
use crate::error::Result;
use crate::store::{history_index, Document, DocumentStore, REVISION_TYPE};

/// Archive of past document snapshots
#[derive(Clone)]
pub struct SnapshotStore {
    store: Arc<dyn DocumentStore>,
}

impl SnapshotStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Archive a snapshot under its content digest
    pub async fn put(&self, index: &str, digest: &ContentDigest, doc: &Document) -> Result<()> {
        self.store
            .put(
                &history_index(index),
                REVISION_TYPE,
                doc,
                Some(&digest.to_hex()),
                false,
            )
            .await?;
        Ok(())
    }

    /// Fetch an archived snapshot; `None` if this digest was never
    /// archived (it may still be the live document)
    pub async fn get(&self, index: &str, digest: &ContentDigest) -> Result<Option<Document>> {
        self.store
            .get(&history_index(index), REVISION_TYPE, &digest.to_hex())
            .await
    }
}

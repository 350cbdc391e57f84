//! Per-document revision log
//!
//! One log exists per `(index, type, id)` triple, stored in the history
//! index under the same `(type, id)` key as the live document. The
//! `revisions` sequence is append-only: every entry records content that
//! was live at some point, in the order it became live. Rollback never
//! rewrites that sequence; it records the superseded forward tail in the
//! branch table and appends a fresh entry for the restored content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::digest::ContentDigest;
use crate::error::Result;
use crate::store::{history_index, DocumentStore};

/// Metadata for a single revision
///
/// Caller-supplied metadata keys are flattened alongside the engine-owned
/// `digest` and `created_at` fields; the engine-owned fields win on
/// collision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionMetadata {
    pub digest: ContentDigest,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RevisionMetadata {
    /// Build a new entry stamped with the current time
    pub fn new(digest: ContentDigest, metadata: Map<String, Value>) -> Self {
        let mut extra = metadata;
        // reserved keys: engine-assigned values take precedence
        extra.remove("digest");
        extra.remove("created_at");
        Self {
            digest,
            created_at: Utc::now(),
            extra,
        }
    }
}

/// Authoritative history record for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionLog {
    pub index: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub id: String,
    pub revisions: Vec<RevisionMetadata>,
    /// Superseded forward tails, keyed by the digest that was rolled back
    /// to. Repeated rollbacks to the same digest accumulate tails.
    #[serde(default)]
    pub branches: BTreeMap<ContentDigest, Vec<Vec<RevisionMetadata>>>,
}

impl RevisionLog {
    /// Initialize an empty log for a document that has no history yet
    pub fn new(index: &str, doc_type: &str, id: &str) -> Self {
        Self {
            index: index.to_string(),
            doc_type: doc_type.to_string(),
            id: id.to_string(),
            revisions: Vec::new(),
            branches: BTreeMap::new(),
        }
    }

    /// Fetch the log from the history index; `None` means no write has
    /// ever been recorded for this id
    pub async fn load(
        store: &dyn DocumentStore,
        index: &str,
        doc_type: &str,
        id: &str,
    ) -> Result<Option<Self>> {
        match store.get(&history_index(index), doc_type, id).await? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    /// Overwrite the stored log. Last persist wins; there is no
    /// compare-and-swap against concurrent writers.
    pub async fn persist(&self, store: &dyn DocumentStore) -> Result<()> {
        let doc = serde_json::to_value(self)?;
        store
            .put(
                &history_index(&self.index),
                &self.doc_type,
                &doc,
                Some(&self.id),
                false,
            )
            .await?;
        Ok(())
    }

    /// Append a revision entry; existing entries are never reordered
    pub fn append(&mut self, metadata: RevisionMetadata) {
        self.revisions.push(metadata);
    }

    /// Most recent entry, if any
    pub fn last(&self) -> Option<&RevisionMetadata> {
        self.revisions.last()
    }

    /// Position of a digest in the log
    ///
    /// After a rollback the same digest can appear more than once; the
    /// last occurrence reflects the effective current branch.
    pub fn find(&self, digest: &ContentDigest) -> Option<usize> {
        self.revisions.iter().rposition(|m| m.digest == *digest)
    }

    /// Copy of every entry after `position`
    pub fn tail_after(&self, position: usize) -> Vec<RevisionMetadata> {
        self.revisions[position + 1..].to_vec()
    }

    /// Record a superseded tail under the digest it was rolled back to
    pub fn record_branch(&mut self, digest: ContentDigest, tail: Vec<RevisionMetadata>) {
        self.branches.entry(digest).or_default().push(tail);
    }
}

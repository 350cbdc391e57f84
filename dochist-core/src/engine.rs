//! History-tracking engine
//!
//! Orchestrates the live document, its revision log and the snapshot
//! archive. Every mutation goes through [`HistoryEngine::write`], which
//! keeps the three in agreement without any transaction support from the
//! underlying store: the live write lands first, then the log, then the
//! snapshot of whatever content was just superseded.
//!
//! Two concurrent writers to the same id race on the log read-modify-write
//! and the last persist wins; callers needing strict serialization must
//! serialize writes per id externally.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::diff::unified_diff;
use crate::digest::ContentDigest;
use crate::error::{HistoryError, Result};
use crate::log::{RevisionLog, RevisionMetadata};
use crate::snapshot::SnapshotStore;
use crate::store::{Document, DocumentStore, PutResponse};

/// Metadata key stamped onto the revision a rollback creates, recording
/// the digest that was live before the rollback
pub const ROLLED_BACK_FROM_KEY: &str = "rolled_back_from";

/// Revision-history engine over an arbitrary document store
#[derive(Clone)]
pub struct HistoryEngine {
    store: Arc<dyn DocumentStore>,
    snapshots: SnapshotStore,
}

impl HistoryEngine {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let snapshots = SnapshotStore::new(store.clone());
        Self { store, snapshots }
    }

    /// Write a document and record the revision
    ///
    /// The live write happens first; if it fails, no history is touched.
    /// If a later step fails the error is wrapped in
    /// [`HistoryError::HistoryWriteFailed`]: the live document has
    /// advanced but the log has not recorded it. Retrying the whole call
    /// is safe for the stores involved but appends a duplicate metadata
    /// entry for the same content.
    ///
    /// `metadata` is a fresh caller-owned map per call; its keys are
    /// flattened into the revision entry (`digest` and `created_at` are
    /// reserved and overwritten by the engine).
    pub async fn write(
        &self,
        index: &str,
        doc_type: &str,
        id: Option<&str>,
        doc: &Document,
        metadata: Map<String, Value>,
        force_insert: bool,
    ) -> Result<PutResponse> {
        // the content being superseded, absent on first write
        let previous = match id {
            Some(id) => self.store.get(index, doc_type, id).await?,
            None => None,
        };

        let outcome = self
            .store
            .put(index, doc_type, doc, id, force_insert)
            .await?;

        self.record(index, doc_type, &outcome.id, doc, metadata, previous)
            .await
            .map_err(|e| HistoryError::HistoryWriteFailed(Box::new(e)))?;

        Ok(outcome)
    }

    /// Log the new revision and archive the superseded content
    async fn record(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        doc: &Document,
        metadata: Map<String, Value>,
        previous: Option<Document>,
    ) -> Result<()> {
        let mut log = RevisionLog::load(self.store.as_ref(), index, doc_type, id)
            .await?
            .unwrap_or_else(|| RevisionLog::new(index, doc_type, id));

        let digest = ContentDigest::compute(doc);
        log.append(RevisionMetadata::new(digest, metadata));
        log.persist(self.store.as_ref()).await?;

        tracing::debug!(index, doc_type, id, digest = %digest, "recorded revision");

        // Lazy snapshot policy: content is archived only once superseded.
        // The previous content is keyed by its own digest, which for a
        // plain overwrite equals the second-to-last log entry's digest;
        // computing it directly also covers rollback re-indexing, where
        // the superseded content is not the preceding log entry.
        if let Some(previous) = previous {
            let prev_digest = ContentDigest::compute(&previous);
            self.snapshots.put(index, &prev_digest, &previous).await?;
        }

        Ok(())
    }

    /// Fetch the revision log for a document
    pub async fn history(&self, index: &str, doc_type: &str, id: &str) -> Result<RevisionLog> {
        RevisionLog::load(self.store.as_ref(), index, doc_type, id)
            .await?
            .ok_or_else(|| HistoryError::HistoryNotFound {
                index: index.to_string(),
                doc_type: doc_type.to_string(),
                id: id.to_string(),
            })
    }

    /// Resolve a revision digest to its full document content
    ///
    /// The most recent revision is read straight from the live document
    /// (its content is never duplicated into the archive while it stays
    /// current); anything older comes from the snapshot archive.
    pub async fn revision(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        digest: &ContentDigest,
    ) -> Result<Document> {
        let log = RevisionLog::load(self.store.as_ref(), index, doc_type, id).await?;
        if let Some(log) = &log {
            if log.last().map(|m| m.digest) == Some(*digest) {
                if let Some(doc) = self.store.get(index, doc_type, id).await? {
                    return Ok(doc);
                }
            }
        }

        self.snapshots
            .get(index, digest)
            .await?
            .ok_or(HistoryError::RevisionNotFound(*digest))
    }

    /// Unified diff between two revisions of a document, labeled by digest
    pub async fn diff(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        digest_a: &ContentDigest,
        digest_b: &ContentDigest,
    ) -> Result<String> {
        let doc_a = self.revision(index, doc_type, id, digest_a).await?;
        let doc_b = self.revision(index, doc_type, id, digest_b).await?;
        Ok(unified_diff(
            &doc_a,
            &doc_b,
            &digest_a.to_hex(),
            &digest_b.to_hex(),
        ))
    }

    /// Restore a prior revision as the current document
    ///
    /// The forward tail it supersedes is preserved under
    /// `branches[target]`, then the target content is re-indexed through
    /// the full write path. History stays an append-only record of what
    /// was live when: the log gains a fresh entry whose digest equals the
    /// target's, it never points back to the old one.
    pub async fn rollback(
        &self,
        index: &str,
        doc_type: &str,
        id: &str,
        target: &ContentDigest,
    ) -> Result<()> {
        let mut log = RevisionLog::load(self.store.as_ref(), index, doc_type, id)
            .await?
            .ok_or(HistoryError::UnknownRevision(*target))?;

        let position = log
            .find(target)
            .ok_or(HistoryError::UnknownRevision(*target))?;
        if position == log.revisions.len() - 1 {
            return Err(HistoryError::NothingToRollback);
        }

        // Resolve before recording the branch: the target is not the log
        // tip here, so this reads the archived snapshot, not the live doc.
        let content = self.revision(index, doc_type, id, target).await?;

        let superseded_tip = log
            .last()
            .map(|m| m.digest)
            .ok_or(HistoryError::UnknownRevision(*target))?;
        let tail = log.tail_after(position);
        log.record_branch(*target, tail);
        log.persist(self.store.as_ref()).await?;

        tracing::debug!(
            index,
            doc_type,
            id,
            target = %target,
            from = %superseded_tip,
            "rolled back"
        );

        let mut metadata = Map::new();
        metadata.insert(
            ROLLED_BACK_FROM_KEY.to_string(),
            Value::String(superseded_tip.to_hex()),
        );
        self.write(index, doc_type, Some(id), &content, metadata, false)
            .await?;
        Ok(())
    }
}

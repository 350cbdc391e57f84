//! Dochist Core Library
//!
//! Revision-history layer for an arbitrary document store:
//! - Content digests (SHA-1 over canonical key-sorted JSON)
//! - Per-document revision logs with branch preservation
//! - Content-addressed snapshot archive in a derived history index
//! - Point-in-time retrieval and unified diffs between revisions
//! - Rollback that restores prior content as a fresh revision
//! - In-memory document store for tests and small embeddings

pub mod diff;
pub mod digest;
pub mod engine;
pub mod error;
pub mod log;
pub mod memory;
pub mod snapshot;
pub mod store;

pub use digest::ContentDigest;
pub use engine::{HistoryEngine, ROLLED_BACK_FROM_KEY};
pub use error::{HistoryError, Result};
pub use log::{RevisionLog, RevisionMetadata};
pub use memory::MemoryStore;
pub use snapshot::SnapshotStore;
pub use store::{history_index, Document, DocumentStore, PutResponse, HISTORY_SUFFIX, REVISION_TYPE};

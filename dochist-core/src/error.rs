//! Error taxonomy for history operations

use crate::digest::ContentDigest;

/// Result type for history operations
pub type Result<T> = std::result::Result<T, HistoryError>;

/// Errors that can occur during history operations
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("document store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("document already exists: {index}/{doc_type}/{id}")]
    AlreadyExists {
        index: String,
        doc_type: String,
        id: String,
    },

    #[error("no history recorded for {index}/{doc_type}/{id}")]
    HistoryNotFound {
        index: String,
        doc_type: String,
        id: String,
    },

    #[error("revision not found: {0}")]
    RevisionNotFound(ContentDigest),

    #[error("document has no revision {0}")]
    UnknownRevision(ContentDigest),

    #[error("cannot roll back to the current revision")]
    NothingToRollback,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    /// The live document was updated but one of the follow-up history
    /// mutations failed. The live write is not undone; the wrapped error
    /// describes which history step broke.
    #[error("live document written but history update failed: {0}")]
    HistoryWriteFailed(#[source] Box<HistoryError>),
}

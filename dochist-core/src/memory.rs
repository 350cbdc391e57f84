//! In-memory document store
//!
//! Backs the test suite and small embeddings; production deployments are
//! expected to implement [`DocumentStore`] over a real backend.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::{HistoryError, Result};
use crate::store::{Document, DocumentStore, PutResponse};

type DocKey = (String, String, String);

/// In-memory `DocumentStore` keyed by `(index, type, id)`
#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<HashMap<DocKey, Document>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents held across all indices
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, index: &str, doc_type: &str, id: &str) -> Result<Option<Document>> {
        let key = (index.to_string(), doc_type.to_string(), id.to_string());
        Ok(self.docs.read().await.get(&key).cloned())
    }

    async fn put(
        &self,
        index: &str,
        doc_type: &str,
        doc: &Document,
        id: Option<&str>,
        force_insert: bool,
    ) -> Result<PutResponse> {
        let id = match id {
            Some(id) => id.to_string(),
            None => uuid::Uuid::new_v4().to_string(),
        };
        let key = (index.to_string(), doc_type.to_string(), id.clone());

        let mut docs = self.docs.write().await;
        let existed = docs.contains_key(&key);
        if existed && force_insert {
            return Err(HistoryError::AlreadyExists {
                index: index.to_string(),
                doc_type: doc_type.to_string(),
                id,
            });
        }
        docs.insert(key, doc.clone());

        Ok(PutResponse {
            id,
            created: !existed,
        })
    }

    async fn delete(&self, index: &str, doc_type: &str, id: &str) -> Result<()> {
        let key = (index.to_string(), doc_type.to_string(), id.to_string());
        self.docs.write().await.remove(&key);
        Ok(())
    }
}

// In-memory document store
// Drop-in replacement for the file store, used in tests

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::DocumentStore;
use crate::error::StoreError;

#[derive(Default)]
pub struct MemoryStore {
    document: RwLock<Option<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(&self) -> Result<Option<Value>, StoreError> {
        Ok(self.document.read().await.clone())
    }

    async fn write(&self, value: &Value) -> Result<(), StoreError> {
        *self.document.write().await = Some(value.clone());
        Ok(())
    }
}

//! Document store module
//!
//! Persists a single JSON document. Absence is a normal state: `read`
//! returns `Ok(None)` until the first successful `write`.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;

/// Storage backend for the single stored document
///
/// Writes overwrite the previous document; there is no merge or versioning.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the stored document, `None` when nothing has been written yet
    async fn read(&self) -> Result<Option<Value>, StoreError>;

    /// Replace the stored document with `value`
    async fn write(&self, value: &Value) -> Result<(), StoreError>;
}

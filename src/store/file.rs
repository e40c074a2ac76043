// File-backed document store
// Keeps the document as pretty-printed JSON in a single file

use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::DocumentStore;
use crate::error::StoreError;
use crate::logger;

/// Single-file JSON store
///
/// Writers inside one process are serialized so two requests never interleave
/// bytes in the file. Separate processes sharing the file still race, last
/// write wins. Writes are not atomic: a crash mid-write can truncate the file.
pub struct FileStore {
    /// Path to the data file
    path: PathBuf,
    /// Held for the duration of a write
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn read(&self) -> Result<Option<Value>, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(StoreError::Corrupt)
    }

    async fn write(&self, value: &Value) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(value).map_err(StoreError::Encode)?;

        let _guard = self.write_lock.lock().await;
        tokio::fs::write(&self.path, content).await?;
        logger::log_debug(&format!(
            "Stored document written to {}",
            self.path.display()
        ));
        Ok(())
    }
}

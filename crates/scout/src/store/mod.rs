//! Key-value option storage shared by the purge trigger and the notice renderer.

mod file;
mod memory;

pub use file::FileOptionStore;
pub use memory::MemoryOptionStore;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("option store io: {0}")]
    Io(#[from] std::io::Error),
    #[error("option store serialization: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Named JSON options. An absent key reads as `None`.
#[async_trait]
pub trait OptionStore: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<Value>>;
    async fn put(&self, key: &str, value: Value) -> Result<()>;
    /// Removing a key that does not exist is not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

#[async_trait]
impl<T: OptionStore> OptionStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        (**self).get(key).await
    }

    async fn put(&self, key: &str, value: Value) -> Result<()> {
        (**self).put(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key).await
    }
}

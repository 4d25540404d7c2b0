//! The flash notice queue.
//!
//! Notices are appended by the purge trigger and drained by whichever page
//! load comes next. The whole list lives under a single option key.

use crate::{
    notice::Notice,
    store::{OptionStore, Result},
};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub const DEFAULT_NOTICE_KEY: &str = "cloudabove_scout_flash_notices";

pub struct NoticeQueue<S> {
    store: S,
    key: String,
    // Serializes the read-modify-write cycles of enqueue and drain.
    lock: Mutex<()>,
}

impl<S: OptionStore> NoticeQueue<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_NOTICE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// A slot that does not decode as a notice list reads as empty, so the
    /// next enqueue overwrites it instead of failing forever.
    async fn load(&self) -> Result<Vec<Notice>> {
        match self.store.get(&self.key).await? {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => match serde_json::from_value(value) {
                Ok(notices) => Ok(notices),
                Err(e) => {
                    warn!("Discarding undecodable notices under {}: {e}", self.key);
                    Ok(Vec::new())
                }
            },
        }
    }

    /// Appends a notice and returns the queue length afterwards.
    pub async fn enqueue(&self, notice: Notice) -> Result<usize> {
        let _guard = self.lock.lock().await;
        let mut notices = self.load().await?;
        notices.push(notice);
        self.store
            .put(&self.key, serde_json::to_value(&notices)?)
            .await?;
        debug!("Queued notice, {} pending", notices.len());
        Ok(notices.len())
    }

    /// Pending notices without clearing them.
    pub async fn pending(&self) -> Result<Vec<Notice>> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    /// Takes every pending notice in insertion order and clears the slot.
    /// An empty slot is left untouched.
    pub async fn drain(&self) -> Result<Vec<Notice>> {
        let _guard = self.lock.lock().await;
        let notices = self.load().await?;
        if !notices.is_empty() {
            self.store.delete(&self.key).await?;
            debug!("Drained {} notice(s)", notices.len());
        }
        Ok(notices)
    }

    pub async fn drain_and_render(&self) -> Result<Vec<String>> {
        Ok(self.drain().await?.iter().map(Notice::render).collect())
    }
}

//! Remote cache purge.

pub mod client;
pub mod trigger;

pub use client::HttpPurgeClient;
pub use trigger::{PurgeTrigger, Redirect};

use crate::notice::Notice;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_SCOUT_URL: &str = "https://scout.cloudabove.com/api/";
pub const DEFAULT_TIMEOUT_MS: u64 = 2_000;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PurgeError {
    /// Scout answered with something other than 200.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// Timeout, DNS failure, refused connection and the like.
    #[error("{0}")]
    Transport(String),
    /// The body was not the `{"message": ...}` document Scout sends.
    #[error("malformed response (HTTP {status}): {detail}")]
    MalformedResponse { status: u16, detail: String },
}

impl PurgeError {
    pub fn into_notice(self) -> Notice {
        match self {
            PurgeError::Rejected { message, .. } => Notice::error(format!("Error: {message}")),
            PurgeError::Transport(reason) => Notice::error(format!("Exception: {reason}")),
            malformed @ PurgeError::MalformedResponse { .. } => {
                Notice::error(format!("Error: {malformed}"))
            }
        }
    }
}

/// Issues one purge against the remote cache and returns its message.
#[async_trait]
pub trait PurgeClient: Send + Sync + 'static {
    async fn purge(&self) -> Result<String, PurgeError>;
}

#[async_trait]
impl<T: PurgeClient> PurgeClient for Arc<T> {
    async fn purge(&self) -> Result<String, PurgeError> {
        (**self).purge().await
    }
}

/// Turns a purge outcome into the notice the operator sees.
pub fn outcome_notice(outcome: Result<String, PurgeError>) -> Notice {
    match outcome {
        Ok(message) => Notice::success(message),
        Err(e) => e.into_notice(),
    }
}

use super::{PurgeClient, PurgeError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    StatusCode, Url,
};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

const PURGE_PATH: &str = "cache/purge";

#[derive(Deserialize)]
struct PurgeResponse {
    message: String,
}

/// Talks to the Scout HTTP API.
#[derive(Clone, Debug)]
pub struct HttpPurgeClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpPurgeClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        // `Url::join` drops the last segment unless the base ends with a slash.
        let base = if base_url.ends_with('/') {
            Url::parse(base_url)
        } else {
            Url::parse(&format!("{base_url}/"))
        }
        .with_context(|| format!("Invalid Scout base url: {base_url}"))?;
        let endpoint = base
            .join(PURGE_PATH)
            .with_context(|| format!("Failed to build purge url from: {base}"))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .context("Failed to build http client")?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PurgeClient for HttpPurgeClient {
    async fn purge(&self) -> Result<String, PurgeError> {
        info!("Sending purge request to {}", self.endpoint);
        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| PurgeError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| PurgeError::Transport(e.to_string()))?;
        debug!("Scout answered {status} with {} bytes", body.len());

        let message = serde_json::from_slice::<PurgeResponse>(&body)
            .map(|response| response.message)
            .map_err(|e| PurgeError::MalformedResponse {
                status: status.as_u16(),
                detail: e.to_string(),
            })?;

        if status == StatusCode::OK {
            Ok(message)
        } else {
            Err(PurgeError::Rejected {
                status: status.as_u16(),
                message,
            })
        }
    }
}

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::ObjectStore;
use crate::error::{Error, Result};

/// HTTP client for the platform's blob storage service.
pub struct HttpObjectStore {
    http_client: Client,
    base_url: String,
}

impl HttpObjectStore {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let url = format!("{}/{}/{}", self.base_url, bucket, key);

        tracing::debug!("Fetching object: {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::UpstreamUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::UpstreamInvocationFailed(format!(
                "object {}/{} fetch returned {}: {}",
                bucket, key, status, body
            )));
        }

        let raw = response
            .bytes()
            .await
            .map_err(|e| Error::UpstreamUnavailable(e.to_string()))?;

        Ok(raw.to_vec())
    }
}

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Client;

use super::{EndpointClient, TransformJobClient, TransformJobDescription};
use crate::error::{Error, Result};

/// HTTP client for the managed inference platform's REST API.
///
/// Covers both surfaces the gateway needs: synchronous endpoint invocation
/// and transform-job description.
pub struct HttpPlatformClient {
    http_client: Client,
    base_url: String,
}

impl HttpPlatformClient {
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
impl EndpointClient for HttpPlatformClient {
    async fn invoke(
        &self,
        endpoint_name: &str,
        payload: &[u8],
        content_type: &str,
    ) -> Result<Vec<u8>> {
        let url = format!("{}/endpoints/{}/invocations", self.base_url, endpoint_name);

        // Header values come from config or from a blob body, so they can be
        // arbitrary bytes. Reject anything the wire format cannot carry.
        let content_type = HeaderValue::from_str(content_type).map_err(|_| {
            Error::InvalidRequest(format!("invalid content type: {:?}", content_type))
        })?;

        tracing::debug!("Invoking endpoint: {}", url);

        let response = self
            .http_client
            .post(&url)
            .header(CONTENT_TYPE, content_type)
            .body(payload.to_vec())
            .send()
            .await
            .map_err(|e| Error::UpstreamUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::UpstreamInvocationFailed(format!(
                "endpoint {} returned {}: {}",
                endpoint_name, status, body
            )));
        }

        let raw = response
            .bytes()
            .await
            .map_err(|e| Error::UpstreamUnavailable(e.to_string()))?;

        Ok(raw.to_vec())
    }
}

#[async_trait]
impl TransformJobClient for HttpPlatformClient {
    async fn describe_job(&self, name: &str) -> Result<TransformJobDescription> {
        let url = format!("{}/transform-jobs/{}", self.base_url, name);

        tracing::debug!("Describing transform job: {}", url);

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
                "transform job {} lookup returned {}: {}",
                name, status, body
            )));
        }

        let description: TransformJobDescription = response
            .json()
            .await
            .map_err(|e| Error::SerializationError(e.to_string()))?;

        Ok(description)
    }
}

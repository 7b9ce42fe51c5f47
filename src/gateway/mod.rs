//! Invocation gateway for the managed inference platform.
//!
//! This module holds the request/response orchestration: extracting the
//! scoring payload from an incoming event (or from deployment configuration),
//! forwarding it to the named endpoint, and relaying transform-job status
//! lookups. All platform traffic goes through the `upstream` trait seam so
//! the gateway can be exercised with injected fakes.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::upstream::{EndpointClient, ObjectStore, TransformJobClient, TransformJobDescription};

/// Incoming invocation event.
///
/// The `body` field carries a serialized JSON container whose `data` field
/// holds the payload to score (request mode); the blob-metadata profile
/// ignores it.
#[derive(Debug, Clone, Deserialize)]
pub struct InvocationEvent {
    #[serde(default)]
    pub body: Option<String>,
}

/// Result envelope returned to the caller: a fixed success status code and
/// the endpoint output decoded as JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: Value,
}

/// Transform-job status query.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusQuery {
    pub name: String,
}

/// Transform-job status as reported by the platform.
///
/// The status string is passed through uninterpreted; the gateway neither
/// validates nor restricts the platform's status vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusResult {
    pub status: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

/// Where the scoring payload and content-type come from, resolved from
/// deployment configuration at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSource {
    /// Payload from the event body's `data` field, content type from config.
    Request { content_type: String },
    /// Payload from config, content type from the body of a blob-storage
    /// object. The object body is used verbatim as the content-type value.
    BlobMetadata {
        bucket: String,
        key: String,
        input_data: String,
    },
}

/// Bounded retry for transient upstream faults.
///
/// Only `UpstreamUnavailable` results are retried; the delay doubles on each
/// attempt. The default budget of zero keeps the gateway at exactly one
/// endpoint call per invocation.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }

    fn delay(&self, attempt: u32) -> Duration {
        self.backoff * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// Synchronous invocation gateway.
///
/// Holds no state across invocations beyond the injected clients and the
/// read-only deployment wiring.
pub struct Gateway {
    endpoint_name: String,
    source: PayloadSource,
    retry: RetryPolicy,
    endpoint: Arc<dyn EndpointClient>,
    store: Arc<dyn ObjectStore>,
    jobs: Arc<dyn TransformJobClient>,
}

impl Gateway {
    pub fn new(
        endpoint_name: String,
        source: PayloadSource,
        retry: RetryPolicy,
        endpoint: Arc<dyn EndpointClient>,
        store: Arc<dyn ObjectStore>,
        jobs: Arc<dyn TransformJobClient>,
    ) -> Self {
        Self {
            endpoint_name,
            source,
            retry,
            endpoint,
            store,
            jobs,
        }
    }

    /// Forward one scoring request to the configured endpoint.
    ///
    /// Payload extraction happens before any outbound call, so a malformed
    /// event fails without side effects. The endpoint response is decoded as
    /// JSON and wrapped in the success envelope.
    pub async fn invoke(&self, event: InvocationEvent) -> Result<InvocationResponse> {
        let (payload, content_type) = self.resolve_payload(&event).await?;

        let raw = self.invoke_endpoint(&payload, &content_type).await?;

        let body: Value = serde_json::from_slice(&raw).map_err(|e| {
            Error::SerializationError(format!("endpoint response is not valid JSON: {}", e))
        })?;

        tracing::info!(
            "Invoked endpoint {} ({} payload bytes, {} response bytes)",
            self.endpoint_name,
            payload.len(),
            raw.len()
        );

        Ok(InvocationResponse {
            status_code: 200,
            body,
        })
    }

    /// Look up a transform job by name and pass its status through.
    pub async fn check_status(&self, query: JobStatusQuery) -> Result<JobStatusResult> {
        let description = self.describe_job(&query.name).await?;

        tracing::debug!(
            "Transform job {} reported status {}",
            query.name,
            description.status
        );

        Ok(JobStatusResult {
            status: description.status,
            name: query.name,
            failure_reason: description.failure_reason,
        })
    }

    /// Resolve the payload bytes and content-type for this invocation.
    async fn resolve_payload(&self, event: &InvocationEvent) -> Result<(Vec<u8>, String)> {
        match &self.source {
            PayloadSource::Request { content_type } => {
                let body = event
                    .body
                    .as_deref()
                    .ok_or_else(|| Error::InvalidRequest("event has no body".to_string()))?;
                let container: Value = serde_json::from_str(body).map_err(|e| {
                    Error::InvalidRequest(format!("event body is not valid JSON: {}", e))
                })?;
                let data = container.get("data").ok_or_else(|| {
                    Error::InvalidRequest("event body has no 'data' field".to_string())
                })?;
                Ok((payload_bytes(data), content_type.clone()))
            }
            PayloadSource::BlobMetadata {
                bucket,
                key,
                input_data,
            } => {
                let object = self.store.get_object(bucket, key).await?;
                let content_type = String::from_utf8(object).map_err(|_| {
                    Error::InvalidRequest(format!(
                        "content-type object {}/{} is not valid UTF-8",
                        bucket, key
                    ))
                })?;
                Ok((input_data.clone().into_bytes(), content_type))
            }
        }
    }

    async fn invoke_endpoint(&self, payload: &[u8], content_type: &str) -> Result<Vec<u8>> {
        let mut attempt = 0;
        loop {
            match self
                .endpoint
                .invoke(&self.endpoint_name, payload, content_type)
                .await
            {
                Ok(raw) => return Ok(raw),
                Err(Error::UpstreamUnavailable(reason)) if attempt < self.retry.max_retries => {
                    attempt += 1;
                    let delay = self.retry.delay(attempt);
                    tracing::warn!(
                        "Endpoint {} unavailable ({}), retry {}/{} in {:?}",
                        self.endpoint_name,
                        reason,
                        attempt,
                        self.retry.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn describe_job(&self, name: &str) -> Result<TransformJobDescription> {
        let mut attempt = 0;
        loop {
            match self.jobs.describe_job(name).await {
                Ok(description) => return Ok(description),
                Err(Error::UpstreamUnavailable(reason)) if attempt < self.retry.max_retries => {
                    attempt += 1;
                    let delay = self.retry.delay(attempt);
                    tracing::warn!(
                        "Transform job lookup for {} unavailable ({}), retry {}/{} in {:?}",
                        name,
                        reason,
                        attempt,
                        self.retry.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Payload bytes for a `data` value: a JSON string is forwarded as-is, any
/// other JSON value in its compact serialization.
fn payload_bytes(data: &Value) -> Vec<u8> {
    match data {
        Value::String(s) => s.clone().into_bytes(),
        other => other.to_string().into_bytes(),
    }
}

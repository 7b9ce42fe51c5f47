//! Trait seams for the managed platform and its blob storage.
//!
//! The gateway only ever talks to these traits; the HTTP implementations
//! live in the submodules and the test doubles in `test_util`.

mod platform;
mod storage;

pub use platform::HttpPlatformClient;
pub use storage::HttpObjectStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Synchronous invocation of a hosted model endpoint.
#[async_trait]
pub trait EndpointClient: Send + Sync {
    /// Send `payload` to the named endpoint and return its raw response body.
    async fn invoke(&self, endpoint_name: &str, payload: &[u8], content_type: &str)
        -> Result<Vec<u8>>;
}

/// Read access to blob storage.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;
}

/// Batch transform job lookups.
#[async_trait]
pub trait TransformJobClient: Send + Sync {
    async fn describe_job(&self, name: &str) -> Result<TransformJobDescription>;
}

/// Platform-side view of a transform job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformJobDescription {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
}

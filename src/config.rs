//! Configuration for the inference gateway.

use config::{Config as ConfigLoader, ConfigError, Environment, File, FileFormat, FileSourceFile};
use serde::Deserialize;
use std::path::Path;

use crate::gateway::PayloadSource;

/// Where the scoring payload and content-type come from.
///
/// `Request` reads the payload from the incoming event; `BlobMetadata` reads
/// the payload from `input_data` and the content-type value from the
/// configured blob-storage object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceMode {
    Request,
    BlobMetadata,
}

impl Default for SourceMode {
    fn default() -> Self {
        SourceMode::Request
    }
}

/// Main configuration structure for the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub invocation: InvocationConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Deployment-time wiring for the invocation path.
///
/// The five fields mirror what deployments provide: the target endpoint, the
/// declared content type, and (for the blob-metadata profile) the object
/// holding the content-type value plus the fixed payload.
#[derive(Debug, Clone, Deserialize)]
pub struct InvocationConfig {
    /// Name of the managed inference endpoint to invoke.
    pub endpoint_name: String,
    #[serde(default)]
    pub source_mode: SourceMode,
    /// Content type declared on endpoint calls (request mode).
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// Blob-storage bucket holding the content-type object (blob-metadata mode).
    #[serde(default)]
    pub bucket: Option<String>,
    /// Blob-storage key of the content-type object (blob-metadata mode).
    #[serde(default)]
    pub key: Option<String>,
    /// Fixed scoring payload (blob-metadata mode).
    #[serde(default)]
    pub input_data: Option<String>,
}

impl InvocationConfig {
    /// Project the flat deployment fields into the payload-source union.
    ///
    /// Incomplete blob-metadata wiring is rejected here, at startup, rather
    /// than on the first invocation.
    pub fn payload_source(&self) -> Result<PayloadSource, ConfigError> {
        match self.source_mode {
            SourceMode::Request => Ok(PayloadSource::Request {
                content_type: self.content_type.clone(),
            }),
            SourceMode::BlobMetadata => {
                let bucket = self.bucket.clone().ok_or_else(|| {
                    ConfigError::Message(
                        "source_mode 'blob-metadata' requires invocation.bucket".to_string(),
                    )
                })?;
                let key = self.key.clone().ok_or_else(|| {
                    ConfigError::Message(
                        "source_mode 'blob-metadata' requires invocation.key".to_string(),
                    )
                })?;
                let input_data = self.input_data.clone().ok_or_else(|| {
                    ConfigError::Message(
                        "source_mode 'blob-metadata' requires invocation.input_data".to_string(),
                    )
                })?;
                Ok(PayloadSource::BlobMetadata {
                    bucket,
                    key,
                    input_data,
                })
            }
        }
    }
}

/// Managed platform and blob storage connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the managed inference platform (endpoints + transform jobs).
    #[serde(default = "default_platform_base_url")]
    pub platform_base_url: String,
    /// Base URL of the blob storage service.
    #[serde(default = "default_storage_base_url")]
    pub storage_base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Extra attempts after a transient upstream fault (default: 0 = single call).
    #[serde(default)]
    pub max_retries: u32,
    /// Initial delay between retries, doubled on each attempt.
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            platform_base_url: default_platform_base_url(),
            storage_base_url: default_storage_base_url(),
            timeout_secs: default_timeout(),
            max_retries: 0,
            retry_backoff_ms: default_retry_backoff(),
        }
    }
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_content_type() -> String {
    "application/json".to_string()
}
fn default_platform_base_url() -> String {
    "http://localhost:8400".to_string()
}
fn default_storage_base_url() -> String {
    "http://localhost:9000".to_string()
}
fn default_timeout() -> u64 {
    60
}
fn default_retry_backoff() -> u64 {
    200
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration sources (in order of precedence):
    /// 1. Environment variables (GATEWAY__SECTION__KEY format)
    /// 2. config.toml file (if present)
    /// 3. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(File::with_name("config").required(false))
    }

    /// Load configuration from an explicit file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::load_with(File::from(path).required(true))
    }

    fn load_with(source: File<FileSourceFile, FileFormat>) -> Result<Self, ConfigError> {
        let loader = ConfigLoader::builder()
            // Set defaults
            .set_default("api.host", default_host())?
            .set_default("api.port", default_port() as i64)?
            .add_source(source)
            // Override with environment variables (GATEWAY__SECTION__KEY format)
            .add_source(
                Environment::with_prefix("GATEWAY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = loader.try_deserialize()?;
        // Surface incomplete blob-metadata wiring at startup.
        config.invocation.payload_source()?;
        Ok(config)
    }
}

pub mod mock_platform;

use std::sync::Arc;

use crate::config::{ApiConfig, Config, InvocationConfig, LoggingConfig, SourceMode, UpstreamConfig};
use crate::gateway::{Gateway, PayloadSource, RetryPolicy};
use crate::AppState;
use mock_platform::{MockEndpoint, MockObjectStore, MockTransformJobs};

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        invocation: InvocationConfig {
            endpoint_name: "iris-classifier".to_string(),
            source_mode: SourceMode::Request,
            content_type: "text/csv".to_string(),
            bucket: None,
            key: None,
            input_data: None,
        },
        upstream: UpstreamConfig {
            platform_base_url: "http://localhost:8400".to_string(),
            storage_base_url: "http://localhost:9000".to_string(),
            timeout_secs: 5,
            max_retries: 0,
            retry_backoff_ms: 1,
        },
    }
}

/// Build application state around injected platform doubles so tests can
/// script responses and inspect recorded calls.
pub fn create_test_state(
    endpoint: Arc<MockEndpoint>,
    store: Arc<MockObjectStore>,
    jobs: Arc<MockTransformJobs>,
) -> Arc<AppState> {
    let config = test_config();
    let gateway = Gateway::new(
        config.invocation.endpoint_name.clone(),
        PayloadSource::Request {
            content_type: config.invocation.content_type.clone(),
        },
        RetryPolicy::none(),
        endpoint,
        store,
        jobs,
    );

    Arc::new(AppState::new(config, gateway))
}

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod test_util;
pub mod upstream;

pub use config::{Config, SourceMode};
pub use error::{Error, Result};
pub use gateway::{
    Gateway, InvocationEvent, InvocationResponse, JobStatusQuery, JobStatusResult, PayloadSource,
    RetryPolicy,
};
pub use upstream::{
    EndpointClient, HttpObjectStore, HttpPlatformClient, ObjectStore, TransformJobClient,
    TransformJobDescription,
};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub gateway: Gateway,
}

impl AppState {
    pub fn new(config: Config, gateway: Gateway) -> Self {
        Self { config, gateway }
    }
}

//! Inference Gateway - forwards scoring requests to a managed inference
//! endpoint and reports batch transform job status.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use inference_gateway::gateway::{Gateway, RetryPolicy};
use inference_gateway::upstream::{HttpObjectStore, HttpPlatformClient};
use inference_gateway::{api, logging, AppState, Config};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    println!("inference-gateway {}", VERSION);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle --version / -V
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        print_version();
        return Ok(());
    }

    // Load configuration
    let config = Config::load().map_err(|e| {
        format!(
            "Failed to load configuration: {}. \
             Make sure config.toml exists or set GATEWAY__INVOCATION__ENDPOINT_NAME in the environment.",
            e
        )
    })?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Starting inference-gateway for endpoint {}",
        config.invocation.endpoint_name
    );

    // Construct platform clients. The platform client serves both endpoint
    // invocations and transform-job lookups.
    let platform = Arc::new(HttpPlatformClient::new(
        &config.upstream.platform_base_url,
        config.upstream.timeout_secs,
    ));
    let store = Arc::new(HttpObjectStore::new(
        &config.upstream.storage_base_url,
        config.upstream.timeout_secs,
    ));

    let source = config.invocation.payload_source()?;
    let retry = RetryPolicy {
        max_retries: config.upstream.max_retries,
        backoff: Duration::from_millis(config.upstream.retry_backoff_ms),
    };

    let gateway = Gateway::new(
        config.invocation.endpoint_name.clone(),
        source,
        retry,
        platform.clone(),
        store,
        platform,
    );

    // Create shared state
    let state = Arc::new(AppState::new(config.clone(), gateway));

    // Build router
    let app = Router::new()
        .nest("/v1", api::router())
        .route("/health", axum::routing::get(api::health::health))
        .route("/metrics", axum::routing::get(api::health::metrics))
        .layer(middleware::from_fn(logging::request_logger))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = format!("{}:{}", config.api.host, config.api.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

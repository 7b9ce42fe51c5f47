//! HTTP API of the gateway.

pub mod health;
pub mod invocations;
pub mod jobs;

use std::sync::Arc;

use axum::Router;

use crate::AppState;

/// Build the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(invocations::router())
        .merge(jobs::router())
}

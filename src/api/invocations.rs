//! Synchronous endpoint invocation.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::gateway::{InvocationEvent, InvocationResponse};
use crate::AppState;

/// Build the invocations router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/invocations", post(invoke))
}

/// POST /v1/invocations - forward a scoring request to the configured endpoint.
///
/// The event is decoded in the handler; a malformed event maps to
/// `InvalidRequest` rather than the extractor's default rejection.
async fn invoke(
    State(state): State<Arc<AppState>>,
    Json(event): Json<Value>,
) -> Result<Json<InvocationResponse>> {
    let event: InvocationEvent = serde_json::from_value(event)
        .map_err(|e| Error::InvalidRequest(format!("malformed invocation event: {}", e)))?;

    let response = state.gateway.invoke(event).await?;
    Ok(Json(response))
}

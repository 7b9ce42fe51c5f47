//! Health and metrics endpoints.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health - liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /metrics - Prometheus-style service gauges.
pub async fn metrics() -> Response {
    let version = env!("CARGO_PKG_VERSION");
    let body = format!(
        "# HELP inference_gateway_up Whether the service is up\n\
         # TYPE inference_gateway_up gauge\n\
         inference_gateway_up 1\n\
         # HELP inference_gateway_info Service information\n\
         # TYPE inference_gateway_info gauge\n\
         inference_gateway_info{{version=\"{}\"}} 1\n",
        version
    );
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

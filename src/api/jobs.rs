//! Batch transform job status.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::error::Result;
use crate::gateway::{JobStatusQuery, JobStatusResult};
use crate::AppState;

/// Build the jobs router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/transform-jobs/:name/status", get(job_status))
}

/// GET /v1/transform-jobs/:name/status - report a transform job's current status.
async fn job_status(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<JobStatusResult>> {
    let result = state.gateway.check_status(JobStatusQuery { name }).await?;
    Ok(Json(result))
}

use axum::Json;
use axum::http::StatusCode;
use serde_json::{Value, json};

/// Handler for `GET /healthz`, the liveness probe.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Handler for `GET /readyz`. Returns a small JSON body so probes and humans
/// get the same answer.
pub async fn readyz() -> Json<Value> {
    Json(json!({ "status": "ready" }))
}

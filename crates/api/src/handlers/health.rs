//! Liveness endpoint.

use axum::{Json, extract::State, http::StatusCode};
use folio_storage::StorageBackend;
use folio_types::Error;
use serde_json::{Value, json};

use crate::{
    AppState,
    envelope::{ApiResult, success},
};

/// GET /healthz
///
/// Verifies the storage backend responds before reporting healthy.
pub async fn healthz(State(state): State<AppState>) -> ApiResult<(StatusCode, Json<Value>)> {
    state
        .storage
        .health_check()
        .await
        .map_err(|e| Error::storage(format!("Storage health check failed: {e}")))?;
    Ok(success(json!({ "status": "ok" })))
}

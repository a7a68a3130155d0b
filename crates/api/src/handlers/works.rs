//! Work handlers beyond the generic set.

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use folio_core::cascade;
use folio_types::dto::WorkView;
use serde_json::Value;

use crate::{
    AppState,
    envelope::{ApiResult, success},
    middleware::AuthContext,
    resource::ensure_owner,
};

/// DELETE /api/v1/works/{id}
///
/// Takes the work entry's experiences with it.
pub async fn delete_work(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let repos = state.repos();
    let work = repos.works.require(id).await?;
    ensure_owner(&state, &work, auth.user_id).await?;

    let deleted = cascade::delete_work(&repos, id).await?;
    Ok(success(WorkView::from(deleted)))
}

//! Project handlers beyond the generic set.

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use folio_core::cascade;
use folio_types::dto::ProjectView;
use serde_json::Value;

use crate::{
    AppState,
    envelope::{ApiResult, success},
    middleware::AuthContext,
    resource::ensure_owner,
};

/// DELETE /api/v1/projects/{id}
///
/// Takes the project's features with it.
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let repos = state.repos();
    let project = repos.projects.require(id).await?;
    ensure_owner(&state, &project, auth.user_id).await?;

    let deleted = cascade::delete_project(&repos, id).await?;
    Ok(success(ProjectView::from(deleted)))
}

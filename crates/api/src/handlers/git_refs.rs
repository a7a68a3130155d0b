//! Git ref handlers beyond the generic set.

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
};
use folio_types::dto::GitRefView;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    AppState,
    envelope::{ApiResult, success},
    middleware::AuthContext,
    resource::ensure_owner,
};

#[derive(Debug, Deserialize)]
pub struct RemoveGitRefQuery {
    /// Detach from the contribution instead of deleting
    #[serde(default)]
    pub detach: bool,
}

/// DELETE /api/v1/gitrefs/{id}
///
/// With `?detach=true` the record is kept but unlinked from its
/// contribution; it then has no owner until re-attached.
pub async fn remove_git_ref(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Query(query): Query<RemoveGitRefQuery>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let repos = state.repos();
    let git_ref = repos.git_refs.require(id).await?;
    ensure_owner(&state, &git_ref, auth.user_id).await?;

    let result = if query.detach {
        repos.git_refs.detach(id).await?
    } else {
        repos.git_refs.delete(id).await?
    };
    Ok(success(GitRefView::from(result)))
}

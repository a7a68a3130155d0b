//! Contribution handlers beyond the generic set.

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use folio_core::cascade;
use folio_types::dto::ContributionView;
use serde_json::Value;

use crate::{
    AppState,
    envelope::{ApiResult, success},
    middleware::AuthContext,
    resource::ensure_owner,
};

/// DELETE /api/v1/contributions/{id}
///
/// Takes the contribution's attached git refs with it; refs detached
/// beforehand survive.
pub async fn delete_contribution(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let repos = state.repos();
    let contribution = repos.contributions.require(id).await?;
    ensure_owner(&state, &contribution, auth.user_id).await?;

    let deleted = cascade::delete_contribution(&repos, id).await?;
    Ok(success(ContributionView::from(deleted)))
}

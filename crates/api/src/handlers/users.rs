//! User handlers beyond the generic set: lookup by email with the profile
//! embedded, and deletion cascading through every owned record.

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use folio_core::cascade;
use folio_types::{
    Error,
    dto::{ProfileView, UserView},
};
use serde_json::Value;

use crate::{
    AppState,
    envelope::{ApiResult, success},
    middleware::AuthContext,
    resource::ensure_owner,
};

/// GET /api/users/{email}
///
/// Resolves a user by email and embeds their profile, so a portfolio page
/// loads with a single request.
pub async fn user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let repos = state.repos();
    let user = repos
        .users
        .find_by_unique(&email)
        .await?
        .ok_or_else(|| Error::not_found("user not found"))?;

    let profile = repos
        .profiles
        .list_by_parent(user.id)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| Error::not_found("profile not found"))?;

    let mut view = serde_json::to_value(UserView::from(user))
        .map_err(|e| Error::internal(format!("Failed to serialize user: {e}")))?;
    if let Some(object) = view.as_object_mut() {
        object.insert(
            "profile".to_string(),
            serde_json::to_value(ProfileView::from(profile))
                .map_err(|e| Error::internal(format!("Failed to serialize profile: {e}")))?,
        );
    }
    Ok(success(view))
}

/// DELETE /api/v1/users/{id}
///
/// Removes the user together with profiles, projects, works, articles,
/// contributions, and their children.
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let repos = state.repos();
    let user = repos.users.require(id).await?;
    ensure_owner(&state, &user, auth.user_id).await?;

    let deleted = cascade::delete_user(&repos, id).await?;
    tracing::info!(user_id = id, "User deleted");
    Ok(success(UserView::from(deleted)))
}

//! Profile handlers.
//!
//! The profile update accepts either a JSON patch or a multipart form.
//! Multipart file parts named `image` and `resume` are stored through the
//! file store and patched in as upload URLs; any other part is treated as a
//! text field. Replaced uploads are removed from disk.

use axum::{
    Json,
    extract::{Extension, FromRequest, Multipart, Path, Request, State},
    http::{StatusCode, header},
};
use folio_const::limits::MAX_UPLOAD_BYTES;
use folio_types::{Error, dto::ProfileView, entities::Profile};
use serde_json::{Map, Value};

use crate::{
    AppState,
    envelope::{ApiResult, success},
    extract::ApiJson,
    middleware::AuthContext,
    resource::ensure_owner,
};

/// GET /api/v1/users/{id}/profile
pub async fn user_profile(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let repos = state.repos();
    repos.users.require(user_id).await?;

    let profile = repos
        .profiles
        .list_by_parent(user_id)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| Error::not_found("profile not found"))?;
    Ok(success(ProfileView::from(profile)))
}

/// PATCH /api/v1/profiles/{id}
///
/// JSON bodies patch fields directly; multipart bodies may also carry
/// `image` and `resume` files.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    request: Request,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let repos = state.repos();
    let profile = repos.profiles.require(id).await?;
    ensure_owner(&state, &profile, auth.user_id).await?;

    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let fields = if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| Error::validation(format!("invalid multipart body: {e}")))?;
        multipart_fields(&state, &profile, multipart).await?
    } else {
        let ApiJson(fields) =
            ApiJson::<Map<String, Value>>::from_request(request, &state).await?;
        fields
    };

    let updated = repos.profiles.patch(id, &fields).await?;
    Ok(success(ProfileView::from(updated)))
}

/// Collect a multipart form into a patch map, storing file parts
async fn multipart_fields(
    state: &AppState,
    profile: &Profile,
    mut multipart: Multipart,
) -> ApiResult<Map<String, Value>> {
    let mut fields = Map::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::validation(format!("invalid multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "image" | "resume" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| Error::validation(format!("failed to read upload: {e}")))?;
                if data.len() > MAX_UPLOAD_BYTES {
                    return Err(Error::validation("uploaded file is too large").into());
                }

                let stored = state.files.save(&file_name, &data).await?;

                let (field_name, previous) = if name == "image" {
                    ("image_url", profile.image_url.as_deref())
                } else {
                    ("resume", profile.resume.as_deref())
                };
                remove_previous_upload(state, previous).await;

                fields.insert(
                    field_name.to_string(),
                    Value::String(format!("/api/v1/uploads/{stored}")),
                );
            }
            _ => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| Error::validation(format!("invalid multipart field: {e}")))?;
                fields.insert(name, Value::String(text));
            }
        }
    }

    Ok(fields)
}

/// Delete the file behind a stored upload URL, if any
///
/// Failure leaves an orphaned file behind, which is not worth failing the
/// patch over; it is logged and skipped.
async fn remove_previous_upload(state: &AppState, url: Option<&str>) {
    let Some(name) = url.and_then(|u| u.rsplit('/').next()).filter(|n| !n.is_empty()) else {
        return;
    };
    if let Err(e) = state.files.remove(name).await {
        tracing::warn!(file = name, error = %e, "Failed to remove replaced upload");
    }
}

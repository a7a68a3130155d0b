//! Serving uploaded files.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use folio_types::Error;

use crate::{AppState, envelope::ApiResult};

/// Content type from the stored file's extension
///
/// Uploads are limited to profile images and resumes, so the table is
/// short; anything else is served as raw bytes.
fn content_type_for(name: &str) -> &'static str {
    match name.rsplit('.').next() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// GET /api/v1/uploads/{file}
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Response> {
    let contents = state
        .files
        .read(&name)
        .await?
        .ok_or_else(|| Error::not_found("file not found"))?;

    let headers = [(header::CONTENT_TYPE, content_type_for(&name))];
    Ok((headers, contents).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions_map_to_types() {
        assert_eq!(content_type_for("a.png"), "image/png");
        assert_eq!(content_type_for("a.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("resume.pdf"), "application/pdf");
    }

    #[test]
    fn unknown_extensions_fall_back_to_bytes() {
        assert_eq!(content_type_for("deadbeef"), "application/octet-stream");
        assert_eq!(content_type_for("a.exe"), "application/octet-stream");
    }
}

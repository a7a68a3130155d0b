//! Response envelope.
//!
//! Every body leaving the API is `{"status": ..., "data": ...}`. Successes
//! carry `"success"`; client errors carry `"fail"` and server errors carry
//! `"error"`, with the message under `data.error`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use folio_types::Error;
use serde::Serialize;
use serde_json::{Value, json};

/// Handler result carrying the enveloped error on failure
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Error wrapper that renders the envelope
///
/// Wraps [`folio_types::Error`] so handlers can use `?` on core calls
/// directly; the status code comes from the error taxonomy.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(code = self.0.error_code(), error = %self.0, "Request failed");
        }

        let kind = if status.is_server_error() { "error" } else { "fail" };
        let body = json!({
            "status": kind,
            "data": { "error": self.0.to_string() },
        });

        (status, Json(body)).into_response()
    }
}

/// Wrap data in a success envelope with a 200 status
pub fn success<T: Serialize>(data: T) -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "success", "data": data })))
}

/// Wrap data in a success envelope with a 201 status
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, Json(json!({ "status": "success", "data": data })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    async fn body_of(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1 << 20).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn client_errors_use_fail() {
        let response = ApiError(Error::not_found("user not found")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_of(response).await;
        assert_eq!(body["status"], "fail");
        assert_eq!(body["data"]["error"], "Resource not found: user not found");
    }

    #[tokio::test]
    async fn server_errors_use_error() {
        let response = ApiError(Error::internal("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        assert_eq!(body["status"], "error");
    }

    #[test]
    fn success_wraps_data() {
        let (status, Json(body)) = success(json!({ "id": 1 }));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"]["id"], 1);
    }

    #[test]
    fn created_uses_201() {
        let (status, Json(body)) = created(json!({ "id": 1 }));
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "success");
    }
}

//! Request extractors.

use std::net::SocketAddr;

use axum::{
    Json,
    extract::{ConnectInfo, FromRequest, Request, rejection::JsonRejection},
};
use folio_types::Error;
use serde::de::DeserializeOwned;

use crate::envelope::ApiError;

/// JSON body extractor that reports rejections through the envelope
///
/// A missing or wrong `Content-Type`, malformed JSON, and bodies that do not
/// match the target type all come back as 400 validation failures instead of
/// axum's plain-text rejections.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(JsonRejection::MissingJsonContentType(_)) => {
                Err(Error::validation("request body must be application/json").into())
            }
            Err(rejection) => Err(Error::validation(rejection.body_text()).into()),
        }
    }
}

/// Best-effort client IP for request logs
///
/// Proxy headers win over the TCP peer: first entry of `X-Forwarded-For`,
/// then `X-Real-IP`, then `ConnectInfo`.
pub fn client_ip(req: &Request) -> Option<String> {
    let headers = req.headers();

    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
        .or_else(|| {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use axum::body::Body;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Payload {
        name: String,
    }

    fn json_request(body: &str, content_type: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/test").method("POST");
        if let Some(ct) = content_type {
            builder = builder.header("content-type", ct);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn accepts_valid_json() {
        let req = json_request(r#"{"name":"ok"}"#, Some("application/json"));
        let ApiJson(payload) = ApiJson::<Payload>::from_request(req, &()).await.unwrap();
        assert_eq!(payload.name, "ok");
    }

    #[tokio::test]
    async fn rejects_missing_content_type() {
        let req = json_request(r#"{"name":"ok"}"#, None);
        let err = ApiJson::<Payload>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.0.status_code(), 400);
        assert!(err.0.to_string().contains("application/json"));
    }

    #[tokio::test]
    async fn rejects_malformed_json() {
        let req = json_request("{not json", Some("application/json"));
        let err = ApiJson::<Payload>::from_request(req, &()).await.unwrap_err();
        assert_eq!(err.0.status_code(), 400);
    }

    fn bare_request(headers: &[(&str, &str)]) -> Request {
        let mut builder = axum::http::Request::builder().uri("/test");
        for (key, value) in headers {
            builder = builder.header(*key, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn forwarded_for_takes_first_entry() {
        let req = bare_request(&[("x-forwarded-for", "203.0.113.50, 70.41.3.18")]);
        assert_eq!(client_ip(&req).as_deref(), Some("203.0.113.50"));
    }

    #[test]
    fn real_ip_is_the_fallback_header() {
        let req = bare_request(&[("x-real-ip", " 198.51.100.42 ")]);
        assert_eq!(client_ip(&req).as_deref(), Some("198.51.100.42"));
    }

    #[test]
    fn connect_info_is_the_last_resort() {
        let mut req = bare_request(&[]);
        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 12345);
        req.extensions_mut().insert(ConnectInfo(addr));
        assert_eq!(client_ip(&req).as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn empty_headers_yield_none() {
        let req = bare_request(&[("x-forwarded-for", "")]);
        assert_eq!(client_ip(&req), None);
    }
}

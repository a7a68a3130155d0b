//! Request logging.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

use crate::extract::client_ip;

/// Log one line per handled request with method, path, status, and latency
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client = client_ip(&request);

    let start = Instant::now();
    let response = next.run(request).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        %method,
        path,
        status = response.status().as_u16(),
        latency_ms,
        client = client.as_deref().unwrap_or("-"),
        "Request handled"
    );

    response
}

//! Request logging middleware. One line per request with method, path,
//! status, and elapsed time.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use logging::log_api_request;

pub async fn request_log_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    log_api_request!(
        method,
        path,
        response.status().as_u16(),
        start.elapsed().as_millis()
    );
    response
}

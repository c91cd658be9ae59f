use axum::{
    body::{Body, to_bytes},
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::error;

/// 错误响应体的读取上限
const MAX_LOGGED_BODY: usize = 1024;

pub async fn log_errors(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let response = next.run(req).await;

    if !response.status().is_server_error() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_LOGGED_BODY).await {
        Ok(b) => b,
        Err(e) => {
            error!("{} {} failed to read error response body: {}", method, path, e);
            return Response::from_parts(parts, Body::empty());
        }
    };

    error!(
        "{} {} - Status: {}, Body: {}",
        method,
        path,
        parts.status,
        String::from_utf8_lossy(&bytes)
    );

    // body 已被读取，重新构建响应
    parts.headers.remove(axum::http::header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(bytes))
}

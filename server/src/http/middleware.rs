use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
};

/// Middleware to set security headers on all responses.
///
/// Framing and CSP are left to whatever serves the dashboard itself; the API only
/// answers JSON.
pub(crate) async fn secure_headers_middleware(
    req: Request<Body>,
    next: Next,
) -> axum::response::Response {
    let mut response = next.run(req).await;
    response.headers_mut().insert(
        HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    );
    response.headers_mut().insert(
        HeaderName::from_static("cache-control"),
        HeaderValue::from_static("no-store"),
    );
    response
}

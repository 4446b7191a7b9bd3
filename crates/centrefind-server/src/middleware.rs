use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";
const MAX_REQUEST_ID_LEN: usize = 128;

/// Request ID stored as a request extension and echoed on the response.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// A caller-supplied ID is kept only if it is short, visible ASCII.
fn usable_request_id(raw: &str) -> Option<&str> {
    let raw = raw.trim();
    let ok = !raw.is_empty()
        && raw.len() <= MAX_REQUEST_ID_LEN
        && raw.bytes().all(|b| b.is_ascii_graphic());
    ok.then_some(raw)
}

/// Reuse the caller's `x-request-id` when usable, otherwise mint a `UUIDv4`.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(usable_request_id)
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    tracing::debug!(
        request_id = %id,
        method = %req.method(),
        path = %req.uri().path(),
        "request"
    );
    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;
    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    res
}

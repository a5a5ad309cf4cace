use super::context_of;
use super::logging::RequestBytes;
use crate::state::AppState;
use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use hcp_arm::cloud_error::{CODE_INVALID_REQUEST_CONTENT, CODE_UNSUPPORTED_MEDIA_TYPE};
use hcp_arm::CloudError;
use tracing::warn;

/// Buffers the request body into the context, bounded by the configured
/// limit, and puts the bytes back so extractors can still read them.
pub async fn handle(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let limit = state.config.max_body_bytes;
    let (mut parts, body) = req.into_parts();

    let bytes = match to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, limit, "failed to read request body");
            return CloudError::new(
                StatusCode::BAD_REQUEST,
                CODE_INVALID_REQUEST_CONTENT,
                "",
                format!(
                    "The request content could not be read or exceeds the maximum size of {} bytes.",
                    limit
                ),
            )
            .into_response();
        }
    };

    if let Some(counter) = parts.extensions.get::<RequestBytes>() {
        counter.set(bytes.len());
    }

    let carries_content = matches!(parts.method, Method::PUT | Method::PATCH | Method::POST);
    if carries_content && !bytes.is_empty() && !is_json(&parts.headers) {
        return CloudError::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            CODE_UNSUPPORTED_MEDIA_TYPE,
            "",
            "The content media type is not supported. Only 'application/json' is supported.",
        )
        .into_response();
    }

    let ctx = context_of(&parts.extensions).with_body(bytes.clone());
    parts.extensions.insert(ctx);

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    media_type == "application/json" || media_type.ends_with("+json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_is_json() {
        let mut headers = HeaderMap::new();
        assert!(!is_json(&headers));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json; charset=utf-8"));
        assert!(is_json(&headers));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("Application/Merge-Patch+JSON"));
        assert!(is_json(&headers));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert!(!is_json(&headers));
    }
}

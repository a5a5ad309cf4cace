use super::context_of;
use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use hcp_arm::correlation::return_client_request_id;
use hcp_arm::headers::{HEADER_CLIENT_REQUEST_ID, HEADER_REQUEST_ID};
use hcp_arm::CorrelationData;
use tracing::Span;

/// Assigns the request its `x-ms-request-id` and carries the caller's
/// correlation identifiers into the context and the request span.
pub async fn handle(mut req: Request, next: Next) -> Response {
    let correlation = CorrelationData::from_headers(req.headers());
    let echo_client_id = return_client_request_id(req.headers());

    let span = Span::current();
    span.record("request_id", correlation.request_id.to_string().as_str());
    if !correlation.client_request_id.is_empty() {
        span.record("client_request_id", correlation.client_request_id.as_str());
    }
    if !correlation.correlation_request_id.is_empty() {
        span.record(
            "correlation_request_id",
            correlation.correlation_request_id.as_str(),
        );
    }

    let ctx = context_of(req.extensions()).with_correlation(correlation.clone());
    req.extensions_mut().insert(ctx);

    let mut response = next.run(req).await;

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&correlation.request_id.to_string()) {
        headers.insert(HEADER_REQUEST_ID, value);
    }
    if echo_client_id && !correlation.client_request_id.is_empty() {
        if let Ok(value) = HeaderValue::from_str(&correlation.client_request_id) {
            headers.insert(HEADER_CLIENT_REQUEST_ID, value);
        }
    }
    response
}

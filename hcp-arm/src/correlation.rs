use crate::headers::{
    HEADER_CLIENT_REQUEST_ID, HEADER_CORRELATION_REQUEST_ID, HEADER_RETURN_CLIENT_REQUEST_ID,
};
use axum::http::HeaderMap;
use serde::Serialize;
use uuid::Uuid;

/// Identifiers that tie a request to ARM and client-side traces
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationData {
    /// Generated by this service for every request
    pub request_id: Uuid,
    /// Supplied by the client, echoed back on request
    pub client_request_id: String,
    /// Supplied by ARM to correlate a multi-request operation
    pub correlation_request_id: String,
}

impl CorrelationData {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            client_request_id: header_string(headers, HEADER_CLIENT_REQUEST_ID),
            correlation_request_id: header_string(headers, HEADER_CORRELATION_REQUEST_ID),
        }
    }
}

/// True when the client asked for its request ID to be echoed back.
pub fn return_client_request_id(headers: &HeaderMap) -> bool {
    headers
        .get(HEADER_RETURN_CLIENT_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn header_string(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

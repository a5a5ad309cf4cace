use crate::state::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use hcp_arm::CloudError;
use tracing::error;

/// 200 while the frontend is serving; 500 once shutdown has begun.
pub async fn ready(State(state): State<AppState>) -> StatusCode {
    if state.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Azure region this frontend serves, as plain text.
pub async fn location(State(state): State<AppState>) -> String {
    state.config.location.clone()
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.gather_metrics() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to encode metrics");
            CloudError::internal_server_error().into_response()
        }
    }
}

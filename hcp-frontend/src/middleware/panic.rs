use axum::response::{IntoResponse, Response};
use hcp_arm::CloudError;
use std::any::Any;
use tracing::error;

/// Panic handler for `CatchPanicLayer`: logs the payload and answers with a
/// bare 500 so nothing internal reaches the client.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    error!(panic = message, "request handler panicked");

    CloudError::internal_server_error().into_response()
}

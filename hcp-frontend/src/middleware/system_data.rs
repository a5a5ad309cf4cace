use super::context_of;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use hcp_arm::headers::HEADER_SYSTEM_DATA;
use hcp_arm::SystemData;
use tracing::warn;

/// Parses the ARM system data header into the context. A malformed header
/// is logged and otherwise ignored.
pub async fn handle(mut req: Request, next: Next) -> Response {
    let header = req
        .headers()
        .get(HEADER_SYSTEM_DATA)
        .map(|v| v.to_str().map(str::to_string));

    match header {
        None => {}
        Some(Ok(raw)) => match SystemData::from_header(&raw) {
            Ok(system_data) => {
                let ctx = context_of(req.extensions()).with_system_data(system_data);
                req.extensions_mut().insert(ctx);
            }
            Err(e) => warn!(error = %e, "ignoring malformed {} header", HEADER_SYSTEM_DATA),
        },
        Some(Err(e)) => warn!(error = %e, "ignoring non-ASCII {} header", HEADER_SYSTEM_DATA),
    }

    next.run(req).await
}

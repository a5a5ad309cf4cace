use axum::body::HttpBody;
use axum::extract::{MatchedPath, Path, Request};
use axum::middleware::Next;
use axum::response::Response;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{field, info, info_span, Instrument, Span};

/// Shared counter the body stage fills with the number of request bytes read
#[derive(Clone, Default)]
pub struct RequestBytes(pub Arc<AtomicUsize>);

impl RequestBytes {
    pub fn set(&self, n: usize) {
        self.0.store(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::Relaxed)
    }
}

/// Opens the `request` span every later stage logs into, and reports the
/// outcome once the response is ready.
pub async fn handle(mut req: Request, next: Next) -> Response {
    let span = info_span!(
        "request",
        method = %req.method(),
        path = %req.uri().path(),
        request_id = field::Empty,
        correlation_request_id = field::Empty,
        client_request_id = field::Empty,
        subscription_id = field::Empty,
        resource_group = field::Empty,
        resource_name = field::Empty,
        subscription_state = field::Empty,
        route = field::Empty,
    );

    let bytes_read = RequestBytes::default();
    req.extensions_mut().insert(bytes_read.clone());

    async move {
        let start = Instant::now();
        info!("request received");

        let response = next.run(req).await;

        let bytes_written = response.body().size_hint().exact().unwrap_or(0);
        info!(
            status = response.status().as_u16(),
            bytes_read = bytes_read.get(),
            bytes_written,
            duration_ms = start.elapsed().as_millis() as u64,
            "response complete"
        );
        response
    }
    .instrument(span)
    .await
}

/// Records the routing outcome on the request span once the router has
/// matched: the route template and the resource coordinates from the path.
pub async fn handle_post_mux(
    matched: Option<MatchedPath>,
    params: Option<Path<HashMap<String, String>>>,
    req: Request,
    next: Next,
) -> Response {
    let span = Span::current();
    if let Some(matched) = &matched {
        span.record("route", matched.as_str());
    }
    let params = params.map(|Path(p)| p).unwrap_or_default();
    for (param, field) in [
        ("subscription_id", "subscription_id"),
        ("resource_group_name", "resource_group"),
        ("resource_name", "resource_name"),
    ] {
        if let Some(value) = params.get(param) {
            span.record(field, value.as_str());
        }
    }

    next.run(req).await
}

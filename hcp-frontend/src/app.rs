use crate::api;
use crate::middleware::{body, correlation, logging, lowercase, metrics, panic, system_data};
use crate::state::AppState;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;

/// Assembles the frontend: the router wrapped in the request pipeline.
///
/// The pipeline runs outermost first:
///
/// 1. Panic recovery
/// 2. Request span and access log
/// 3. Correlation identifiers
/// 4. Body buffering and media type check
/// 5. Path lowercasing
/// 6. System data header
/// 7. Metrics
/// 8. Panic recovery again, so a panicking handler is still logged and counted
///
/// Lowercasing must happen before route matching, so the pipeline wraps the
/// router as a service rather than being attached with `Router::layer`.
pub fn build_app(state: AppState) -> Router {
    let router = api::router(state.clone());
    with_pipeline(state, router)
}

/// Wraps any router in the request pipeline.
pub fn with_pipeline(state: AppState, router: Router) -> Router {
    let pipeline = ServiceBuilder::new()
        .layer(CatchPanicLayer::custom(panic::handle_panic))
        .layer(from_fn(logging::handle))
        .layer(from_fn(correlation::handle))
        .layer(from_fn_with_state(state.clone(), body::handle))
        .layer(from_fn(lowercase::handle))
        .layer(from_fn(system_data::handle))
        .layer(from_fn_with_state(state, metrics::handle))
        .layer(CatchPanicLayer::custom(panic::handle_panic))
        .service(router);

    Router::new().fallback_service(pipeline)
}

use super::context_of;
use crate::state::AppState;
use axum::extract::{Query, Request, State};
use axum::http::{StatusCode, Uri};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use hcp_arm::cloud_error::CODE_INVALID_RESOURCE_TYPE;
use hcp_arm::CloudError;
use std::collections::HashMap;

pub const API_VERSION_PARAMETER: &str = "api-version";

/// Resolves the `api-version` query parameter against the registry and
/// stores the version in the context.
pub async fn handle(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let requested = match api_version_param(req.uri()) {
        Some(v) => v,
        None => return CloudError::missing_parameter(API_VERSION_PARAMETER).into_response(),
    };

    let Some(version) = state.api_registry.lookup(&requested) else {
        return unsupported_api_version(&requested).into_response();
    };

    let ctx = context_of(req.extensions()).with_api_version(version);
    req.extensions_mut().insert(ctx);

    next.run(req).await
}

/// The non-empty `api-version` query parameter, if any.
pub fn api_version_param(uri: &Uri) -> Option<String> {
    Query::<HashMap<String, String>>::try_from_uri(uri)
        .ok()
        .and_then(|Query(params)| params.get(API_VERSION_PARAMETER).cloned())
        .filter(|v| !v.is_empty())
}

pub fn unsupported_api_version(requested: &str) -> CloudError {
    CloudError::new(
        StatusCode::BAD_REQUEST,
        CODE_INVALID_RESOURCE_TYPE,
        "",
        format!(
            "The resource type '{}' could not be found for API version '{}'.",
            hcp_api::CLUSTER_RESOURCE_TYPE,
            requested
        ),
    )
}

use crate::context::RequestContext;
use crate::middleware::api_version::{api_version_param, API_VERSION_PARAMETER};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{StatusCode, Uri};
use axum::{Extension, Json};
use hcp_arm::cloud_error::CODE_INVALID_PARAMETER;
use hcp_arm::{CloudError, ResourceId, Subscription};
use tracing::info;

/// API version ARM uses for subscription lifecycle notifications
pub const SUBSCRIPTION_API_VERSION: &str = "2.0";

pub async fn get_subscription(
    State(state): State<AppState>,
    Path(subscription_id): Path<String>,
    Extension(ctx): Extension<RequestContext>,
    uri: Uri,
) -> Result<Json<Subscription>, CloudError> {
    require_api_version(&uri)?;

    match state.cache.get_subscription(&subscription_id).await {
        Some(subscription) => Ok(Json(subscription)),
        None => {
            let path = ctx.original_path.as_deref().unwrap_or(uri.path());
            let resource_id = ResourceId::parse(path).map_err(|_| CloudError::not_found())?;
            Err(CloudError::resource_not_found(&resource_id))
        }
    }
}

/// Stores the subscription record ARM sends when a subscription is
/// registered with the resource provider or changes state. Deleting a
/// subscription drops its clusters.
pub async fn put_subscription(
    State(state): State<AppState>,
    Path(subscription_id): Path<String>,
    Extension(ctx): Extension<RequestContext>,
    uri: Uri,
) -> Result<Json<Subscription>, CloudError> {
    require_api_version(&uri)?;

    let subscription: Subscription =
        serde_json::from_slice(&ctx.body).map_err(CloudError::invalid_request_content)?;

    let update = state
        .cache
        .set_subscription(&subscription_id, subscription.clone())
        .await;

    info!(
        subscription_id = %subscription_id,
        previous = update.previous.map(|s| s.state.as_str()).unwrap_or("None"),
        state = %subscription.state,
        "subscription state updated"
    );
    if update.clusters_removed > 0 {
        info!(
            subscription_id = %subscription_id,
            count = update.clusters_removed,
            "removed clusters of deleted subscription"
        );
    }

    Ok(Json(subscription))
}

fn require_api_version(uri: &Uri) -> Result<(), CloudError> {
    match api_version_param(uri) {
        None => Err(CloudError::missing_parameter(API_VERSION_PARAMETER)),
        Some(v) if v != SUBSCRIPTION_API_VERSION => Err(CloudError::new(
            StatusCode::BAD_REQUEST,
            CODE_INVALID_PARAMETER,
            API_VERSION_PARAMETER,
            format!(
                "The api-version '{}' is invalid. The supported version is '{}'.",
                v, SUBSCRIPTION_API_VERSION
            ),
        )),
        Some(_) => Ok(()),
    }
}

pub mod clusters;
pub mod health;
pub mod preflight;
pub mod subscriptions;

use crate::middleware::{api_version, logging, metrics, subscription_state};
use crate::state::AppState;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use hcp_arm::CloudError;
use tower::ServiceBuilder;

// Literal segments are lowercase: the path has been lowercased before routing.
const SUBSCRIPTION: &str = "/subscriptions/:subscription_id";
const RESOURCE_GROUP: &str = "/subscriptions/:subscription_id/resourcegroups/:resource_group_name";
const CLUSTERS: &str = "/providers/microsoft.redhatopenshift/hcpopenshiftclusters";

/// Builds the router over the ARM path hierarchy.
///
/// Resource routes run the post-routing stages in order: logging,
/// api-version, subscription state. Preflight skips the api-version stage
/// since each embedded resource names its own version.
pub fn router(state: AppState) -> Router {
    let cluster_collection = format!("{}{}", RESOURCE_GROUP, CLUSTERS);
    let cluster = format!("{}/:resource_name", cluster_collection);

    let resources = Router::new()
        .route(
            &format!("{}{}", SUBSCRIPTION, CLUSTERS),
            get(clusters::list_by_subscription),
        )
        .route(
            &format!("{}/locations/:location{}", SUBSCRIPTION, CLUSTERS),
            get(clusters::list_by_location),
        )
        .route(&cluster_collection, get(clusters::list_by_resource_group))
        .route(
            &cluster,
            get(clusters::read)
                .put(clusters::create_or_update)
                .patch(clusters::patch)
                .delete(clusters::delete),
        )
        .route(&format!("{}/:action_name", cluster), post(clusters::action))
        .route_layer(
            ServiceBuilder::new()
                .layer(from_fn(logging::handle_post_mux))
                .layer(from_fn_with_state(state.clone(), api_version::handle))
                .layer(from_fn_with_state(state.clone(), subscription_state::handle)),
        );

    let deployments = Router::new()
        .route(
            &format!(
                "{}/providers/microsoft.redhatopenshift/deployments/:deployment_name/preflight",
                RESOURCE_GROUP
            ),
            post(preflight::preflight),
        )
        .route_layer(
            ServiceBuilder::new()
                .layer(from_fn(logging::handle_post_mux))
                .layer(from_fn_with_state(state.clone(), subscription_state::handle)),
        );

    Router::new()
        .route("/healthz/ready", get(health::ready))
        .route("/metrics", get(health::metrics))
        .route("/location", get(health::location))
        .route(
            SUBSCRIPTION,
            get(subscriptions::get_subscription).put(subscriptions::put_subscription),
        )
        .merge(resources)
        .merge(deployments)
        .route_layer(from_fn(metrics::tag_route))
        // A known path with an unrouted method is reported like an unknown path
        .method_not_allowed_fallback(not_found)
        .fallback(not_found)
        .with_state(state)
}

pub async fn not_found() -> impl IntoResponse {
    CloudError::not_found()
}

use crate::context::RequestContext;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{Method, StatusCode, Uri};
use axum::{Extension, Json};
use hcp_api::validation::is_valid_resource_name;
use hcp_api::{HcpOpenShiftCluster, ProvisioningState, Version, CLUSTER_RESOURCE_TYPE};
use hcp_arm::cloud_error::CODE_INVALID_RESOURCE_NAME;
use hcp_arm::{CloudError, ResourceId, SystemData};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct SubscriptionPath {
    pub subscription_id: String,
}

#[derive(Debug, Deserialize)]
pub struct LocationPath {
    pub subscription_id: String,
    pub location: String,
}

#[derive(Debug, Deserialize)]
pub struct ResourceGroupPath {
    pub resource_group_name: String,
}

/// ARM collection envelope
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub value: Vec<Value>,
}

pub async fn list_by_subscription(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(path): Path<SubscriptionPath>,
) -> Result<Json<ListResponse>, CloudError> {
    let prefix = format!("/subscriptions/{}/", path.subscription_id);
    let clusters = state.cache.list_clusters(&prefix).await;
    render_list(&ctx, clusters.iter())
}

pub async fn list_by_location(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(path): Path<LocationPath>,
) -> Result<Json<ListResponse>, CloudError> {
    let prefix = format!("/subscriptions/{}/", path.subscription_id);
    let clusters = state.cache.list_clusters(&prefix).await;
    render_list(
        &ctx,
        clusters
            .iter()
            .filter(|c| c.location.eq_ignore_ascii_case(&path.location)),
    )
}

pub async fn list_by_resource_group(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(path): Path<ResourceGroupPath>,
    uri: Uri,
) -> Result<Json<ListResponse>, CloudError> {
    let prefix = format!("{}/", uri.path().trim_end_matches('/'));
    let clusters = state.cache.list_clusters(&prefix).await;
    info!(
        resource_group = %path.resource_group_name,
        count = clusters.len(),
        "listing clusters"
    );
    render_list(&ctx, clusters.iter())
}

pub async fn read(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    uri: Uri,
) -> Result<Json<Value>, CloudError> {
    let version = version_of(&ctx)?;
    match state.cache.get_cluster(uri.path()).await {
        Some(cluster) => Ok(Json(render(version.as_ref(), &cluster)?)),
        None => Err(CloudError::resource_not_found(&resource_id_of(&ctx, &uri)?)),
    }
}

/// Validates the body against the stored cluster, if any, and stores the
/// result with its server-assigned fields. The lookup, validation and write
/// happen under a single cache lock.
pub async fn create_or_update(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    method: Method,
    uri: Uri,
) -> Result<(StatusCode, Json<Value>), CloudError> {
    let version = version_of(&ctx)?;
    let resource_id = resource_id_of(&ctx, &uri)?;
    let name = resource_id.name.clone().unwrap_or_default();

    if !is_valid_resource_name(&name) {
        return Err(CloudError::new(
            StatusCode::BAD_REQUEST,
            CODE_INVALID_RESOURCE_NAME,
            &resource_id.to_string(),
            format!("The resource name '{}' is invalid.", name),
        ));
    }

    let mut created = false;
    let cluster = state
        .cache
        .upsert_cluster(uri.path(), |current| {
            let mut cluster = version.unmarshal_cluster(&ctx.body, &method, current)?;
            cluster.id = resource_id.to_string();
            cluster.name = name.clone();
            cluster.resource_type = CLUSTER_RESOURCE_TYPE.to_string();
            cluster.properties.provisioning_state = ProvisioningState::Succeeded;
            cluster.system_data = SystemData::merge_update(
                current.and_then(|c| c.system_data.as_ref()),
                ctx.system_data.as_ref(),
            );
            created = current.is_none();
            Ok::<_, CloudError>(cluster)
        })
        .await?;

    info!(resource_id = %cluster.id, created, "cluster stored");
    Ok((StatusCode::CREATED, Json(render(version.as_ref(), &cluster)?)))
}

/// Accepted without being applied.
pub async fn patch() -> StatusCode {
    StatusCode::ACCEPTED
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    uri: Uri,
) -> Result<StatusCode, CloudError> {
    match state.cache.delete_cluster(uri.path()).await {
        Some(cluster) => {
            info!(resource_id = %cluster.id, "cluster deleted");
            Ok(StatusCode::ACCEPTED)
        }
        None => Err(CloudError::resource_not_found(&resource_id_of(&ctx, &uri)?)),
    }
}

/// Custom resource actions are acknowledged and not yet acted on.
pub async fn action() -> StatusCode {
    StatusCode::OK
}

fn version_of(ctx: &RequestContext) -> Result<Arc<dyn Version>, CloudError> {
    ctx.api_version.clone().ok_or_else(|| {
        error!("no API version resolved for a versioned route");
        CloudError::internal_server_error()
    })
}

/// Resource ID in the case the client sent it.
fn resource_id_of(ctx: &RequestContext, uri: &Uri) -> Result<ResourceId, CloudError> {
    let path = ctx.original_path.as_deref().unwrap_or(uri.path());
    ResourceId::parse(path).map_err(|_| CloudError::not_found())
}

fn render(version: &dyn Version, cluster: &HcpOpenShiftCluster) -> Result<Value, CloudError> {
    version.render_cluster(cluster).map_err(|e| {
        error!(error = %e, resource_id = %cluster.id, "failed to render cluster");
        CloudError::internal_server_error()
    })
}

fn render_list<'a>(
    ctx: &RequestContext,
    clusters: impl Iterator<Item = &'a HcpOpenShiftCluster>,
) -> Result<Json<ListResponse>, CloudError> {
    let version = version_of(ctx)?;
    let value = clusters
        .map(|cluster| render(version.as_ref(), cluster))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(ListResponse { value }))
}

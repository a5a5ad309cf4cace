use crate::context::RequestContext;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::Method;
use axum::{Extension, Json};
use hcp_api::validation::is_valid_resource_name;
use hcp_api::CLUSTER_RESOURCE_TYPE;
use hcp_arm::cloud_error::{
    CODE_INVALID_REQUEST_CONTENT, CODE_INVALID_RESOURCE_NAME, CODE_MULTIPLE_ERRORS_OCCURRED,
};
use hcp_arm::preflight::{
    detect_tle, DeploymentPreflight, DeploymentPreflightResource, PreflightResponse,
};
use hcp_arm::{CloudError, CloudErrorBody};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
pub struct PreflightPath {
    pub subscription_id: String,
    pub resource_group_name: String,
    pub deployment_name: String,
}

/// Validates the resources of a pending deployment as if each were being
/// created. Validation is best-effort: entries that cannot be checked are
/// logged and skipped.
pub async fn preflight(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(path): Path<PreflightPath>,
) -> Result<Json<PreflightResponse>, CloudError> {
    let deployment = DeploymentPreflight::from_body(&ctx.body)?;
    debug!(
        deployment = %path.deployment_name,
        resources = deployment.resources.len(),
        "running deployment preflight"
    );

    let mut errors = vec![];
    for (index, raw) in deployment.resources.iter().enumerate() {
        if let Some(error) = validate_resource(&state, &path, index, raw) {
            errors.push(error);
        }
    }

    Ok(Json(PreflightResponse::from_errors(errors)))
}

fn validate_resource(
    state: &AppState,
    path: &PreflightPath,
    index: usize,
    raw: &Value,
) -> Option<CloudErrorBody> {
    // Template expressions are only resolved by ARM at deployment time
    if detect_tle(raw) {
        debug!(index, "skipping resource with template language expressions");
        return None;
    }

    let resource: DeploymentPreflightResource = match serde_json::from_value(raw.clone()) {
        Ok(resource) => resource,
        Err(e) => {
            warn!(index, error = %e, "skipping malformed preflight resource");
            return None;
        }
    };

    if !resource.resource_type.eq_ignore_ascii_case(CLUSTER_RESOURCE_TYPE) {
        debug!(index, resource_type = %resource.resource_type, "skipping foreign resource type");
        return None;
    }

    let Some(version) = state.api_registry.lookup(&resource.api_version) else {
        warn!(index, api_version = %resource.api_version, "skipping resource with unknown API version");
        return None;
    };

    let body = match serde_json::to_vec(raw) {
        Ok(body) => body,
        Err(e) => {
            warn!(index, error = %e, "skipping unserializable preflight resource");
            return None;
        }
    };

    let target = resource.resource_id(&path.subscription_id, &path.resource_group_name);
    let mut code = CODE_INVALID_REQUEST_CONTENT.to_string();
    let mut details = vec![];
    if !is_valid_resource_name(&resource.name) {
        details.push(CloudErrorBody::new(
            CODE_INVALID_RESOURCE_NAME,
            &target,
            format!("The resource name '{}' is invalid.", resource.name),
        ));
    }
    if let Err(err) = version.unmarshal_cluster(&body, &Method::PUT, None) {
        code = err.error.code.clone();
        if err.error.details.is_empty() {
            details.push(err.error);
        } else {
            details.extend(err.error.details);
        }
    }

    if details.is_empty() {
        return None;
    }
    if details.len() > 1 {
        code = CODE_MULTIPLE_ERRORS_OCCURRED.to_string();
    }
    Some(CloudErrorBody {
        code,
        message: format!("Content validation failed for '{}'", resource.name),
        target,
        details,
    })
}

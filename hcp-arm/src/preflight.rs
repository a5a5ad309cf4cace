use crate::cloud_error::{CloudError, CloudErrorBody};
use crate::resource_id::ResourceId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body of a deployment preflight call
#[derive(Debug, Deserialize)]
pub struct DeploymentPreflight {
    /// Raw resource declarations; each is decoded on its own so a malformed
    /// entry does not sink the whole batch
    pub resources: Vec<Value>,
}

impl DeploymentPreflight {
    pub fn from_body(body: &[u8]) -> Result<Self, CloudError> {
        serde_json::from_slice(body).map_err(CloudError::invalid_request_content)
    }
}

/// Common envelope fields of a resource declared in a deployment template
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentPreflightResource {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub api_version: String,
}

impl DeploymentPreflightResource {
    pub fn resource_id(&self, subscription_id: &str, resource_group: &str) -> String {
        ResourceId::new_resource(subscription_id, resource_group, &self.resource_type, &self.name)
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum PreflightStatus {
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreflightResponse {
    pub status: PreflightStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CloudErrorBody>,
}

impl PreflightResponse {
    pub fn from_errors(errors: Vec<CloudErrorBody>) -> Self {
        match CloudErrorBody::from_slice(errors, "Multiple resources failed preflight validation") {
            Some(error) => Self {
                status: PreflightStatus::Failed,
                error: Some(error),
            },
            None => Self {
                status: PreflightStatus::Succeeded,
                error: None,
            },
        }
    }
}

/// Reports whether any string in `value` is an ARM template language
/// expression (`"[...]"`, but not the `"[[..."` escape for a literal bracket).
pub fn detect_tle(value: &Value) -> bool {
    match value {
        Value::String(s) => is_tle(s),
        Value::Array(items) => items.iter().any(detect_tle),
        Value::Object(map) => map.iter().any(|(k, v)| is_tle(k) || detect_tle(v)),
        _ => false,
    }
}

fn is_tle(s: &str) -> bool {
    let s = s.trim();
    s.len() >= 2 && s.starts_with('[') && !s.starts_with("[[") && s.ends_with(']')
}

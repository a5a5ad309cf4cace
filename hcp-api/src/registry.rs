use crate::error::ApiError;
use crate::models::{HcpOpenShiftCluster, ProvisioningState};
use crate::validation::{read_only_error, validate_cluster, validate_cluster_update};
use crate::{v20240610preview, v20251223preview};
use hcp_arm::CloudError;
use http::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One public API version of the resource provider.
///
/// Implementations translate between their wire representation and the
/// internal [`HcpOpenShiftCluster`].
pub trait Version: Send + Sync {
    fn name(&self) -> &'static str;

    /// Renders the internal cluster in this version's JSON shape.
    fn render_cluster(&self, cluster: &HcpOpenShiftCluster) -> Result<Value, ApiError>;

    /// Decodes and validates a request body into the internal cluster.
    ///
    /// `current` is the stored resource, if any. A PATCH overlays the body on
    /// it; any other method replaces it, starting from defaults.
    fn unmarshal_cluster(
        &self,
        body: &[u8],
        method: &Method,
        current: Option<&HcpOpenShiftCluster>,
    ) -> Result<HcpOpenShiftCluster, CloudError>;
}

/// Wire representation of a cluster in a particular API version
pub(crate) trait VersionedCluster: Serialize + DeserializeOwned {
    fn from_internal(cluster: &HcpOpenShiftCluster) -> Self;

    fn provisioning_state(&self) -> Option<ProvisioningState>;

    /// Copies every field present in the request onto `out`.
    fn normalize(&self, out: &mut HcpOpenShiftCluster);
}

pub(crate) fn render<T: VersionedCluster>(cluster: &HcpOpenShiftCluster) -> Result<Value, ApiError> {
    Ok(serde_json::to_value(T::from_internal(cluster))?)
}

pub(crate) fn unmarshal<T: VersionedCluster>(
    body: &[u8],
    method: &Method,
    current: Option<&HcpOpenShiftCluster>,
) -> Result<HcpOpenShiftCluster, CloudError> {
    let versioned: T = serde_json::from_slice(body).map_err(CloudError::invalid_request_content)?;

    let mut errors = vec![];
    if let Some(state) = versioned.provisioning_state() {
        if current.map(|c| c.properties.provisioning_state) != Some(state) {
            errors.push(read_only_error("properties.provisioningState"));
        }
    }

    let mut cluster = match current {
        Some(current) if *method == Method::PATCH => current.clone(),
        _ => HcpOpenShiftCluster::default(),
    };
    versioned.normalize(&mut cluster);

    errors.extend(validate_cluster(&cluster));
    if let Some(current) = current {
        errors.extend(validate_cluster_update(&cluster, current));
    }

    match CloudError::content_validation(errors) {
        Some(err) => Err(err),
        None => Ok(cluster),
    }
}

/// Set of API versions this frontend serves, keyed by lowercase name
#[derive(Clone)]
pub struct ApiRegistry {
    versions: BTreeMap<&'static str, Arc<dyn Version>>,
}

impl ApiRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            versions: BTreeMap::new(),
        };
        registry.register(Arc::new(v20240610preview::V20240610Preview));
        registry.register(Arc::new(v20251223preview::V20251223Preview));
        registry
    }

    pub fn register(&mut self, version: Arc<dyn Version>) {
        tracing::debug!(version = version.name(), "registered API version");
        self.versions.insert(version.name(), version);
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Version>> {
        self.versions.get(name.to_ascii_lowercase().as_str()).cloned()
    }

    pub fn require(&self, name: &str) -> Result<Arc<dyn Version>, ApiError> {
        self.lookup(name)
            .ok_or_else(|| ApiError::UnknownVersion(name.to_string()))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.versions.keys().copied().collect()
    }
}

impl Default for ApiRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcp_arm::cloud_error::{CODE_INVALID_REQUEST_CONTENT, CODE_MULTIPLE_ERRORS_OCCURRED};
    use serde_json::json;

    fn body(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    fn stored() -> HcpOpenShiftCluster {
        let version = ApiRegistry::new().require("2024-06-10-preview").unwrap();
        let mut cluster = version
            .unmarshal_cluster(
                &body(json!({"location": "eastus", "properties": {"dns": {"baseDomainPrefix": "dev"}}})),
                &Method::PUT,
                None,
            )
            .unwrap();
        cluster.properties.provisioning_state = ProvisioningState::Succeeded;
        cluster
    }

    #[test]
    fn test_lookup() {
        let registry = ApiRegistry::new();
        assert_eq!(registry.names(), vec!["2024-06-10-preview", "2025-12-23-preview"]);
        assert!(registry.lookup("2024-06-10-PREVIEW").is_some());
        assert!(registry.lookup("2.0").is_none());
        assert!(matches!(
            registry.require("1999-01-01"),
            Err(ApiError::UnknownVersion(v)) if v == "1999-01-01"
        ));
    }

    #[test]
    fn test_put_starts_from_defaults() {
        let cluster = stored();
        assert_eq!(cluster.location, "eastus");
        assert_eq!(cluster.properties.version.channel_group, "stable");
        assert_eq!(cluster.properties.network.host_prefix, 23);
        assert_eq!(cluster.properties.dns.base_domain_prefix, "dev");
    }

    #[test]
    fn test_malformed_body() {
        let version = ApiRegistry::new().require("2024-06-10-preview").unwrap();
        let err = version
            .unmarshal_cluster(b"{\"location\":", &Method::PUT, None)
            .unwrap_err();
        assert_eq!(err.code(), CODE_INVALID_REQUEST_CONTENT);
        assert_eq!(err.status, http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_patch_overlays_current() {
        let current = stored();
        let version = ApiRegistry::new().require("2024-06-10-preview").unwrap();
        let patched = version
            .unmarshal_cluster(
                &body(json!({"tags": {"env": "dev"}, "properties": {"version": {"channelGroup": "fast"}}})),
                &Method::PATCH,
                Some(&current),
            )
            .unwrap();
        assert_eq!(patched.location, "eastus");
        assert_eq!(patched.properties.dns.base_domain_prefix, "dev");
        assert_eq!(patched.properties.version.channel_group, "fast");
        assert_eq!(patched.tags.get("env").map(String::as_str), Some("dev"));
    }

    #[test]
    fn test_provisioning_state_is_read_only() {
        let version = ApiRegistry::new().require("2024-06-10-preview").unwrap();
        let err = version
            .unmarshal_cluster(
                &body(json!({"location": "eastus", "properties": {"provisioningState": "Succeeded"}})),
                &Method::PUT,
                None,
            )
            .unwrap_err();
        assert_eq!(err.error.target, "properties.provisioningState");

        let current = stored();
        let echoed = json!({
            "location": "eastus",
            "properties": {"provisioningState": "Succeeded", "dns": {"baseDomainPrefix": "dev"}}
        });
        assert!(version
            .unmarshal_cluster(&body(echoed), &Method::PUT, Some(&current))
            .is_ok());
    }

    #[test]
    fn test_errors_are_aggregated() {
        let current = stored();
        let version = ApiRegistry::new().require("2024-06-10-preview").unwrap();
        let err = version
            .unmarshal_cluster(
                &body(json!({"location": "westus", "properties": {"network": {"hostPrefix": 40}}})),
                &Method::PUT,
                Some(&current),
            )
            .unwrap_err();
        assert_eq!(err.code(), CODE_MULTIPLE_ERRORS_OCCURRED);
        let targets: Vec<&str> = err.error.details.iter().map(|d| d.target.as_str()).collect();
        assert!(targets.contains(&"properties.network.hostPrefix"));
        assert!(targets.contains(&"location"));
        assert!(targets.contains(&"properties.dns.baseDomainPrefix"));
    }
}

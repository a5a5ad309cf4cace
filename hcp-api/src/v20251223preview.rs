//! `2025-12-23-preview` representation; adds node drain timeout.

use crate::error::ApiError;
use crate::models::{HcpOpenShiftCluster, ProvisioningState};
use crate::registry::{self, Version, VersionedCluster};
use crate::v20240610preview::{
    envelope_normalize, non_empty, ApiProfile, DnsProfile, NetworkProfile, VersionProfile,
};
use hcp_arm::{CloudError, SystemData};
use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const API_VERSION: &str = "2025-12-23-preview";

pub struct V20251223Preview;

impl Version for V20251223Preview {
    fn name(&self) -> &'static str {
        API_VERSION
    }

    fn render_cluster(&self, cluster: &HcpOpenShiftCluster) -> Result<Value, ApiError> {
        registry::render::<HcpOpenShiftClusterResource>(cluster)
    }

    fn unmarshal_cluster(
        &self,
        body: &[u8],
        method: &Method,
        current: Option<&HcpOpenShiftCluster>,
    ) -> Result<HcpOpenShiftCluster, CloudError> {
        registry::unmarshal::<HcpOpenShiftClusterResource>(body, method, current)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HcpOpenShiftClusterResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_data: Option<SystemData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ClusterProperties>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<DnsProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<ApiProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_drain_timeout_minutes: Option<i32>,
}

impl VersionedCluster for HcpOpenShiftClusterResource {
    fn from_internal(cluster: &HcpOpenShiftCluster) -> Self {
        let props = &cluster.properties;
        Self {
            id: non_empty(&cluster.id),
            name: non_empty(&cluster.name),
            resource_type: non_empty(&cluster.resource_type),
            location: non_empty(&cluster.location),
            tags: (!cluster.tags.is_empty()).then(|| cluster.tags.clone()),
            system_data: cluster.system_data.clone(),
            properties: Some(ClusterProperties {
                provisioning_state: Some(props.provisioning_state),
                version: Some(VersionProfile::from_internal(&props.version)),
                dns: Some(DnsProfile::from_internal(&props.dns)),
                network: Some(NetworkProfile::from_internal(&props.network)),
                api: Some(ApiProfile::from_internal(&props.api)),
                node_drain_timeout_minutes: Some(props.node_drain_timeout_minutes),
            }),
        }
    }

    fn provisioning_state(&self) -> Option<ProvisioningState> {
        self.properties.as_ref().and_then(|p| p.provisioning_state)
    }

    fn normalize(&self, out: &mut HcpOpenShiftCluster) {
        envelope_normalize(&self.location, &self.tags, out);

        let Some(props) = &self.properties else {
            return;
        };
        if let Some(version) = &props.version {
            version.normalize(&mut out.properties.version);
        }
        if let Some(dns) = &props.dns {
            dns.normalize(&mut out.properties.dns);
        }
        if let Some(network) = &props.network {
            network.normalize(&mut out.properties.network);
        }
        if let Some(api) = &props.api {
            api.normalize(&mut out.properties.api);
        }
        if let Some(minutes) = props.node_drain_timeout_minutes {
            out.properties.node_drain_timeout_minutes = minutes;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcp_arm::cloud_error::CODE_INVALID_REQUEST_CONTENT;
    use serde_json::json;

    #[test]
    fn test_node_drain_timeout() {
        let body = serde_json::to_vec(&json!({
            "location": "eastus",
            "properties": {"nodeDrainTimeoutMinutes": 45}
        }))
        .unwrap();
        let cluster = V20251223Preview
            .unmarshal_cluster(&body, &Method::PUT, None)
            .unwrap();
        assert_eq!(cluster.properties.node_drain_timeout_minutes, 45);

        let json = V20251223Preview.render_cluster(&cluster).unwrap();
        assert_eq!(json["properties"]["nodeDrainTimeoutMinutes"], 45);
    }

    #[test]
    fn test_node_drain_timeout_range() {
        let body = serde_json::to_vec(&json!({
            "location": "eastus",
            "properties": {"nodeDrainTimeoutMinutes": 10081}
        }))
        .unwrap();
        let err = V20251223Preview
            .unmarshal_cluster(&body, &Method::PUT, None)
            .unwrap_err();
        assert_eq!(err.code(), CODE_INVALID_REQUEST_CONTENT);
        assert_eq!(err.error.target, "properties.nodeDrainTimeoutMinutes");
    }
}

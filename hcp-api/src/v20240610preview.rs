//! `2024-06-10-preview` representation of hosted control plane clusters.
//!
//! Every field is optional on the wire so that PATCH bodies and partial PUT
//! bodies decode; absent fields are never emitted.

use crate::error::ApiError;
use crate::models::{self, HcpOpenShiftCluster, NetworkType, ProvisioningState, Visibility};
use crate::registry::{self, Version, VersionedCluster};
use hcp_arm::{CloudError, SystemData};
use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const API_VERSION: &str = "2024-06-10-preview";

pub struct V20240610Preview;

impl Version for V20240610Preview {
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
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VersionProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_group: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DnsProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_domain_prefix: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_type: Option<NetworkType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_prefix: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
}

pub(crate) fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl VersionProfile {
    pub(crate) fn from_internal(profile: &models::VersionProfile) -> Self {
        Self {
            id: non_empty(&profile.id),
            channel_group: non_empty(&profile.channel_group),
        }
    }

    pub(crate) fn normalize(&self, out: &mut models::VersionProfile) {
        if let Some(id) = &self.id {
            out.id = id.clone();
        }
        if let Some(channel_group) = &self.channel_group {
            out.channel_group = channel_group.clone();
        }
    }
}

impl DnsProfile {
    pub(crate) fn from_internal(profile: &models::DnsProfile) -> Self {
        Self {
            base_domain_prefix: non_empty(&profile.base_domain_prefix),
        }
    }

    pub(crate) fn normalize(&self, out: &mut models::DnsProfile) {
        if let Some(prefix) = &self.base_domain_prefix {
            out.base_domain_prefix = prefix.clone();
        }
    }
}

impl NetworkProfile {
    pub(crate) fn from_internal(profile: &models::NetworkProfile) -> Self {
        Self {
            network_type: Some(profile.network_type),
            pod_cidr: non_empty(&profile.pod_cidr),
            service_cidr: non_empty(&profile.service_cidr),
            machine_cidr: non_empty(&profile.machine_cidr),
            host_prefix: Some(profile.host_prefix),
        }
    }

    pub(crate) fn normalize(&self, out: &mut models::NetworkProfile) {
        if let Some(network_type) = self.network_type {
            out.network_type = network_type;
        }
        if let Some(cidr) = &self.pod_cidr {
            out.pod_cidr = cidr.clone();
        }
        if let Some(cidr) = &self.service_cidr {
            out.service_cidr = cidr.clone();
        }
        if let Some(cidr) = &self.machine_cidr {
            out.machine_cidr = cidr.clone();
        }
        if let Some(host_prefix) = self.host_prefix {
            out.host_prefix = host_prefix;
        }
    }
}

impl ApiProfile {
    pub(crate) fn from_internal(profile: &models::ApiProfile) -> Self {
        Self {
            visibility: Some(profile.visibility),
        }
    }

    pub(crate) fn normalize(&self, out: &mut models::ApiProfile) {
        if let Some(visibility) = self.visibility {
            out.visibility = visibility;
        }
    }
}

/// Tracked-resource envelope fields shared by every version.
pub(crate) fn envelope_normalize(
    location: &Option<String>,
    tags: &Option<BTreeMap<String, String>>,
    out: &mut HcpOpenShiftCluster,
) {
    if let Some(location) = location {
        out.location = location.clone();
    }
    if let Some(tags) = tags {
        out.tags = tags.clone();
    }
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
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_omits_empty_fields() {
        let mut cluster = HcpOpenShiftCluster::default();
        cluster.name = "dev".to_string();
        cluster.location = "eastus".to_string();

        let json = V20240610Preview.render_cluster(&cluster).unwrap();
        assert_eq!(json["name"], "dev");
        assert_eq!(json["type"], "Microsoft.RedHatOpenShift/hcpOpenShiftClusters");
        assert!(json.get("id").is_none());
        assert!(json.get("tags").is_none());
        assert!(json.get("systemData").is_none());
        assert!(json["properties"]["dns"].get("baseDomainPrefix").is_none());
        assert_eq!(json["properties"]["network"]["podCidr"], "10.128.0.0/14");
        assert_eq!(json["properties"]["api"]["visibility"], "Public");
        assert!(json["properties"].get("nodeDrainTimeoutMinutes").is_none());
    }

    #[test]
    fn test_decode_partial_body() {
        let resource: HcpOpenShiftClusterResource = serde_json::from_value(json!({
            "location": "eastus",
            "properties": {"network": {"hostPrefix": 24}}
        }))
        .unwrap();
        let mut cluster = HcpOpenShiftCluster::default();
        resource.normalize(&mut cluster);
        assert_eq!(cluster.location, "eastus");
        assert_eq!(cluster.properties.network.host_prefix, 24);
        assert_eq!(cluster.properties.network.service_cidr, "172.30.0.0/16");
    }

    #[test]
    fn test_wrong_field_type_is_rejected() {
        let result: Result<HcpOpenShiftClusterResource, _> =
            serde_json::from_value(json!({"properties": {"network": {"hostPrefix": "23"}}}));
        assert!(result.is_err());
    }

    #[test]
    fn test_ignores_newer_fields() {
        let mut cluster = HcpOpenShiftCluster::default();
        let resource: HcpOpenShiftClusterResource =
            serde_json::from_value(json!({"properties": {"nodeDrainTimeoutMinutes": 30}})).unwrap();
        resource.normalize(&mut cluster);
        assert_eq!(cluster.properties.node_drain_timeout_minutes, 0);
    }
}

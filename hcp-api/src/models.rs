use hcp_arm::SystemData;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const PROVIDER_NAMESPACE: &str = "Microsoft.RedHatOpenShift";
pub const CLUSTER_RESOURCE_TYPE_NAME: &str = "hcpOpenShiftClusters";
pub const CLUSTER_RESOURCE_TYPE: &str = "Microsoft.RedHatOpenShift/hcpOpenShiftClusters";

/// Provisioning state of an ARM resource
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ProvisioningState {
    #[default]
    Accepted,
    Provisioning,
    Updating,
    Succeeded,
    Failed,
    Canceled,
    Deleting,
}

/// Cluster network plugin
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum NetworkType {
    #[default]
    OVNKubernetes,
    Other,
}

/// Reachability of the cluster API server
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// Canonical, version-independent representation of a hosted control plane cluster.
///
/// Every API version converts to and from this type; the cache only ever holds
/// this form.
#[derive(Debug, Clone, PartialEq)]
pub struct HcpOpenShiftCluster {
    pub id: String,
    pub name: String,
    pub resource_type: String,
    pub location: String,
    pub tags: BTreeMap<String, String>,
    pub system_data: Option<SystemData>,
    pub properties: ClusterProperties,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClusterProperties {
    pub provisioning_state: ProvisioningState,
    pub version: VersionProfile,
    pub dns: DnsProfile,
    pub network: NetworkProfile,
    pub api: ApiProfile,
    /// Minutes to wait for node drain before forcing deletion; 0 means no limit
    pub node_drain_timeout_minutes: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VersionProfile {
    pub id: String,
    pub channel_group: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DnsProfile {
    pub base_domain_prefix: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkProfile {
    pub network_type: NetworkType,
    pub pod_cidr: String,
    pub service_cidr: String,
    pub machine_cidr: String,
    pub host_prefix: i32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiProfile {
    pub visibility: Visibility,
}

impl Default for HcpOpenShiftCluster {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            resource_type: CLUSTER_RESOURCE_TYPE.to_string(),
            location: String::new(),
            tags: BTreeMap::new(),
            system_data: None,
            properties: ClusterProperties::default(),
        }
    }
}

impl Default for VersionProfile {
    fn default() -> Self {
        Self {
            id: String::new(),
            channel_group: "stable".to_string(),
        }
    }
}

impl Default for NetworkProfile {
    fn default() -> Self {
        Self {
            network_type: NetworkType::OVNKubernetes,
            pod_cidr: "10.128.0.0/14".to_string(),
            service_cidr: "172.30.0.0/16".to_string(),
            machine_cidr: "10.0.0.0/16".to_string(),
            host_prefix: 23,
        }
    }
}

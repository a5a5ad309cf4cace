//! Static validation of cluster resources.
//!
//! Validation runs on the internal representation so every API version shares
//! the same rules. Errors are collected rather than returned on first failure.

use crate::models::HcpOpenShiftCluster;
use hcp_arm::cloud_error::CODE_INVALID_REQUEST_CONTENT;
use hcp_arm::CloudErrorBody;
use regex::Regex;
use std::net::Ipv4Addr;
use std::sync::OnceLock;

pub const CHANNEL_GROUPS: &[&str] = &["stable", "candidate", "fast", "nightly"];
pub const MAX_NODE_DRAIN_TIMEOUT_MINUTES: i32 = 10080;

fn resource_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-Z][-a-zA-Z0-9]{1,52}[a-zA-Z0-9]$").expect("valid resource name pattern")
    })
}

fn dns_prefix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z][-a-z0-9]{0,13}[a-z0-9]$").expect("valid DNS prefix pattern")
    })
}

/// Cluster names are 3-54 characters, start with a letter and end alphanumeric.
pub fn is_valid_resource_name(name: &str) -> bool {
    resource_name_pattern().is_match(name)
}

pub fn field_error(target: &str, message: impl Into<String>) -> CloudErrorBody {
    CloudErrorBody::new(CODE_INVALID_REQUEST_CONTENT, target, message)
}

pub fn read_only_error(target: &str) -> CloudErrorBody {
    field_error(target, format!("Property '{}' is read-only and cannot be set", target))
}

/// Checks a fully-normalized cluster on its own.
pub fn validate_cluster(cluster: &HcpOpenShiftCluster) -> Vec<CloudErrorBody> {
    let mut errors = vec![];
    let props = &cluster.properties;

    if cluster.location.trim().is_empty() {
        errors.push(field_error("location", "Missing required field 'location'"));
    }

    if !CHANNEL_GROUPS.contains(&props.version.channel_group.as_str()) {
        errors.push(field_error(
            "properties.version.channelGroup",
            format!(
                "Invalid value '{}' for field 'channelGroup' (must be one of: {})",
                props.version.channel_group,
                CHANNEL_GROUPS.join(" ")
            ),
        ));
    }

    let prefix = &props.dns.base_domain_prefix;
    if !prefix.is_empty() && !dns_prefix_pattern().is_match(prefix) {
        errors.push(field_error(
            "properties.dns.baseDomainPrefix",
            format!(
                "Invalid value '{}' for field 'baseDomainPrefix' (must be a lowercase DNS label of at most 15 characters)",
                prefix
            ),
        ));
    }

    for (field, value) in [
        ("podCidr", &props.network.pod_cidr),
        ("serviceCidr", &props.network.service_cidr),
        ("machineCidr", &props.network.machine_cidr),
    ] {
        if !is_ipv4_cidr(value) {
            errors.push(field_error(
                &format!("properties.network.{}", field),
                format!("Invalid CIDR '{}' for field '{}'", value, field),
            ));
        }
    }

    if !(23..=26).contains(&props.network.host_prefix) {
        errors.push(field_error(
            "properties.network.hostPrefix",
            format!(
                "Invalid value '{}' for field 'hostPrefix' (must be between 23 and 26)",
                props.network.host_prefix
            ),
        ));
    }

    if !(0..=MAX_NODE_DRAIN_TIMEOUT_MINUTES).contains(&props.node_drain_timeout_minutes) {
        errors.push(field_error(
            "properties.nodeDrainTimeoutMinutes",
            format!(
                "Invalid value '{}' for field 'nodeDrainTimeoutMinutes' (must be between 0 and {})",
                props.node_drain_timeout_minutes, MAX_NODE_DRAIN_TIMEOUT_MINUTES
            ),
        ));
    }

    errors
}

/// Checks fields that may not change once the cluster exists.
pub fn validate_cluster_update(
    updated: &HcpOpenShiftCluster,
    current: &HcpOpenShiftCluster,
) -> Vec<CloudErrorBody> {
    let mut errors = vec![];

    if !updated.location.eq_ignore_ascii_case(&current.location) {
        errors.push(immutable_error("location"));
    }
    if updated.properties.dns.base_domain_prefix != current.properties.dns.base_domain_prefix {
        errors.push(immutable_error("properties.dns.baseDomainPrefix"));
    }
    if updated.properties.network != current.properties.network {
        errors.push(immutable_error("properties.network"));
    }

    errors
}

fn immutable_error(target: &str) -> CloudErrorBody {
    field_error(target, format!("Field '{}' is immutable and cannot be changed", target))
}

fn is_ipv4_cidr(value: &str) -> bool {
    let Some((addr, prefix)) = value.split_once('/') else {
        return false;
    };
    addr.parse::<Ipv4Addr>().is_ok() && prefix.parse::<u8>().map(|p| p <= 32).unwrap_or(false)
}

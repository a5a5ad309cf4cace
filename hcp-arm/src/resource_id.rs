use crate::error::ArmError;
use std::fmt;

/// A parsed ARM resource ID:
/// `/subscriptions/{sub}[/resourceGroups/{rg}][/providers/{namespace}/{type}[/{name}]]`
///
/// Segment keywords match case-insensitively; values keep the case they were
/// given in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceId {
    pub subscription_id: String,
    pub resource_group: Option<String>,
    pub provider_namespace: Option<String>,
    pub resource_type: Option<String>,
    pub name: Option<String>,
}

impl ResourceId {
    pub fn parse(path: &str) -> Result<Self, ArmError> {
        let invalid = || ArmError::InvalidResourceId(path.to_string());
        let mut segments = path.split('/').filter(|s| !s.is_empty());

        match segments.next() {
            Some(s) if s.eq_ignore_ascii_case("subscriptions") => {}
            _ => return Err(invalid()),
        }
        let subscription_id = segments.next().ok_or_else(invalid)?.to_string();

        let mut id = Self {
            subscription_id,
            resource_group: None,
            provider_namespace: None,
            resource_type: None,
            name: None,
        };

        let mut next = segments.next();
        if let Some(s) = next {
            if s.eq_ignore_ascii_case("resourcegroups") {
                id.resource_group = Some(segments.next().ok_or_else(invalid)?.to_string());
                next = segments.next();
            }
        }

        if let Some(s) = next {
            if !s.eq_ignore_ascii_case("providers") {
                return Err(invalid());
            }
            id.provider_namespace = Some(segments.next().ok_or_else(invalid)?.to_string());
            id.resource_type = Some(segments.next().ok_or_else(invalid)?.to_string());
            id.name = segments.next().map(str::to_string);
        }

        if segments.next().is_some() {
            return Err(invalid());
        }

        Ok(id)
    }

    /// Builds the ID of a named resource in a resource group.
    pub fn new_resource(
        subscription_id: &str,
        resource_group: &str,
        full_type: &str,
        name: &str,
    ) -> Self {
        let (namespace, resource_type) = full_type.split_once('/').unwrap_or((full_type, ""));
        Self {
            subscription_id: subscription_id.to_string(),
            resource_group: Some(resource_group.to_string()),
            provider_namespace: Some(namespace.to_string()),
            resource_type: Some(resource_type.to_string()),
            name: Some(name.to_string()),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/subscriptions/{}", self.subscription_id)?;
        if let Some(group) = &self.resource_group {
            write!(f, "/resourceGroups/{}", group)?;
        }
        if let (Some(namespace), Some(resource_type)) = (&self.provider_namespace, &self.resource_type) {
            write!(f, "/providers/{}/{}", namespace, resource_type)?;
            if let Some(name) = &self.name {
                write!(f, "/{}", name)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cluster_id() {
        let id = ResourceId::parse(
            "/SUBSCRIPTIONS/00000000-0000-0000-0000-000000000000/ResourceGroups/MyGroup/providers/Microsoft.RedHatOpenShift/hcpOpenShiftClusters/MyCluster",
        )
        .unwrap();
        assert_eq!(id.subscription_id, "00000000-0000-0000-0000-000000000000");
        assert_eq!(id.resource_group.as_deref(), Some("MyGroup"));
        assert_eq!(id.provider_namespace.as_deref(), Some("Microsoft.RedHatOpenShift"));
        assert_eq!(id.resource_type.as_deref(), Some("hcpOpenShiftClusters"));
        assert_eq!(id.name.as_deref(), Some("MyCluster"));
        assert_eq!(
            id.to_string(),
            "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/MyGroup/providers/Microsoft.RedHatOpenShift/hcpOpenShiftClusters/MyCluster"
        );
    }

    #[test]
    fn test_parse_collection_scope() {
        let id = ResourceId::parse("/subscriptions/abc/providers/Microsoft.RedHatOpenShift/hcpOpenShiftClusters").unwrap();
        assert!(id.resource_group.is_none());
        assert!(id.name.is_none());
    }

    #[test]
    fn test_parse_rejects_non_resource_paths() {
        assert!(ResourceId::parse("/healthz/ready").is_err());
        assert!(ResourceId::parse("/subscriptions").is_err());
        assert!(ResourceId::parse("/subscriptions/abc/locations/eastus").is_err());
        assert!(ResourceId::parse("/subscriptions/abc/resourceGroups/rg/providers/ns/type/name/action").is_err());
    }

    #[test]
    fn test_new_resource_splits_type() {
        let id = ResourceId::new_resource("sub", "rg", "Microsoft.RedHatOpenShift/hcpOpenShiftClusters", "dev");
        assert_eq!(
            id.to_string(),
            "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.RedHatOpenShift/hcpOpenShiftClusters/dev"
        );
    }
}

use crate::error::ArmError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle stage of an Azure subscription as reported by ARM
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RegistrationState {
    /// Fully registered; every operation is allowed
    Registered,
    /// Unregistered from the resource provider
    Unregistered,
    /// Warned, typically over billing: reads and deletes only
    Warned,
    /// Suspended: reads and deletes only
    Suspended,
    /// Deleted: no operations allowed
    Deleted,
}

impl RegistrationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationState::Registered => "Registered",
            RegistrationState::Unregistered => "Unregistered",
            RegistrationState::Warned => "Warned",
            RegistrationState::Suspended => "Suspended",
            RegistrationState::Deleted => "Deleted",
        }
    }
}

impl fmt::Display for RegistrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subscription record pushed to the resource provider by ARM
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub state: RegistrationState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<SubscriptionProperties>,
}

impl Subscription {
    pub fn new(state: RegistrationState) -> Self {
        Self {
            state,
            registration_date: None,
            properties: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_placement_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub registered_features: Vec<Feature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_owner: Option<AccountOwner>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    pub name: String,
    pub state: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountOwner {
    pub puid: String,
    pub email: String,
}

/// Kind of identity that created or modified a resource
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CreatedByType {
    Application,
    Key,
    ManagedIdentity,
    User,
}

/// ARM resource system data, delivered in the `x-ms-arm-resource-system-data` header
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SystemData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_type: Option<CreatedByType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_by_type: Option<CreatedByType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_at: Option<DateTime<Utc>>,
}

impl SystemData {
    pub fn from_header(value: &str) -> Result<Self, ArmError> {
        serde_json::from_str(value).map_err(ArmError::InvalidSystemData)
    }

    /// Combine the creation fields of an existing resource with the
    /// modification fields of the current request.
    pub fn merge_update(existing: Option<&SystemData>, incoming: Option<&SystemData>) -> Option<SystemData> {
        match (existing, incoming) {
            (None, None) => None,
            (Some(existing), None) => Some(existing.clone()),
            (None, Some(incoming)) => Some(incoming.clone()),
            (Some(existing), Some(incoming)) => Some(SystemData {
                created_by: existing.created_by.clone(),
                created_by_type: existing.created_by_type,
                created_at: existing.created_at,
                last_modified_by: incoming.last_modified_by.clone(),
                last_modified_by_type: incoming.last_modified_by_type,
                last_modified_at: incoming.last_modified_at,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_roundtrip() {
        let body = r#"{
            "state": "Warned",
            "registrationDate": "2024-01-01T00:00:00Z",
            "properties": {
                "tenantId": "11111111-1111-1111-1111-111111111111",
                "registeredFeatures": [{"name": "Microsoft.RedHatOpenShift/Preview", "state": "Registered"}]
            }
        }"#;
        let sub: Subscription = serde_json::from_str(body).unwrap();
        assert_eq!(sub.state, RegistrationState::Warned);
        let props = sub.properties.as_ref().unwrap();
        assert_eq!(props.registered_features.len(), 1);

        let json = serde_json::to_value(&sub).unwrap();
        assert_eq!(json["state"], "Warned");
        assert!(json["properties"].get("quotaId").is_none());
    }

    #[test]
    fn test_unknown_state_is_rejected() {
        let result: Result<Subscription, _> = serde_json::from_str(r#"{"state":"Frozen"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_system_data_from_header() {
        let data = SystemData::from_header(
            r#"{"createdBy":"alice@example.com","createdByType":"User","createdAt":"2024-05-01T12:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(data.created_by.as_deref(), Some("alice@example.com"));
        assert_eq!(data.created_by_type, Some(CreatedByType::User));
        assert!(data.created_at.is_some());

        assert!(SystemData::from_header("{not json").is_err());
    }

    #[test]
    fn test_merge_update_keeps_creation_fields() {
        let existing = SystemData {
            created_by: Some("alice".to_string()),
            created_by_type: Some(CreatedByType::User),
            ..Default::default()
        };
        let incoming = SystemData {
            created_by: Some("bob".to_string()),
            last_modified_by: Some("bob".to_string()),
            last_modified_by_type: Some(CreatedByType::Application),
            ..Default::default()
        };
        let merged = SystemData::merge_update(Some(&existing), Some(&incoming)).unwrap();
        assert_eq!(merged.created_by.as_deref(), Some("alice"));
        assert_eq!(merged.last_modified_by.as_deref(), Some("bob"));
        assert_eq!(merged.last_modified_by_type, Some(CreatedByType::Application));
    }
}

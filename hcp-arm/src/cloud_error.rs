use crate::headers::HEADER_ERROR_CODE;
use crate::resource_id::ResourceId;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;

/// CloudError codes
pub const CODE_INTERNAL_SERVER_ERROR: &str = "InternalServerError";
pub const CODE_INVALID_PARAMETER: &str = "InvalidParameter";
pub const CODE_INVALID_REQUEST_CONTENT: &str = "InvalidRequestContent";
pub const CODE_INVALID_RESOURCE_TYPE: &str = "InvalidResourceType";
pub const CODE_INVALID_RESOURCE_NAME: &str = "InvalidResourceName";
pub const CODE_INVALID_SUBSCRIPTION_STATE: &str = "InvalidSubscriptionState";
pub const CODE_MULTIPLE_ERRORS_OCCURRED: &str = "MultipleErrorsOccurred";
pub const CODE_UNSUPPORTED_MEDIA_TYPE: &str = "UnsupportedMediaType";
pub const CODE_NOT_FOUND: &str = "NotFound";
pub const CODE_RESOURCE_NOT_FOUND: &str = "ResourceNotFound";
pub const CODE_SUBSCRIPTION_NOT_FOUND: &str = "SubscriptionNotFound";
pub const CODE_RESOURCE_GROUP_NOT_FOUND: &str = "ResourceGroupNotFound";

/// Body of an ARM error response.
///
/// Codes are invariant and meant for programmatic consumption; the message is
/// meant for display. `target` names the offending property or resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudErrorBody {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub target: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<CloudErrorBody>,
}

impl CloudErrorBody {
    pub fn new(code: &str, target: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            target: target.to_string(),
            details: vec![],
        }
    }

    /// Collapse a list of error bodies into one.
    ///
    /// Zero errors yields `None`, one error is returned as-is, and several are
    /// wrapped in a `MultipleErrorsOccurred` body carrying them as details.
    pub fn from_slice(errors: Vec<CloudErrorBody>, multiple_errors_message: &str) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.into_iter().next(),
            _ => Some(Self {
                code: CODE_MULTIPLE_ERRORS_OCCURRED.to_string(),
                message: multiple_errors_message.to_string(),
                target: String::new(),
                details: errors,
            }),
        }
    }
}

impl fmt::Display for CloudErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.code)?;
        if !self.target.is_empty() {
            write!(f, "{}: ", self.target)?;
        }
        write!(f, "{}", self.message)?;
        if !self.details.is_empty() {
            write!(f, " Details: ")?;
            for (i, detail) in self.details.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", detail)?;
            }
        }
        Ok(())
    }
}

/// A complete resource provider error: HTTP status plus the JSON envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{} {}", .status.as_u16(), .error)]
pub struct CloudError {
    #[serde(skip, default = "default_status")]
    pub status: StatusCode,
    pub error: CloudErrorBody,
}

fn default_status() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

impl CloudError {
    pub fn new(status: StatusCode, code: &str, target: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            error: CloudErrorBody::new(code, target, message),
        }
    }

    pub fn code(&self) -> &str {
        &self.error.code
    }

    pub fn message(&self) -> &str {
        &self.error.message
    }

    /// Generic 500; the real cause belongs in the server log only.
    pub fn internal_server_error() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            CODE_INTERNAL_SERVER_ERROR,
            "",
            "Internal server error.",
        )
    }

    pub fn not_found() -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            CODE_NOT_FOUND,
            "",
            "The requested path could not be found.",
        )
    }

    pub fn missing_parameter(parameter: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            CODE_INVALID_PARAMETER,
            parameter,
            format!("The request is missing required parameter '{}'.", parameter),
        )
    }

    pub fn invalid_request_content(err: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            CODE_INVALID_REQUEST_CONTENT,
            "",
            format!(
                "The request content was invalid and could not be deserialized: \"{}\"",
                err
            ),
        )
    }

    /// Builds a 400 from field-level validation errors, or `None` if there are none.
    pub fn content_validation(errors: Vec<CloudErrorBody>) -> Option<Self> {
        CloudErrorBody::from_slice(errors, "Content validation failed on multiple fields").map(
            |error| Self {
                status: StatusCode::BAD_REQUEST,
                error,
            },
        )
    }

    pub fn resource_not_found(resource_id: &ResourceId) -> Self {
        let (code, message) = match (&resource_id.resource_group, &resource_id.name) {
            (None, _) => (
                CODE_SUBSCRIPTION_NOT_FOUND,
                format!(
                    "The subscription '{}' was not found.",
                    resource_id.subscription_id
                ),
            ),
            (Some(group), None) => (
                CODE_RESOURCE_GROUP_NOT_FOUND,
                format!(
                    "The resource group '{}' under subscription '{}' was not found.",
                    group, resource_id.subscription_id
                ),
            ),
            (Some(group), Some(name)) => (
                CODE_RESOURCE_NOT_FOUND,
                format!(
                    "The resource '{}/{}' under resource group '{}' was not found.",
                    resource_id.resource_type.as_deref().unwrap_or_default(),
                    name,
                    group
                ),
            ),
        };
        Self::new(StatusCode::NOT_FOUND, code, &resource_id.to_string(), message)
    }
}

impl IntoResponse for CloudError {
    fn into_response(self) -> Response {
        let code = HeaderValue::from_str(&self.error.code).ok();
        let mut response = (self.status, Json(&self)).into_response();
        if let Some(code) = code {
            response.headers_mut().insert(HEADER_ERROR_CODE, code);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slice_collapses() {
        assert!(CloudErrorBody::from_slice(vec![], "many").is_none());

        let one = CloudErrorBody::new(CODE_INVALID_PARAMETER, "location", "missing");
        let single = CloudErrorBody::from_slice(vec![one.clone()], "many").unwrap();
        assert_eq!(single, one);

        let two = CloudErrorBody::new(CODE_INVALID_REQUEST_CONTENT, "tags", "bad");
        let multi = CloudErrorBody::from_slice(vec![one, two], "many").unwrap();
        assert_eq!(multi.code, CODE_MULTIPLE_ERRORS_OCCURRED);
        assert_eq!(multi.message, "many");
        assert_eq!(multi.details.len(), 2);
    }

    #[test]
    fn test_display_includes_target_and_details() {
        let body = CloudErrorBody {
            code: CODE_MULTIPLE_ERRORS_OCCURRED.to_string(),
            message: "oops".to_string(),
            target: String::new(),
            details: vec![
                CloudErrorBody::new("A", "x", "first"),
                CloudErrorBody::new("B", "", "second"),
            ],
        };
        assert_eq!(
            body.to_string(),
            "MultipleErrorsOccurred: oops Details: A: x: first, B: second"
        );
    }

    #[test]
    fn test_envelope_serialization() {
        let err = CloudError::missing_parameter("api-version");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["error"]["code"], "InvalidParameter");
        assert_eq!(json["error"]["target"], "api-version");
        assert!(json["error"].get("details").is_none());
        assert!(json.get("status").is_none());
    }

    #[test]
    fn test_into_response_sets_error_code_header() {
        let response = CloudError::not_found().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[HEADER_ERROR_CODE], "NotFound");
    }

    #[test]
    fn test_resource_not_found_by_scope() {
        let id = ResourceId::parse(
            "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.RedHatOpenShift/hcpOpenShiftClusters/dev",
        )
        .unwrap();
        let err = CloudError::resource_not_found(&id);
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.code(), CODE_RESOURCE_NOT_FOUND);
        assert_eq!(
            err.message(),
            "The resource 'hcpOpenShiftClusters/dev' under resource group 'rg' was not found."
        );

        let id = ResourceId::parse("/subscriptions/sub").unwrap();
        assert_eq!(
            CloudError::resource_not_found(&id).code(),
            CODE_SUBSCRIPTION_NOT_FOUND
        );
    }
}

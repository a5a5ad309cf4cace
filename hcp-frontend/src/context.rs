use axum::body::Bytes;
use hcp_api::Version;
use hcp_arm::{CorrelationData, RegistrationState, SystemData};
use std::fmt;
use std::sync::Arc;

/// Request-scoped values accumulated by the middleware chain.
///
/// Stages never mutate a context in place; each one stores an augmented copy
/// back into the request extensions.
#[derive(Clone, Default)]
pub struct RequestContext {
    /// Path as sent by the client, before lowercasing
    pub original_path: Option<String>,
    pub body: Bytes,
    pub correlation: Option<CorrelationData>,
    pub system_data: Option<SystemData>,
    pub api_version: Option<Arc<dyn Version>>,
    pub subscription_state: Option<RegistrationState>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_original_path(&self, path: impl Into<String>) -> Self {
        Self {
            original_path: Some(path.into()),
            ..self.clone()
        }
    }

    pub fn with_body(&self, body: Bytes) -> Self {
        Self {
            body,
            ..self.clone()
        }
    }

    pub fn with_correlation(&self, correlation: CorrelationData) -> Self {
        Self {
            correlation: Some(correlation),
            ..self.clone()
        }
    }

    pub fn with_system_data(&self, system_data: SystemData) -> Self {
        Self {
            system_data: Some(system_data),
            ..self.clone()
        }
    }

    pub fn with_api_version(&self, version: Arc<dyn Version>) -> Self {
        Self {
            api_version: Some(version),
            ..self.clone()
        }
    }

    pub fn with_subscription_state(&self, state: RegistrationState) -> Self {
        Self {
            subscription_state: Some(state),
            ..self.clone()
        }
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("original_path", &self.original_path)
            .field("body_len", &self.body.len())
            .field("correlation", &self.correlation)
            .field("system_data", &self.system_data)
            .field("api_version", &self.api_version.as_ref().map(|v| v.name()))
            .field("subscription_state", &self.subscription_state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcp_api::ApiRegistry;

    #[test]
    fn test_builders_leave_original_untouched() {
        let base = RequestContext::new().with_original_path("/Subscriptions/ABC");
        let augmented = base
            .with_body(Bytes::from_static(b"{}"))
            .with_subscription_state(RegistrationState::Warned);

        assert!(base.body.is_empty());
        assert!(base.subscription_state.is_none());
        assert_eq!(augmented.original_path.as_deref(), Some("/Subscriptions/ABC"));
        assert_eq!(augmented.subscription_state, Some(RegistrationState::Warned));
    }

    #[test]
    fn test_debug_shows_version_name() {
        let version = ApiRegistry::new().require("2024-06-10-preview").unwrap();
        let ctx = RequestContext::new().with_api_version(version);
        assert!(format!("{:?}", ctx).contains("2024-06-10-preview"));
    }
}

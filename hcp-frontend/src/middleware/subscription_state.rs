use super::context_of;
use crate::state::AppState;
use axum::extract::{Path, Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use hcp_arm::cloud_error::CODE_INVALID_SUBSCRIPTION_STATE;
use hcp_arm::{CloudError, RegistrationState};
use std::collections::HashMap;
use tracing::Span;

pub const SUBSCRIPTION_ID_PARAMETER: &str = "subscriptionId";

/// Gates a request on the lifecycle state of the subscription in its path.
///
/// | State                         | GET, DELETE | PUT, PATCH, POST |
/// |-------------------------------|-------------|------------------|
/// | Registered                    | allow       | allow            |
/// | Warned, Suspended             | allow       | 409              |
/// | Unregistered, Deleted, absent | 400         | 400              |
pub async fn handle(
    State(state): State<AppState>,
    params: Option<Path<HashMap<String, String>>>,
    mut req: Request,
    next: Next,
) -> Response {
    let subscription_id = params.and_then(|Path(p)| p.get("subscription_id").cloned());
    let Some(subscription_id) = subscription_id.filter(|id| !id.is_empty()) else {
        return CloudError::missing_parameter(SUBSCRIPTION_ID_PARAMETER).into_response();
    };

    let current = state
        .cache
        .get_subscription(&subscription_id)
        .await
        .map(|s| s.state);

    let resolved = match check_state(&subscription_id, current, req.method()) {
        Ok(resolved) => resolved,
        Err(err) => return err.into_response(),
    };

    Span::current().record("subscription_state", resolved.as_str());
    let ctx = context_of(req.extensions()).with_subscription_state(resolved);
    req.extensions_mut().insert(ctx);

    next.run(req).await
}

pub fn check_state(
    subscription_id: &str,
    state: Option<RegistrationState>,
    method: &Method,
) -> Result<RegistrationState, CloudError> {
    let invalid = |status: StatusCode, message: String| {
        CloudError::new(status, CODE_INVALID_SUBSCRIPTION_STATE, "", message)
    };

    match state {
        None => Err(invalid(
            StatusCode::BAD_REQUEST,
            format!(
                "Subscription '{}' was not found. Register the subscription with the resource provider and retry.",
                subscription_id
            ),
        )),
        Some(RegistrationState::Unregistered) => Err(invalid(
            StatusCode::BAD_REQUEST,
            format!(
                "Subscription '{}' is not registered with the resource provider.",
                subscription_id
            ),
        )),
        Some(RegistrationState::Deleted) => Err(invalid(
            StatusCode::BAD_REQUEST,
            format!("Subscription '{}' has been deleted.", subscription_id),
        )),
        Some(s @ (RegistrationState::Warned | RegistrationState::Suspended))
            if !is_read_or_delete(method) =>
        {
            Err(invalid(
                StatusCode::CONFLICT,
                format!(
                    "The request is not allowed while subscription '{}' is in the '{}' state.",
                    subscription_id, s
                ),
            ))
        }
        Some(s) => Ok(s),
    }
}

fn is_read_or_delete(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::DELETE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcp_arm::RegistrationState::*;

    const SUB: &str = "00000000-0000-0000-0000-000000000000";

    #[test]
    fn test_state_table() {
        let reads = [Method::GET, Method::DELETE];
        let writes = [Method::PUT, Method::PATCH, Method::POST];

        for method in reads.iter().chain(writes.iter()) {
            assert_eq!(check_state(SUB, Some(Registered), method).unwrap(), Registered);
        }

        for state in [Warned, Suspended] {
            for method in &reads {
                assert_eq!(check_state(SUB, Some(state), method).unwrap(), state);
            }
            for method in &writes {
                let err = check_state(SUB, Some(state), method).unwrap_err();
                assert_eq!(err.status, StatusCode::CONFLICT);
                assert_eq!(err.code(), CODE_INVALID_SUBSCRIPTION_STATE);
            }
        }

        for state in [Some(Unregistered), Some(Deleted), None] {
            for method in reads.iter().chain(writes.iter()) {
                let err = check_state(SUB, state, method).unwrap_err();
                assert_eq!(err.status, StatusCode::BAD_REQUEST);
                assert_eq!(err.code(), CODE_INVALID_SUBSCRIPTION_STATE);
            }
        }
    }

    #[test]
    fn test_rejection_messages_differ() {
        let absent = check_state(SUB, None, &Method::GET).unwrap_err();
        let unregistered = check_state(SUB, Some(Unregistered), &Method::GET).unwrap_err();
        let deleted = check_state(SUB, Some(Deleted), &Method::GET).unwrap_err();
        let conflict = check_state(SUB, Some(Warned), &Method::PUT).unwrap_err();

        let messages = [
            absent.message(),
            unregistered.message(),
            deleted.message(),
            conflict.message(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(conflict.message().contains("Warned"));
    }
}

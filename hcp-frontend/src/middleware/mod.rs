//! Request interceptors, in the order they run.
//!
//! Stages 1-7 wrap the whole router (see `app::build_app`); the remaining
//! stages are attached per route group after routing has matched.

pub mod panic;
pub mod logging;
pub mod correlation;
pub mod body;
pub mod lowercase;
pub mod system_data;
pub mod metrics;
pub mod api_version;
pub mod subscription_state;

use crate::context::RequestContext;
use axum::http::Extensions;

/// Context stored by an earlier stage, or an empty one.
pub(crate) fn context_of(extensions: &Extensions) -> RequestContext {
    extensions
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_default()
}

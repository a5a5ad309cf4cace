pub mod error;
pub mod models;
pub mod registry;
pub mod v20240610preview;
pub mod v20251223preview;
pub mod validation;

pub use error::ApiError;
pub use models::*;
pub use registry::{ApiRegistry, Version};

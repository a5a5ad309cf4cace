pub mod cloud_error;
pub mod correlation;
pub mod error;
pub mod headers;
pub mod models;
pub mod preflight;
pub mod resource_id;

pub use cloud_error::{CloudError, CloudErrorBody};
pub use correlation::CorrelationData;
pub use error::ArmError;
pub use models::*;
pub use resource_id::ResourceId;

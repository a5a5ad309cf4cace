//! ARM request and response header names.

pub const HEADER_REQUEST_ID: &str = "x-ms-request-id";
pub const HEADER_CLIENT_REQUEST_ID: &str = "x-ms-client-request-id";
pub const HEADER_CORRELATION_REQUEST_ID: &str = "x-ms-correlation-request-id";
pub const HEADER_RETURN_CLIENT_REQUEST_ID: &str = "x-ms-return-client-request-id";
pub const HEADER_SYSTEM_DATA: &str = "x-ms-arm-resource-system-data";
pub const HEADER_ERROR_CODE: &str = "x-ms-error-code";

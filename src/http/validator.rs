//! Start-line and header checks applied when parsing a request or response.
//!
//! Bytes coming off the wire always go through here. Of a message built in code only the
//! request path is checked, right before it is sent.

use crate::auth::{AuthError, Credentials};
use crate::http::Method;
use crate::http::status::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid HTTP method: {0:?}")]
    InvalidMethod(String),

    #[error("invalid path in request: {0:?}")]
    InvalidPath(String),

    #[error("missing 'Host' header in the request: {0:?}")]
    MissingHost(Option<String>),

    #[error("invalid Authorization header: {0}")]
    InvalidAuthorization(#[source] AuthError),

    #[error("invalid status code: {0:?}")]
    InvalidStatusCode(String),

    #[error("status code out of range: {0}")]
    StatusCodeOutOfRange(i64),

    #[error("missing status message in response: {0:?}")]
    MissingStatusMessage(String),
}

pub struct Validator;

impl Validator {
    pub fn validate_method(method: &str) -> Result<Method, ValidationError> {
        method
            .parse()
            .map_err(|_| ValidationError::InvalidMethod(method.to_string()))
    }

    /// A path starts with `/` and holds no whitespace or control characters, which
    /// would break the request line apart.
    pub fn validate_path(path: &str) -> Result<(), ValidationError> {
        let breaks_line = |c: char| c.is_whitespace() || c.is_control();
        if !path.starts_with('/') || path.contains(breaks_line) {
            return Err(ValidationError::InvalidPath(path.to_string()));
        }
        Ok(())
    }

    pub fn validate_host(host: Option<&String>) -> Result<String, ValidationError> {
        match host {
            Some(host) if !host.trim().is_empty() => Ok(host.clone()),
            _ => Err(ValidationError::MissingHost(host.cloned())),
        }
    }

    pub fn validate_authorization(
        value: Option<&String>,
    ) -> Result<Option<Credentials>, ValidationError> {
        value
            .map(|value| Credentials::from_header_value(value))
            .transpose()
            .map_err(ValidationError::InvalidAuthorization)
    }

    pub fn validate_status_code(code: &str) -> Result<StatusCode, ValidationError> {
        let parsed = code
            .parse::<i64>()
            .map_err(|_| ValidationError::InvalidStatusCode(code.to_string()))?;

        u16::try_from(parsed)
            .ok()
            .and_then(StatusCode::new)
            .ok_or(ValidationError::StatusCodeOutOfRange(parsed))
    }

    pub fn validate_status_message(message: &str) -> Result<(), ValidationError> {
        if message.trim().is_empty() {
            return Err(ValidationError::MissingStatusMessage(message.to_string()));
        }
        Ok(())
    }
}

//! HTTP Basic authentication credentials.
//!
//! The `Authorization` header value is the scheme token `Basic `, followed by the
//! standard Base64 encoding (with padding) of `username:password`.

use std::fmt;
use std::string::FromUtf8Error;

use base64::{Engine, engine::general_purpose::STANDARD};

const BASIC_PREFIX: &str = "Basic ";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("authorization header should start with 'Basic ': {0:?}")]
    MissingScheme(String),

    #[error("failed to decode authorization header {value:?}: {source}")]
    Base64 {
        value: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("failed to decode authorization header {value:?}: {source}")]
    Utf8 {
        value: String,
        #[source]
        source: FromUtf8Error,
    },

    #[error("decoded credentials must be in the format 'username:password': {0:?}")]
    MissingColon(String),
}

/// A username and password pair. Only lives for the duration of one request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Renders the credentials as an `Authorization` header value.
    pub fn to_header_value(&self) -> String {
        let joined = format!("{}:{}", self.username, self.password);
        format!("{BASIC_PREFIX}{}", STANDARD.encode(joined))
    }

    /// Parses an `Authorization` header value.
    ///
    /// The decoded text is split on the first colon, so passwords may contain colons.
    /// Both halves are trimmed of surrounding whitespace, so encoding then decoding gives
    /// back the same pair only for colon-free usernames and fields without surrounding
    /// whitespace.
    pub fn from_header_value(value: &str) -> Result<Self, AuthError> {
        let encoded = value
            .strip_prefix(BASIC_PREFIX)
            .ok_or_else(|| AuthError::MissingScheme(value.to_string()))?;

        let bytes = STANDARD.decode(encoded).map_err(|source| AuthError::Base64 {
            value: value.to_string(),
            source,
        })?;
        let decoded = String::from_utf8(bytes).map_err(|source| AuthError::Utf8 {
            value: value.to_string(),
            source,
        })?;

        let (username, password) = decoded
            .split_once(':')
            .ok_or_else(|| AuthError::MissingColon(decoded.clone()))?;

        Ok(Self::new(username.trim(), password.trim()))
    }
}

// Keep the password out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

pub fn encode_credentials(username: &str, password: &str) -> String {
    Credentials::new(username, password).to_header_value()
}

pub fn decode_credentials(value: &str) -> Result<(String, String), AuthError> {
    let credentials = Credentials::from_header_value(value)?;
    Ok((credentials.username, credentials.password))
}

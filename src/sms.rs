//! Payloads sent by the client: plain text, arbitrary JSON, and SMS messages.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::http::headers::HttpHeaders;
use crate::http::request::RequestHeader;

const PHONE_MIN_DIGITS: usize = 10;
const PHONE_MAX_DIGITS: usize = 15;

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("invalid phone number: {0:?}")]
    PhoneNumber(String),

    #[error("message cannot be empty")]
    EmptyMessage,

    #[error("error serializing body to JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A phone number: an optional leading `+` followed by 10 to 15 digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PhoneNumber {
    type Err = PayloadError;

    fn from_str(phone: &str) -> Result<Self, Self::Err> {
        let digits = phone.strip_prefix('+').unwrap_or(phone);
        let valid = (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits.len())
            && digits.bytes().all(|b| b.is_ascii_digit());

        if !valid {
            return Err(PayloadError::PhoneNumber(phone.to_string()));
        }
        Ok(Self(phone.to_string()))
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmsMessage {
    pub sender: PhoneNumber,
    pub recipient: PhoneNumber,
    pub message: String,
}

impl SmsMessage {
    pub fn new(sender: &str, recipient: &str, message: &str) -> Result<Self, PayloadError> {
        if message.trim().is_empty() {
            return Err(PayloadError::EmptyMessage);
        }
        Ok(Self {
            sender: sender.parse()?,
            recipient: recipient.parse()?,
            message: message.to_string(),
        })
    }

    pub fn to_json(&self) -> Result<String, PayloadError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Text(String),
    Json(serde_json::Value),
}

impl RequestBody {
    pub fn json<T: Serialize>(value: &T) -> Result<Self, PayloadError> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    /// Body text and the `Content-Type` header describing it.
    ///
    /// `Content-Length` is left out: it is derived from the body when the request
    /// is serialized.
    pub fn prepare(&self) -> Result<(String, HttpHeaders), PayloadError> {
        let (body, content_type) = match self {
            RequestBody::Text(text) => (text.clone(), "text/plain"),
            RequestBody::Json(value) => (serde_json::to_string(value)?, "application/json"),
        };

        let mut headers = HttpHeaders::new();
        headers.set_raw(RequestHeader::ContentType.as_str(), content_type);
        Ok((body, headers))
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl TryFrom<&SmsMessage> for RequestBody {
    type Error = PayloadError;

    fn try_from(message: &SmsMessage) -> Result<Self, Self::Error> {
        Self::json(message)
    }
}

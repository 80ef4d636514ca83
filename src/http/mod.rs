use std::fmt;
use std::str::FromStr;

pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod status;
pub mod validator;

use headers::HttpHeaders;
use parser::FramingError;
use validator::ValidationError;

pub const HTTP_VERSION: &str = "HTTP/1.1";

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error(transparent)]
    Framing(#[from] FramingError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Patch,
    Connect,
    Options,
    Trace,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Connect => "CONNECT",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
        }
    }
}

impl FromStr for Method {
    type Err = ();

    fn from_str(method: &str) -> Result<Self, Self::Err> {
        match method {
            "GET" => Ok(Method::Get),
            "HEAD" => Ok(Method::Head),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            "TRACE" => Ok(Method::Trace),
            "OPTIONS" => Ok(Method::Options),
            "CONNECT" => Ok(Method::Connect),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Behaviour shared by [`Request`](request::Request) and [`Response`](response::Response).
///
/// Serializing never mutates the message. Headers derived from the message fields
/// (`Content-Length`, plus whatever [`derive_headers`](HttpMessage::derive_headers) adds)
/// are computed by [`normalized_headers`](HttpMessage::normalized_headers) into a fresh
/// header set, so serializing the same message twice yields the same bytes.
pub trait HttpMessage: Sized {
    fn start_line(&self) -> String;

    fn headers(&self) -> &HttpHeaders;

    fn body(&self) -> &str;

    /// Hook for variant-specific headers, applied after `Content-Length`.
    fn derive_headers(&self, _headers: &mut HttpHeaders) {}

    fn normalized_headers(&self) -> HttpHeaders {
        let mut headers = parser::with_content_length(self.headers(), self.body());
        self.derive_headers(&mut headers);
        headers
    }

    fn to_bytes(&self) -> Vec<u8> {
        parser::serialize_message(&self.start_line(), &self.normalized_headers(), self.body())
    }

    fn from_bytes(data: &[u8]) -> Result<Self, MessageError>;
}

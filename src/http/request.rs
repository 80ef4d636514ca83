use crate::auth::Credentials;
use crate::http::headers::HttpHeaders;
use crate::http::validator::Validator;
use crate::http::{HTTP_VERSION, HttpMessage, MessageError, Method, parser};

/// Common HTTP request headers
/// This enum defines the set of headers that can be explicitly set on a
/// [`Request`] through its safe wrapper API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestHeader {
    Host,
    Authorization,
    Accept,
    ContentType,
}

impl RequestHeader {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestHeader::Host => "Host",
            RequestHeader::Authorization => "Authorization",
            RequestHeader::Accept => "Accept",
            RequestHeader::ContentType => "Content-Type",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub host: String,
    pub path: String,
    pub credentials: Option<Credentials>,

    pub headers: HttpHeaders,
    pub body: String,
}

impl Request {
    pub fn new(method: Method, host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method,
            host: host.into(),
            path: path.into(),
            credentials: None,
            headers: HttpHeaders::new(),
            body: String::new(),
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_headers(mut self, headers: HttpHeaders) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a request header constrained to the allowed [`RequestHeader`] variants.
    ///
    /// No validation is performed on the header value itself. `Host`, `Authorization`
    /// and `Content-Length` are recomputed from the request fields when serializing.
    pub fn set_header(&mut self, h: RequestHeader, value: &str) {
        self.headers.set_raw(h.as_str(), value);
    }
}

/// Builds a request from already validated parts.
///
/// `path` must pass [`Validator::validate_path`]; a space in it would split the request
/// line differently once parsed.
pub fn build_request(
    method: Method,
    host: &str,
    path: &str,
    credentials: Option<Credentials>,
    headers: Option<HttpHeaders>,
    body: Option<String>,
) -> Request {
    debug_assert!(
        Validator::validate_path(path).is_ok(),
        "request path must be percent-encoded: {path:?}"
    );
    Request {
        method,
        host: host.to_string(),
        path: path.to_string(),
        credentials,
        headers: headers.unwrap_or_default(),
        body: body.unwrap_or_default(),
    }
}

impl HttpMessage for Request {
    fn start_line(&self) -> String {
        format!("{} {} {HTTP_VERSION}", self.method, self.path)
    }

    fn headers(&self) -> &HttpHeaders {
        &self.headers
    }

    fn body(&self) -> &str {
        &self.body
    }

    // Host always comes from the field. Authorization follows the credentials,
    // so a stale header never survives once the credentials are cleared.
    fn derive_headers(&self, headers: &mut HttpHeaders) {
        headers.set_raw(RequestHeader::Host.as_str(), &self.host);
        match &self.credentials {
            Some(credentials) => headers.set_raw(
                RequestHeader::Authorization.as_str(),
                &credentials.to_header_value(),
            ),
            None => {
                headers.remove(RequestHeader::Authorization.as_str());
            }
        }
    }

    fn from_bytes(data: &[u8]) -> Result<Self, MessageError> {
        let parser::RawMessage {
            start_line: [method, path, _version],
            headers,
            body,
        } = parser::parse_message(data)?;

        let method = Validator::validate_method(method)?;
        Validator::validate_path(path)?;
        let host = Validator::validate_host(headers.get(RequestHeader::Host.as_str()))?;
        let credentials =
            Validator::validate_authorization(headers.get(RequestHeader::Authorization.as_str()))?;

        Ok(Self {
            method,
            host,
            path: path.to_string(),
            credentials,
            headers,
            body: body.to_string(),
        })
    }
}

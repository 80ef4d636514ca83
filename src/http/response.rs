use crate::http::headers::HttpHeaders;
use crate::http::status::StatusCode;
use crate::http::validator::Validator;
use crate::http::{HTTP_VERSION, HttpMessage, MessageError, parser};

pub enum ResponseHeader {
    ContentType,
    Server,
}

impl ResponseHeader {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseHeader::ContentType => "Content-Type",
            ResponseHeader::Server => "Server",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    pub status_message: String,
    pub headers: HttpHeaders,
    pub body: String,
}

impl Response {
    pub fn new(status: StatusCode, status_message: impl Into<String>) -> Self {
        Self {
            status,
            status_message: status_message.into(),
            headers: HttpHeaders::new(),
            body: String::new(),
        }
    }

    /// Response whose status message is the canonical reason phrase, falling back to
    /// the bare code when none is known.
    pub fn with_status(status: StatusCode) -> Self {
        let message = status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.to_string());
        Self::new(status, message)
    }

    pub fn with_headers(mut self, headers: HttpHeaders) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn set_header(&mut self, h: ResponseHeader, value: &str) {
        self.headers.set_raw(h.as_str(), value);
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(ResponseHeader::ContentType.as_str())
            .map(String::as_str)
    }
}

impl HttpMessage for Response {
    fn start_line(&self) -> String {
        format!("{HTTP_VERSION} {} {}", self.status, self.status_message)
    }

    fn headers(&self) -> &HttpHeaders {
        &self.headers
    }

    fn body(&self) -> &str {
        &self.body
    }

    fn from_bytes(data: &[u8]) -> Result<Self, MessageError> {
        let parser::RawMessage {
            start_line: [_version, code, message],
            headers,
            body,
        } = parser::parse_message(data)?;

        let status = Validator::validate_status_code(code)?;
        Validator::validate_status_message(message)?;

        Ok(Self {
            status,
            status_message: message.to_string(),
            headers,
            body: body.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::validator::ValidationError;

    #[test]
    fn start_line() {
        let response = Response::new(StatusCode::OK, "OK");
        assert_eq!(response.start_line(), "HTTP/1.1 200 OK");
        assert_eq!(
            Response::with_status(StatusCode::new(299).unwrap()).start_line(),
            "HTTP/1.1 299 299"
        );
    }

    #[test]
    fn to_bytes() {
        let mut response = Response::with_status(StatusCode::OK).with_body("Response body");
        response.set_header(ResponseHeader::Server, "smsnet");

        assert_eq!(
            response.to_bytes(),
            b"HTTP/1.1 200 OK\r\nServer: smsnet\r\nContent-Length: 13\r\n\r\nResponse body"
        );
    }

    #[test]
    fn to_bytes_empty_body() {
        let bytes = Response::with_status(StatusCode::NO_CONTENT).to_bytes();
        assert_eq!(bytes, b"HTTP/1.1 204 No Content\r\nContent-Length: 0\r\n\r\n");
    }

    #[test]
    fn from_bytes() {
        let response =
            Response::from_bytes(b"HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\n\r\nNot Found")
                .unwrap();

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.status_message, "Not Found");
        assert_eq!(response.body, "Not Found");
    }

    #[test]
    fn from_bytes_invalid() {
        assert!(matches!(
            Response::from_bytes(b"HTTP/1.1 600 OK\r\n\r\n"),
            Err(MessageError::Validation(ValidationError::StatusCodeOutOfRange(600)))
        ));
        assert!(matches!(
            Response::from_bytes(b"HTTP/1.1 invalid OK\r\nContent-Length: 4\r\n\r\nBody"),
            Err(MessageError::Validation(ValidationError::InvalidStatusCode(_)))
        ));
        assert!(matches!(
            Response::from_bytes(b"HTTP/1.1 200  \r\nContent-Length: 4\r\n\r\nBody"),
            Err(MessageError::Validation(ValidationError::MissingStatusMessage(_)))
        ));
        assert!(matches!(
            Response::from_bytes(b"HTTP/1.1 200\r\n\r\n"),
            Err(MessageError::Framing(_))
        ));
    }

    #[test]
    fn round_trip_full_status_range() {
        for code in StatusCode::MIN..=StatusCode::MAX {
            let status = StatusCode::new(code).unwrap();
            let response = Response::new(status, "Some Reason").with_body(format!("code {code}"));

            let parsed = Response::from_bytes(&response.to_bytes()).unwrap();
            assert_eq!(parsed.status, status);
            assert_eq!(parsed.status_message, "Some Reason");
            assert_eq!(parsed.body, response.body);
        }
    }
}

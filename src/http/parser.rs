//! Framing shared by requests and responses.
//!
//! A message is a start-line, header lines of the form `name: value`, a blank line and
//! a fixed-length body, all separated by CRLF. The whole message must already be in
//! the buffer: there is no incremental parsing and no chunked transfer-encoding.

use std::str::Utf8Error;

use crate::http::headers::HttpHeaders;

pub const CRLF: &str = "\r\n";
pub const CONTENT_LENGTH: &str = "Content-Length";

#[derive(Debug, thiserror::Error)]
pub enum FramingError {
    #[error("failed to decode binary data: {0}")]
    Decode(#[from] Utf8Error),

    #[error("invalid message format: no start line found")]
    NoStartLine,

    #[error("invalid header format, expected 'key: value': {0:?}")]
    InvalidHeader(String),

    /// Carries the length in bytes of the body that arrived without a length.
    #[error("Content-Length header is missing for non-empty body ({0} bytes)")]
    MissingContentLength(usize),

    #[error("invalid Content-Length value: {0:?}")]
    InvalidContentLength(String),

    #[error("Content-Length mismatch: expected {expected}, got {actual}")]
    ContentLengthMismatch { expected: usize, actual: usize },

    #[error("invalid start line format: {0:?}")]
    InvalidStartLine(String),
}

/// A message split into its framing parts, before any request or response semantics
/// are applied.
#[derive(Debug)]
pub struct RawMessage<'a> {
    /// `[method, path, version]` for requests, `[version, code, message]` for responses.
    pub start_line: [&'a str; 3],
    pub headers: HttpHeaders,
    pub body: &'a str,
}

pub fn parse_message(data: &[u8]) -> Result<RawMessage<'_>, FramingError> {
    let data = std::str::from_utf8(data)?;

    let (start_line, mut remaining) = data.split_once(CRLF).unwrap_or((data, ""));
    if start_line.is_empty() {
        return Err(FramingError::NoStartLine);
    }

    // Header lines run up to the first blank line, everything after it is the body
    let mut headers = HttpHeaders::new();
    let body = loop {
        match remaining.split_once(CRLF) {
            Some(("", body)) => break body,
            Some((line, rest)) => {
                parse_header_line(line, &mut headers)?;
                remaining = rest;
            }
            None if remaining.is_empty() => break "",
            None => {
                parse_header_line(remaining, &mut headers)?;
                break "";
            }
        }
    };

    let start_line = split_start_line(start_line)?;

    if !body.is_empty() {
        check_content_length(&headers, body)?;
    }

    tracing::trace!(
        start_line = ?start_line,
        headers = headers.len(),
        body_len = body.len(),
        "parsed message"
    );

    Ok(RawMessage {
        start_line,
        headers,
        body,
    })
}

fn parse_header_line(line: &str, headers: &mut HttpHeaders) -> Result<(), FramingError> {
    let (name, value) = line
        .split_once(": ")
        .ok_or_else(|| FramingError::InvalidHeader(line.to_string()))?;
    headers.set_raw(name, value);
    Ok(())
}

// The last token keeps its spaces: "HTTP/1.1 404 Not Found"
fn split_start_line(line: &str) -> Result<[&str; 3], FramingError> {
    let mut parts = line.splitn(3, ' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(first), Some(second), Some(third)) => Ok([first, second, third]),
        _ => Err(FramingError::InvalidStartLine(line.to_string())),
    }
}

fn check_content_length(headers: &HttpHeaders, body: &str) -> Result<(), FramingError> {
    let declared = headers
        .get(CONTENT_LENGTH)
        .ok_or(FramingError::MissingContentLength(body.len()))?;
    let expected = declared
        .parse::<usize>()
        .map_err(|_| FramingError::InvalidContentLength(declared.clone()))?;

    if expected != body.len() {
        return Err(FramingError::ContentLengthMismatch {
            expected,
            actual: body.len(),
        });
    }
    Ok(())
}

/// Copy of `headers` with `Content-Length` set to the body length in bytes.
///
/// An empty body is announced as `Content-Length: 0`.
pub fn with_content_length(headers: &HttpHeaders, body: &str) -> HttpHeaders {
    let mut headers = headers.clone();
    headers.set_raw(CONTENT_LENGTH, &body.len().to_string());
    headers
}

pub fn serialize_message(start_line: &str, headers: &HttpHeaders, body: &str) -> Vec<u8> {
    // <start line>\r\n
    // <header_name>: <header_value>\r\n
    // ...
    // \r\n
    // <body>
    let head = format!("{start_line}{CRLF}{}{CRLF}", headers.stringify());

    let mut bytes = Vec::with_capacity(head.len() + body.len());
    bytes.extend_from_slice(head.as_bytes());
    bytes.extend_from_slice(body.as_bytes());

    tracing::trace!(start_line, len = bytes.len(), "serialized message");
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_without_body() {
        let raw = parse_message(b"GET /test HTTP/1.1\r\nHost: example.com\r\n\r\n").unwrap();

        assert_eq!(raw.start_line, ["GET", "/test", "HTTP/1.1"]);
        assert_eq!(raw.headers.get("Host").unwrap(), "example.com");
        assert_eq!(raw.body, "");
    }

    #[test]
    fn parse_without_blank_line() {
        let raw = parse_message(b"HTTP/1.1 200 OK\r\nServer: x").unwrap();
        assert_eq!(raw.headers.get("Server").unwrap(), "x");
        assert_eq!(raw.body, "");

        let raw = parse_message(b"HTTP/1.1 200 OK").unwrap();
        assert!(raw.headers.is_empty());
    }

    #[test]
    fn body_keeps_inner_crlf() {
        let raw =
            parse_message(b"HTTP/1.1 200 OK\r\nContent-Length: 8\r\n\r\nab\r\n\r\ncd").unwrap();
        assert_eq!(raw.body, "ab\r\n\r\ncd");
    }

    #[test]
    fn repeated_header_overwrites() {
        let raw = parse_message(b"HTTP/1.1 200 OK\r\nX: 1\r\nX: 2\r\n\r\n").unwrap();
        assert_eq!(raw.headers.len(), 1);
        assert_eq!(raw.headers.get("X").unwrap(), "2");
    }

    #[test]
    fn header_value_splits_on_first_delimiter() {
        let raw = parse_message(b"HTTP/1.1 200 OK\r\nX-Note: a: b\r\n\r\n").unwrap();
        assert_eq!(raw.headers.get("X-Note").unwrap(), "a: b");
    }

    #[test]
    fn content_length_counts_bytes() {
        let body = "привет";
        let data = format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n{body}", body.len());
        assert_eq!(parse_message(data.as_bytes()).unwrap().body, body);
    }

    #[test]
    fn framing_errors() {
        assert!(matches!(
            parse_message(b"\xff\xfe"),
            Err(FramingError::Decode(_))
        ));
        assert!(matches!(parse_message(b""), Err(FramingError::NoStartLine)));
        assert!(matches!(
            parse_message(b"\r\nHost: x\r\n\r\n"),
            Err(FramingError::NoStartLine)
        ));
        assert!(matches!(
            parse_message(b"GET /test HTTP/1.1\r\nContent-Length;5\r\n\r\nHello"),
            Err(FramingError::InvalidHeader(_))
        ));
        assert!(matches!(
            parse_message(b"GET /test\r\nHost: example.com\r\n\r\n"),
            Err(FramingError::InvalidStartLine(_))
        ));
        assert!(matches!(
            parse_message(b"GET /test HTTP/1.1\r\n\r\nHello"),
            Err(FramingError::MissingContentLength(5))
        ));
        assert!(matches!(
            parse_message(b"GET /test HTTP/1.1\r\nContent-Length: abc\r\n\r\nHello"),
            Err(FramingError::InvalidContentLength(_))
        ));
    }

    #[test]
    fn content_length_mismatch() {
        let err = parse_message(b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nHello").unwrap_err();
        assert!(matches!(
            err,
            FramingError::ContentLengthMismatch {
                expected: 10,
                actual: 5
            }
        ));
        assert!(err.to_string().contains("mismatch"));
    }

    #[test]
    fn serialize_layout() {
        let headers = with_content_length(&HttpHeaders::new(), "Hello");
        let bytes = serialize_message("POST /x HTTP/1.1", &headers, "Hello");
        assert_eq!(bytes, b"POST /x HTTP/1.1\r\nContent-Length: 5\r\n\r\nHello");
    }

    #[test]
    fn empty_body_announces_zero() {
        let headers = with_content_length(&HttpHeaders::new(), "");
        assert_eq!(headers.get(CONTENT_LENGTH).unwrap(), "0");
    }
}

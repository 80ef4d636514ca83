//! Property tests for the message codec and Basic credentials

use proptest::prelude::*;

use smsnet::auth::{Credentials, decode_credentials, encode_credentials};
use smsnet::http::headers::HttpHeaders;
use smsnet::http::parser::FramingError;
use smsnet::http::request::{Request, build_request};
use smsnet::http::response::Response;
use smsnet::http::status::StatusCode;
use smsnet::http::{HttpMessage, MessageError, Method};

// Decoding trims both fields and splits on the first colon, so the round trip holds for
// colon-free usernames and fields without surrounding whitespace.
const USERNAME: &str = "[!-9;-~]{0,16}";
const PASSWORD: &str = "([!-~]([ -~]{0,14}[!-~])?)?";

fn method() -> impl Strategy<Value = Method> {
    prop_oneof![
        Just(Method::Get),
        Just(Method::Head),
        Just(Method::Post),
        Just(Method::Put),
        Just(Method::Delete),
        Just(Method::Patch),
        Just(Method::Connect),
        Just(Method::Options),
        Just(Method::Trace),
    ]
}

fn credentials() -> impl Strategy<Value = Option<Credentials>> {
    proptest::option::of((USERNAME, PASSWORD).prop_map(|(u, p)| Credentials::new(u, p)))
}

fn extra_headers() -> impl Strategy<Value = HttpHeaders> {
    proptest::collection::vec(("X-[A-Za-z]{1,8}", "[!-~]([ -~]{0,10}[!-~])?"), 0..4).prop_map(
        |pairs| {
            let mut headers = HttpHeaders::new();
            for (name, value) in &pairs {
                headers.set_raw(name, value);
            }
            headers
        },
    )
}

fn head(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let end = text.find("\r\n\r\n").unwrap();
    text[..end + 2].to_string()
}

// Credentials round trip through the Authorization value
proptest! {
    #[test]
    fn credentials_roundtrip(username in USERNAME, password in PASSWORD) {
        let header = encode_credentials(&username, &password);
        prop_assert!(header.starts_with("Basic "));

        let (decoded_username, decoded_password) = decode_credentials(&header).unwrap();
        prop_assert_eq!(decoded_username, username);
        prop_assert_eq!(decoded_password, password);
    }
}

// A colon in the password stays in the password
proptest! {
    #[test]
    fn credentials_password_with_colon(username in "[a-zA-Z][a-zA-Z0-9]{0,7}", part1 in "[a-zA-Z0-9]{0,8}", part2 in "[a-zA-Z0-9]{0,8}") {
        let password = format!("{part1}:{part2}");
        let credentials = Credentials::new(&username, &password);
        let decoded = Credentials::from_header_value(&credentials.to_header_value()).unwrap();

        prop_assert_eq!(decoded, credentials);
    }
}

// Request serialize -> parse keeps every field and reserializes to the same bytes
proptest! {
    #[test]
    fn request_roundtrip(
        method in method(),
        host in "[a-z][a-z0-9.-]{0,20}",
        path in "/[A-Za-z0-9._~%/?=&-]{0,30}",
        credentials in credentials(),
        headers in extra_headers(),
        body in "(?s).{0,64}",
    ) {
        let request = build_request(method, &host, &path, credentials, Some(headers), Some(body));
        let bytes = request.to_bytes();
        let parsed = Request::from_bytes(&bytes).unwrap();

        prop_assert_eq!(parsed.method, request.method);
        prop_assert_eq!(&parsed.host, &request.host);
        prop_assert_eq!(&parsed.path, &request.path);
        prop_assert_eq!(&parsed.credentials, &request.credentials);
        prop_assert_eq!(&parsed.body, &request.body);
        prop_assert_eq!(parsed.to_bytes(), bytes);
    }
}

// Response serialize -> parse over the whole status range
proptest! {
    #[test]
    fn response_roundtrip(
        code in StatusCode::MIN..=StatusCode::MAX,
        message in "[A-Za-z][A-Za-z ]{0,20}",
        body in "(?s).{0,64}",
    ) {
        let status = StatusCode::new(code).unwrap();
        let response = Response::new(status, &message).with_body(&body);
        let bytes = response.to_bytes();
        let parsed = Response::from_bytes(&bytes).unwrap();

        prop_assert_eq!(parsed.status, status);
        prop_assert_eq!(&parsed.status_message, &message);
        prop_assert_eq!(&parsed.body, &body);
        prop_assert_eq!(parsed.to_bytes(), bytes);
    }
}

// Serialized messages always announce the body length in bytes, even when it is zero
proptest! {
    #[test]
    fn content_length_matches_body(body in "(?s).{0,64}", host in "[a-z]{1,12}") {
        let expected = format!("\r\nContent-Length: {}\r\n", body.len());

        let request = Request::new(Method::Post, &host, "/").with_body(&body);
        prop_assert!(head(&request.to_bytes()).contains(&expected));

        let response = Response::with_status(StatusCode::OK).with_body(&body);
        prop_assert!(head(&response.to_bytes()).contains(&expected));
    }
}

// A declared length different from the body is rejected
proptest! {
    #[test]
    fn content_length_mismatch_is_rejected(body in "(?s).{1,32}", extra in 1usize..100) {
        let declared = body.len() + extra;
        let data = format!("HTTP/1.1 200 OK\r\nContent-Length: {declared}\r\n\r\n{body}");

        let result = Response::from_bytes(data.as_bytes());
        prop_assert!(
            matches!(
                result,
                Err(MessageError::Framing(FramingError::ContentLengthMismatch { expected, actual }))
                    if expected == declared && actual == body.len()
            ),
            "{:?}",
            result
        );
    }
}

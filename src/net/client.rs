//! HTTP client runtime.
//!
//! This module is responsible only for networking concerns:
//! - opening a TCP connection to the endpoint,
//! - writing the serialized request,
//! - reading raw bytes back until one complete response is buffered.
//!
//! Building and parsing the messages is delegated to the [`http`](crate::http) module.
//! One request is sent per connection. There are no retries and no redirects.
//!
//! ## Request flow
//!
//! 1. Resolve the URL into an [`Endpoint`]
//! 2. Prepare the body and build a [`Request`]
//! 3. Serialize the request and write it to the stream
//! 4. Read until the response headers and the declared `Content-Length` are in. Without
//!    a `Content-Length` the response runs until the server closes the connection, or
//!    until the read timeout once something has arrived
//! 5. Parse the bytes into a [`Response`]

use std::time::Duration;

use async_std::future::timeout;
use async_std::net::TcpStream;
use async_std::prelude::*;

use crate::auth::Credentials;
use crate::config::ClientConfig;
use crate::http::headers::HttpHeaders;
use crate::http::request::{Request, build_request};
use crate::http::response::Response;
use crate::http::validator::{ValidationError, Validator};
use crate::http::{HttpMessage, MessageError, Method};
use crate::net::endpoint::{Endpoint, EndpointError, Scheme};
use crate::sms::{PayloadError, RequestBody, SmsMessage};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    #[error("TLS is not supported, cannot reach {0}")]
    TlsUnsupported(Endpoint),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error("network error talking to {endpoint}: {source}")]
    Io {
        endpoint: Endpoint,
        #[source]
        source: std::io::Error,
    },

    #[error("timed out after {timeout:?} talking to {endpoint}")]
    Timeout { endpoint: Endpoint, timeout: Duration },

    #[error("connection to {0} closed before any response was received")]
    ConnectionClosed(Endpoint),

    #[error("response from {endpoint} exceeds {limit} bytes")]
    ResponseTooLarge { endpoint: Endpoint, limit: usize },

    #[error("invalid response: {0}")]
    Message(#[from] MessageError),

    #[error("invalid request: {0}")]
    Request(#[from] ValidationError),
}

pub struct Client {
    config: ClientConfig,
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Posts an SMS to the configured API, authenticated with the configured credentials.
    pub async fn send_sms(&self, message: &SmsMessage) -> Result<Response, ClientError> {
        let credentials = Credentials::new(&self.config.username, &self.config.password);
        let body = RequestBody::try_from(message)?;
        self.post(&self.config.api_url, Some(credentials), body).await
    }

    pub async fn post(
        &self,
        url: &str,
        credentials: Option<Credentials>,
        body: impl Into<RequestBody>,
    ) -> Result<Response, ClientError> {
        self.execute(Method::Post, url, credentials, None, Some(body.into()))
            .await
    }

    /// Builds a request for `url` and sends it.
    ///
    /// Headers derived from `body` (`Content-Type`) only fill in what the caller did not set.
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        credentials: Option<Credentials>,
        headers: Option<HttpHeaders>,
        body: Option<RequestBody>,
    ) -> Result<Response, ClientError> {
        let endpoint: Endpoint = url.parse()?;
        Validator::validate_path(&endpoint.path)?;
        let mut headers = headers.unwrap_or_default();

        let body = match body {
            Some(body) => {
                let (text, body_headers) = body.prepare()?;
                for (name, value) in body_headers.iter() {
                    if !headers.contains(name) {
                        headers.set_raw(name, value);
                    }
                }
                Some(text)
            }
            None => None,
        };

        let request = build_request(
            method,
            &endpoint.authority,
            &endpoint.path,
            credentials,
            Some(headers),
            body,
        );
        self.send(&endpoint, &request).await
    }

    pub async fn send(&self, endpoint: &Endpoint, request: &Request) -> Result<Response, ClientError> {
        if endpoint.scheme == Scheme::Https {
            return Err(ClientError::TlsUnsupported(endpoint.clone()));
        }
        Validator::validate_path(&request.path)?;

        tracing::info!(start_line = %request.start_line(), %endpoint, "request");
        if !request.body.is_empty() {
            tracing::debug!(body = %request.body, "request body");
        }

        let data = self.round_trip(endpoint, &request.to_bytes()).await?;
        let response = Response::from_bytes(&data)?;

        tracing::info!(start_line = %response.start_line(), "response");
        tracing::debug!(body = %response.body, "response body");
        Ok(response)
    }

    /// Writes one message and reads back one message.
    async fn round_trip(&self, endpoint: &Endpoint, data: &[u8]) -> Result<Vec<u8>, ClientError> {
        let io_error = |source| ClientError::Io {
            endpoint: endpoint.clone(),
            source,
        };
        let timed_out = |after| ClientError::Timeout {
            endpoint: endpoint.clone(),
            timeout: after,
        };

        let write_timeout = self.config.write_timeout;
        let mut stream = timeout(
            write_timeout,
            TcpStream::connect((endpoint.host.as_str(), endpoint.port)),
        )
        .await
        .map_err(|_| timed_out(write_timeout))?
        .map_err(io_error)?;

        timeout(write_timeout, stream.write_all(data))
            .await
            .map_err(|_| timed_out(write_timeout))?
            .map_err(io_error)?;

        let read_timeout = self.config.read_timeout;
        let mut response = Vec::new();
        let mut buffer = vec![0; self.config.buffer_size.max(1)];

        loop {
            let n = match timeout(read_timeout, stream.read(&mut buffer)).await {
                // A server that never closes still gets its unframed response parsed
                Err(_) if !response.is_empty() && read_state(&response) == ReadState::UntilEof => {
                    tracing::debug!(
                        total = response.len(),
                        "no Content-Length, stopped at read timeout"
                    );
                    break;
                }
                Err(_) => return Err(timed_out(read_timeout)),
                Ok(Ok(n)) => n,
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Ok(Err(e)) => return Err(io_error(e)),
            };

            if n == 0 {
                break;
            }

            response.extend_from_slice(&buffer[..n]);
            tracing::trace!(read = n, total = response.len(), "read response bytes");

            if response.len() > self.config.max_response_size {
                return Err(ClientError::ResponseTooLarge {
                    endpoint: endpoint.clone(),
                    limit: self.config.max_response_size,
                });
            }

            if read_state(&response) == ReadState::Complete {
                break;
            }
        }

        if response.is_empty() {
            return Err(ClientError::ConnectionClosed(endpoint.clone()));
        }

        Ok(response)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadState {
    /// Head or declared body not fully buffered yet.
    Incomplete,
    /// Head plus the body announced by `Content-Length` are buffered.
    Complete,
    /// The head has no `Content-Length`, so the body runs until the connection closes.
    UntilEof,
}

/// Where reading stands for the bytes buffered so far.
///
/// Header names are matched case-insensitively here only to find the end of the
/// message on the wire.
fn read_state(buf: &[u8]) -> ReadState {
    let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
        return ReadState::Incomplete;
    };

    let content_length = buf[..head_end]
        .split(|&b| b == b'\n')
        .filter_map(|line| std::str::from_utf8(line).ok())
        .filter_map(|line| line.trim_end_matches('\r').split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok());

    match content_length {
        None => ReadState::UntilEof,
        Some(length) if buf.len() >= head_end + 4 + length => ReadState::Complete,
        Some(_) => ReadState::Incomplete,
    }
}

use std::fmt;
use std::str::FromStr;

use url::{Host, Url};

#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    #[error("invalid URL format: {url:?}: {source}")]
    Invalid {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid URL format: {0:?}")]
    Malformed(String),

    #[error("unsupported URL scheme {scheme:?} in {url:?}")]
    UnsupportedScheme { url: String, scheme: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// Where a request goes: the parts of an `http(s)://host[:port][/path]` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub scheme: Scheme,
    /// Address to connect to, IPv6 literals without brackets.
    pub host: String,
    pub port: u16,
    /// Value of the `Host` header: host as written in the URL plus `:port` unless the
    /// port is the scheme default.
    pub authority: String,
    /// Path plus query string, always starting with `/`.
    pub path: String,
}

impl FromStr for Endpoint {
    type Err = EndpointError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        // The URL parser quietly turns `\` into `/` for http(s)
        if input.contains('\\') {
            return Err(EndpointError::Malformed(input.to_string()));
        }

        let url = Url::parse(input).map_err(|source| EndpointError::Invalid {
            url: input.to_string(),
            source,
        })?;

        let scheme = match url.scheme() {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            other => {
                return Err(EndpointError::UnsupportedScheme {
                    url: input.to_string(),
                    scheme: other.to_string(),
                });
            }
        };

        let host = match url.host() {
            Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_string(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            _ => return Err(EndpointError::Malformed(input.to_string())),
        };
        let port = url
            .port_or_known_default()
            .ok_or_else(|| EndpointError::Malformed(input.to_string()))?;

        // `host_str` keeps the brackets around IPv6 literals
        let mut authority = url.host_str().unwrap_or(host.as_str()).to_string();
        if let Some(port) = url.port() {
            authority.push_str(&format!(":{port}"));
        }

        let mut path = url.path().to_string();
        if let Some(query) = url.query() {
            path.push('?');
            path.push_str(query);
        }

        Ok(Self {
            scheme,
            host,
            port,
            authority,
            path,
        })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}{}",
            self.scheme.as_str(),
            self.authority,
            self.path
        )
    }
}

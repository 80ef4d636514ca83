//! HTTP headers abstraction for [`Request`](crate::http::request::Request) and
//! [`Response`](crate::http::response::Response)
//!
//! Headers are stored in an ordered map to preserve insertion order.
//! Both header names and values are stored as raw strings. Names are case-sensitive
//! as stored: `Host` and `host` are two different entries.
//!
//! Setting a name that already exists overwrites the value in place, so the header
//! keeps its original position on the wire.
//!
//! This abstraction does not enforce any HTTP semantics. [`Request`](crate::http::request::Request)
//! and [`Response`](crate::http::response::Response) derive their framing headers on
//! top of it when serializing.

use indexmap::IndexMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpHeaders {
    headers: IndexMap<String, String>,
}

impl HttpHeaders {
    pub fn new() -> Self {
        Self {
            headers: IndexMap::new(),
        }
    }

    pub fn set_raw(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&String> {
        self.headers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }

    /// Removes a header without disturbing the order of the others.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.headers.shift_remove(name)
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Header lines as written on the wire, each terminated by CRLF.
    pub fn stringify(&self) -> String {
        let mut result = String::new();
        for (name, value) in &self.headers {
            result.push_str(&format!("{}: {}\r\n", name, value));
        }
        result
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HttpHeaders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            headers: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

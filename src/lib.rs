//! A minimal HTTP/1.1 client for sending SMS messages through a JSON API.
//!
//! The [`http`] module is a self-contained message codec: it turns a [`Request`]
//! into bytes and bytes into a [`Response`] without any platform HTTP stack. The
//! [`net`] module moves those bytes over TCP.
//!
//! [`Request`]: http::request::Request
//! [`Response`]: http::response::Response

pub mod auth;
pub mod config;
pub mod console;
pub mod http;
pub mod logging;
pub mod net;
pub mod sms;

//! HTTP client module
//!
//! Wraps `reqwest` with base-URL handling, JSON/multipart bodies and the
//! crate's error classification.
//!
//! # Error mapping
//!
//! - No response → `Error::Network`
//! - 404 → `Error::NotFound`
//! - 400 / 422 → `Error::Validation`
//! - Any other non-2xx → `Error::Http`
//!
//! The backend's `detail` message is kept on every HTTP-level error.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestBody, RequestConfig};

#[cfg(test)]
mod tests;

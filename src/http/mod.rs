//! HTTP transport
//!
//! Thin GET-and-decode client over reqwest. The sync core performs no
//! retries or backoff; a failed request surfaces directly to the caller.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};

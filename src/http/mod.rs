//! HTTP client module for fetching release assets.

mod client;

pub use client::HttpClient;

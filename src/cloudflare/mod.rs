//! Cloudflare API client.
//!
//! This module exports a client for the Cloudflare Version 4 API, and the
//! [`CloudflareApi`] trait the extension delegates through.
//! Learn more: https://api.cloudflare.com

/// The stable base URL for all Version 4 HTTPS endpoints to Cloudflare.
pub const API_BASE: &str = "https://api.cloudflare.com/client/v4";

mod api;
mod client;
mod endpoints;
pub mod models;
mod requests;

#[cfg(test)]
pub use api::MockCloudflareApi;
pub use api::{CloudflareApi, Connect};
pub use client::Client;
pub use requests::{Credentials, KV_KEY_NOT_FOUND, REQUEST_TIMEOUT};

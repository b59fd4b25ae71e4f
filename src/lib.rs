//! A Cloudflare API client, exposed as an extension of a host application.
//!
//! The extension reads `CLOUDFLARE_AUTH_EMAIL`, `CLOUDFLARE_AUTH_KEY` and
//! the optional `CLOUDFLARE_ENABLE_REDIS_COMPATIBILITY` flag from the
//! application config, builds a [`cloudflare::Client`] and registers itself
//! on the application. See [`ext`] for details.

// Clippy
#![deny(clippy::unwrap_used)] // use context/with_context
#![deny(clippy::expect_used)] // use context/with_context
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod app;
pub mod cloudflare;
pub mod config;
mod error;
pub mod ext;
mod extract;

pub use app::{Application, Config, Extensions};
pub use error::{Error, Result};
pub use ext::{CloudFlare, Operation, EXTENSION_KEY};

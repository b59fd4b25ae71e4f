//! Request-scoped access to the extension from axum handlers.
//!
//! Install the extension on a router with [`CloudFlare::layer`], then take
//! it as a handler argument:
//!
//! ```rust,ignore
//! async fn zones(cloudflare: CloudFlare) -> Result<Json<Vec<Zone>>, StatusCode> {
//!     cloudflare.zones().await.map(Json).map_err(|_| StatusCode::BAD_GATEWAY)
//! }
//!
//! let app = Router::new().route("/zones", get(zones)).layer(cloudflare.layer());
//! ```

use crate::cloudflare::CloudflareApi;
use crate::ext::CloudFlare;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Extension;
use tracing::error;

impl<C> CloudFlare<C>
where
    C: CloudflareApi + 'static,
{
    /// A layer making this extension available to request handlers.
    pub fn layer(&self) -> Extension<Self> {
        Extension(self.clone())
    }
}

impl<C, S> FromRequestParts<S> for CloudFlare<C>
where
    C: CloudflareApi + 'static,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Self>() {
            Some(ext) if ext.is_initialized() => Ok(ext.clone()),
            Some(_) => {
                error!("cloudflare extension layer installed before init_app");
                Err(StatusCode::INTERNAL_SERVER_ERROR)
            }
            None => {
                error!("cloudflare extension layer is not installed on this router");
                Err(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

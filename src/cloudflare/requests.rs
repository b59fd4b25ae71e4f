use crate::cloudflare::models::{CloudflareResponse, ResultResponse};
use crate::error::{Error, Result};
use reqwest::{Method, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::trace;

/// How long a single request to Cloudflare may take.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The error code Workers KV answers with for a missing key.
pub const KV_KEY_NOT_FOUND: i32 = 10009;

/// Global API key credentials, sent as `X-Auth-Email` and `X-Auth-Key`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub auth_email: String,
    pub auth_key: String,
}

impl Credentials {
    pub fn new(auth_email: impl Into<String>, auth_key: impl Into<String>) -> Self {
        Self {
            auth_email: auth_email.into(),
            auth_key: auth_key.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("auth_email", &self.auth_email)
            .field("auth_key", &"<redacted>")
            .finish()
    }
}

/// An authenticated HTTP gateway to one Cloudflare API base.
#[derive(Debug, Clone)]
pub(crate) struct Requester {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
}

impl Requester {
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or(Error::InvalidConfig {
                key: "base_url",
                expected: "an absolute http(s) URL",
            })?;
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Build the URL for an endpoint given as path segments, which are
    /// percent-encoded individually.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        trace!(%method, %url, "preparing cloudflare request");
        self.http
            .request(method, url)
            .header("X-Auth-Email", &self.credentials.auth_email)
            .header("X-Auth-Key", &self.credentials.auth_key)
    }

    pub async fn get<T>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<ResultResponse<T>>
    where
        T: DeserializeOwned,
    {
        send(self.request(Method::GET, segments).query(query)).await
    }

    pub async fn post<T>(
        &self,
        segments: &[&str],
        json: &(impl Serialize + ?Sized),
    ) -> Result<ResultResponse<T>>
    where
        T: DeserializeOwned,
    {
        send(self.request(Method::POST, segments).json(json)).await
    }

    pub async fn patch<T>(
        &self,
        segments: &[&str],
        json: &(impl Serialize + ?Sized),
    ) -> Result<ResultResponse<T>>
    where
        T: DeserializeOwned,
    {
        send(self.request(Method::PATCH, segments).json(json)).await
    }

    pub async fn delete<T>(&self, segments: &[&str]) -> Result<ResultResponse<T>>
    where
        T: DeserializeOwned,
    {
        send(self.request(Method::DELETE, segments)).await
    }

    /// Upload a raw body, as Workers KV expects for values.
    pub async fn put_bytes<T>(
        &self,
        segments: &[&str],
        body: Vec<u8>,
    ) -> Result<ResultResponse<T>>
    where
        T: DeserializeOwned,
    {
        send(
            self.request(Method::PUT, segments)
                .header("Content-Type", "application/octet-stream")
                .body(body),
        )
        .await
    }

    /// Download a raw body. Successful responses are not enveloped, failed
    /// ones are. A KV "key not found" failure yields `None`.
    pub async fn get_bytes(&self, segments: &[&str]) -> Result<Option<Vec<u8>>> {
        let resp = self.request(Method::GET, segments).send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        if status.is_success() {
            return Ok(Some(bytes.to_vec()));
        }
        let meta: CloudflareResponse = serde_json::from_slice(&bytes)?;
        if meta.errors.iter().any(|err| err.code == KV_KEY_NOT_FOUND) {
            return Ok(None);
        }
        Err(Error::Api(meta.errors))
    }
}

async fn send<T>(builder: RequestBuilder) -> Result<ResultResponse<T>>
where
    T: DeserializeOwned,
{
    let bytes = builder.send().await?.bytes().await?;
    unpack(&bytes)
}

/// Check the response envelope, then decode the payload.
pub(crate) fn unpack<T>(bytes: &[u8]) -> Result<ResultResponse<T>>
where
    T: DeserializeOwned,
{
    let meta: CloudflareResponse = serde_json::from_slice(bytes)?;
    if meta.success {
        Ok(serde_json::from_slice(bytes)?)
    } else {
        Err(Error::Api(meta.errors))
    }
}

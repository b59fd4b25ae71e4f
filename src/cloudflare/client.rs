use crate::cloudflare::api::{CloudflareApi, Connect};
use crate::cloudflare::endpoints;
use crate::cloudflare::models::{Account, KvKey, KvNamespace, Record, User, Zone};
use crate::cloudflare::requests::{Credentials, Requester};
use crate::cloudflare::API_BASE;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// A Cloudflare API client authenticated with a global API key.
#[derive(Debug)]
pub struct Client {
    requester: Requester,
    redis_compatibility: bool,
    accounts: RwLock<HashMap<String, Account>>,
}

impl Client {
    /// Create a client for the public Cloudflare API.
    pub fn new(
        auth_email: impl Into<String>,
        auth_key: impl Into<String>,
        enable_redis_compatibility: bool,
    ) -> Result<Self> {
        Self::with_base_url(
            API_BASE,
            Credentials::new(auth_email, auth_key),
            enable_redis_compatibility,
        )
    }

    /// Create a client against another API base, such as a proxy.
    pub fn with_base_url(
        base_url: &str,
        credentials: Credentials,
        enable_redis_compatibility: bool,
    ) -> Result<Self> {
        Ok(Self {
            requester: Requester::new(base_url, credentials)?,
            redis_compatibility: enable_redis_compatibility,
            accounts: RwLock::new(HashMap::new()),
        })
    }

    /// Whether missing KV keys read as `None` rather than failing.
    pub fn redis_compatibility(&self) -> bool {
        self.redis_compatibility
    }

    pub fn credentials(&self) -> &Credentials {
        self.requester.credentials()
    }

    fn account_id(&self, account: &str) -> Result<String> {
        self.account(account).map(|account| account.id)
    }
}

impl Connect for Client {
    fn connect(credentials: Credentials, enable_redis_compatibility: bool) -> Result<Self> {
        Self::with_base_url(API_BASE, credentials, enable_redis_compatibility)
    }
}

#[async_trait]
impl CloudflareApi for Client {
    #[tracing::instrument(level = "trace", skip(self))]
    async fn user(&self) -> Result<User> {
        endpoints::user(&self.requester).await
    }

    fn register_account(&self, account_id: &str, name: &str) -> Result<Account> {
        let account = Account {
            id: account_id.to_string(),
            name: name.to_string(),
        };
        debug!(%account, "registering account");
        self.accounts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), account.clone());
        Ok(account)
    }

    fn account(&self, name: &str) -> Result<Account> {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownAccount(name.to_string()))
    }

    fn accounts(&self) -> Result<Vec<Account>> {
        let mut accounts: Vec<Account> = self
            .accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(accounts)
    }

    #[tracing::instrument(level = "trace", skip(self))]
    async fn zones(&self) -> Result<Vec<Zone>> {
        endpoints::zones(&self.requester).await
    }

    #[tracing::instrument(level = "trace", skip(self))]
    async fn records(&self, zone_id: &str) -> Result<Vec<Record>> {
        endpoints::records(&self.requester, zone_id).await
    }

    #[tracing::instrument(level = "trace", skip(self))]
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        content: &str,
    ) -> Result<Record> {
        endpoints::update_record(&self.requester, zone_id, record_id, content).await
    }

    #[tracing::instrument(level = "trace", skip(self))]
    async fn kv_namespaces(&self, account: &str) -> Result<Vec<KvNamespace>> {
        let account_id = self.account_id(account)?;
        endpoints::kv_namespaces(&self.requester, &account_id).await
    }

    #[tracing::instrument(level = "trace", skip(self))]
    async fn create_kv_namespace(&self, account: &str, title: &str) -> Result<KvNamespace> {
        let account_id = self.account_id(account)?;
        endpoints::create_kv_namespace(&self.requester, &account_id, title).await
    }

    #[tracing::instrument(level = "trace", skip(self))]
    async fn kv_keys(&self, account: &str, namespace_id: &str) -> Result<Vec<KvKey>> {
        let account_id = self.account_id(account)?;
        endpoints::kv_keys(&self.requester, &account_id, namespace_id).await
    }

    #[tracing::instrument(level = "trace", skip(self))]
    async fn kv_get(
        &self,
        account: &str,
        namespace_id: &str,
        key: &str,
    ) -> Result<Option<Vec<u8>>> {
        let account_id = self.account_id(account)?;
        match endpoints::kv_get(&self.requester, &account_id, namespace_id, key).await? {
            Some(value) => Ok(Some(value)),
            None if self.redis_compatibility => Ok(None),
            None => Err(Error::KeyNotFound(key.to_string())),
        }
    }

    #[tracing::instrument(level = "trace", skip(self, value), fields(len = value.len()))]
    async fn kv_put(
        &self,
        account: &str,
        namespace_id: &str,
        key: &str,
        value: Vec<u8>,
    ) -> Result<()> {
        let account_id = self.account_id(account)?;
        endpoints::kv_put(&self.requester, &account_id, namespace_id, key, value).await
    }

    #[tracing::instrument(level = "trace", skip(self))]
    async fn kv_delete(&self, account: &str, namespace_id: &str, key: &str) -> Result<()> {
        let account_id = self.account_id(account)?;
        endpoints::kv_delete(&self.requester, &account_id, namespace_id, key).await
    }
}

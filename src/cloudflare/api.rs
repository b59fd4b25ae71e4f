use crate::cloudflare::models::{Account, KvKey, KvNamespace, Record, User, Zone};
use crate::cloudflare::requests::Credentials;
use crate::error::Result;
use async_trait::async_trait;

/// Every operation the extension delegates to a Cloudflare client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CloudflareApi: Send + Sync {
    /// Return the user the credentials belong to.
    async fn user(&self) -> Result<User>;

    /// Register an account under a local name, replacing any account
    /// previously registered under that name.
    fn register_account(&self, account_id: &str, name: &str) -> Result<Account>;
    fn account(&self, name: &str) -> Result<Account>;
    fn accounts(&self) -> Result<Vec<Account>>;

    async fn zones(&self) -> Result<Vec<Zone>>;
    async fn records(&self, zone_id: &str) -> Result<Vec<Record>>;
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        content: &str,
    ) -> Result<Record>;

    // Workers KV, addressed by registered account name.
    async fn kv_namespaces(&self, account: &str) -> Result<Vec<KvNamespace>>;
    async fn create_kv_namespace(&self, account: &str, title: &str) -> Result<KvNamespace>;
    async fn kv_keys(&self, account: &str, namespace_id: &str) -> Result<Vec<KvKey>>;
    async fn kv_get(
        &self,
        account: &str,
        namespace_id: &str,
        key: &str,
    ) -> Result<Option<Vec<u8>>>;
    async fn kv_put(
        &self,
        account: &str,
        namespace_id: &str,
        key: &str,
        value: Vec<u8>,
    ) -> Result<()>;
    async fn kv_delete(&self, account: &str, namespace_id: &str, key: &str) -> Result<()>;
}

/// Construction of a client from extension configuration.
pub trait Connect: Sized {
    fn connect(credentials: Credentials, enable_redis_compatibility: bool) -> Result<Self>;
}

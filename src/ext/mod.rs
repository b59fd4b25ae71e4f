//! The Cloudflare extension.
//!
//! [`CloudFlare`] reads credentials from an [`Application`]'s config,
//! constructs a client with them and registers itself on the application
//! under [`EXTENSION_KEY`]. Every [`CloudflareApi`] operation is forwarded to
//! the client unchanged; [`CloudFlare::invoke`] forwards by operation name.
//!
//! ```no_run
//! use cfext::{Application, CloudFlare};
//!
//! # fn main() -> cfext::Result<()> {
//! let mut app = Application::new("site");
//! app.config_mut()
//!     .insert("CLOUDFLARE_AUTH_EMAIL", "user@example.com")
//!     .insert("CLOUDFLARE_AUTH_KEY", "c2547eb745079dac9320b638f5e225cf483cc5cfdda41");
//! let cloudflare: CloudFlare = CloudFlare::new(Some(&mut app))?;
//! assert!(CloudFlare::<cfext::cloudflare::Client>::from_app(&app).is_some());
//! # let _ = cloudflare;
//! # Ok(())
//! # }
//! ```

mod operation;
mod settings;

pub use operation::Operation;
pub use settings::{
    MissingOperation, Settings, AUTH_EMAIL_KEY, AUTH_KEY_KEY, REDIS_COMPATIBILITY_KEY,
    STRICT_ATTRIBUTES_KEY,
};

use crate::app::Application;
use crate::cloudflare::models::{Account, KvKey, KvNamespace, Record, User, Zone};
use crate::cloudflare::{Client, CloudflareApi, Connect, Credentials};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

/// The key the extension registers itself under.
pub const EXTENSION_KEY: &str = "cloudflare";

struct Bound<C> {
    client: C,
    missing_operation: MissingOperation,
}

/// The Cloudflare extension. Clones share the same client.
pub struct CloudFlare<C = Client> {
    app: Option<String>,
    bound: Arc<OnceLock<Bound<C>>>,
}

impl<C> Clone for CloudFlare<C> {
    fn clone(&self) -> Self {
        Self {
            app: self.app.clone(),
            bound: Arc::clone(&self.bound),
        }
    }
}

impl<C> Default for CloudFlare<C> {
    fn default() -> Self {
        Self {
            app: None,
            bound: Arc::new(OnceLock::new()),
        }
    }
}

impl<C> fmt::Debug for CloudFlare<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudFlare")
            .field("app", &self.app)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl<C> CloudFlare<C> {
    /// The name of the application the extension was initialized on.
    pub fn app_name(&self) -> Option<&str> {
        self.app.as_deref()
    }

    pub fn is_initialized(&self) -> bool {
        self.bound.get().is_some()
    }
}

impl<C> CloudFlare<C>
where
    C: CloudflareApi + 'static,
{
    /// Create the extension, initializing it right away when an application
    /// is given. Otherwise [`CloudFlare::init_app`] must run before use.
    pub fn new(app: Option<&mut Application>) -> Result<Self>
    where
        C: Connect,
    {
        let mut ext = Self::default();
        if let Some(app) = app {
            ext.init_app(app)?;
        }
        Ok(ext)
    }

    /// Construct the client from the application config and register the
    /// extension on the application.
    pub fn init_app(&mut self, app: &mut Application) -> Result<()>
    where
        C: Connect,
    {
        self.init_app_with(app, C::connect)
    }

    /// Like [`CloudFlare::init_app`], with a custom client constructor.
    #[tracing::instrument(level = "trace", skip(self, app, connect), fields(app = app.name()))]
    pub fn init_app_with<F>(&mut self, app: &mut Application, connect: F) -> Result<()>
    where
        F: FnOnce(Credentials, bool) -> Result<C>,
    {
        if self.is_initialized() {
            return Err(Error::AlreadyInitialized);
        }
        let settings = Settings::from_config(app.config())?;
        let client = connect(settings.credentials, settings.enable_redis_compatibility)?;
        self.bound
            .set(Bound {
                client,
                missing_operation: settings.missing_operation,
            })
            .map_err(|_| Error::AlreadyInitialized)?;
        self.app = Some(app.name().to_string());

        if app.extensions_mut().insert(EXTENSION_KEY, self.clone()) {
            warn!(app = app.name(), "replaced a previously registered extension");
        }
        info!(
            app = app.name(),
            redis_compatibility = settings.enable_redis_compatibility,
            "cloudflare extension initialized"
        );
        Ok(())
    }

    /// Retrieve the extension registered on an application.
    pub fn from_app(app: &Application) -> Option<Self> {
        app.extensions().get::<Self>(EXTENSION_KEY).cloned()
    }

    /// The wrapped client.
    pub fn client(&self) -> Result<&C> {
        self.bound().map(|bound| &bound.client)
    }

    pub fn missing_operation(&self) -> Result<MissingOperation> {
        self.bound().map(|bound| bound.missing_operation)
    }

    fn bound(&self) -> Result<&Bound<C>> {
        self.bound.get().ok_or(Error::NotInitialized)
    }

    /// Forward a call by operation name.
    ///
    /// An unknown name yields `Ok(None)` after logging a warning, or
    /// [`Error::UnknownOperation`] when the extension is strict. A known
    /// operation always yields `Some`, which is `Value::Null` for operations
    /// without a result.
    #[tracing::instrument(level = "trace", skip(self))]
    pub async fn invoke(&self, name: &str, args: &[&str]) -> Result<Option<Value>> {
        let bound = self.bound()?;
        let op = match name.parse::<Operation>() {
            Ok(op) => op,
            Err(err) => match bound.missing_operation {
                MissingOperation::Fail => return Err(err),
                MissingOperation::Warn => {
                    warn!("CloudFlare: operation {name} was not found");
                    return Ok(None);
                }
            },
        };
        operation::dispatch(&bound.client, op, args).await.map(Some)
    }
}

#[async_trait]
impl<C> CloudflareApi for CloudFlare<C>
where
    C: CloudflareApi + 'static,
{
    async fn user(&self) -> Result<User> {
        self.client()?.user().await
    }

    fn register_account(&self, account_id: &str, name: &str) -> Result<Account> {
        self.client()?.register_account(account_id, name)
    }

    fn account(&self, name: &str) -> Result<Account> {
        self.client()?.account(name)
    }

    fn accounts(&self) -> Result<Vec<Account>> {
        self.client()?.accounts()
    }

    async fn zones(&self) -> Result<Vec<Zone>> {
        self.client()?.zones().await
    }

    async fn records(&self, zone_id: &str) -> Result<Vec<Record>> {
        self.client()?.records(zone_id).await
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        content: &str,
    ) -> Result<Record> {
        self.client()?
            .update_record(zone_id, record_id, content)
            .await
    }

    async fn kv_namespaces(&self, account: &str) -> Result<Vec<KvNamespace>> {
        self.client()?.kv_namespaces(account).await
    }

    async fn create_kv_namespace(&self, account: &str, title: &str) -> Result<KvNamespace> {
        self.client()?.create_kv_namespace(account, title).await
    }

    async fn kv_keys(&self, account: &str, namespace_id: &str) -> Result<Vec<KvKey>> {
        self.client()?.kv_keys(account, namespace_id).await
    }

    async fn kv_get(
        &self,
        account: &str,
        namespace_id: &str,
        key: &str,
    ) -> Result<Option<Vec<u8>>> {
        self.client()?.kv_get(account, namespace_id, key).await
    }

    async fn kv_put(
        &self,
        account: &str,
        namespace_id: &str,
        key: &str,
        value: Vec<u8>,
    ) -> Result<()> {
        self.client()?
            .kv_put(account, namespace_id, key, value)
            .await
    }

    async fn kv_delete(&self, account: &str, namespace_id: &str, key: &str) -> Result<()> {
        self.client()?.kv_delete(account, namespace_id, key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Config;
    use crate::cloudflare::MockCloudflareApi;
    use std::sync::Mutex;

    type MockExt = CloudFlare<MockCloudflareApi>;

    fn app_with(pairs: &[(&str, Value)]) -> Application {
        Application::new("test-app").with_config(pairs.iter().cloned().collect::<Config>())
    }

    fn configured_app() -> Application {
        app_with(&[
            (AUTH_EMAIL_KEY, "user@example.com".into()),
            (AUTH_KEY_KEY, "secret".into()),
        ])
    }

    fn init(app: &mut Application, mock: MockCloudflareApi) -> MockExt {
        let mut ext = MockExt::default();
        ext.init_app_with(app, |_, _| Ok(mock)).unwrap();
        ext
    }

    fn zone() -> Zone {
        Zone {
            id: "023e105f4ecef8ad9ca31a8372d0c353".into(),
            name: "example.com".into(),
            status: "active".into(),
            permissions: vec!["#zone:edit".into()],
            modified_on: None,
        }
    }

    #[test]
    fn missing_either_credential_fails() {
        for pairs in [
            vec![(AUTH_EMAIL_KEY, Value::from("user@example.com"))],
            vec![(AUTH_KEY_KEY, Value::from("secret"))],
            vec![],
        ] {
            let mut app = app_with(&pairs);
            let mut ext = MockExt::default();
            let err = ext
                .init_app_with(&mut app, |_, _| Ok(MockCloudflareApi::new()))
                .unwrap_err();
            assert!(matches!(err, Error::MissingConfig { .. }));
            assert!(!ext.is_initialized());
            assert!(!app.extensions().contains(EXTENSION_KEY));
        }
    }

    #[test]
    fn redis_compatibility_defaults_to_false() {
        let seen = Mutex::new(None);
        let mut app = configured_app();
        let mut ext = MockExt::default();
        ext.init_app_with(&mut app, |credentials, redis| {
            *seen.lock().unwrap() = Some((credentials, redis));
            Ok(MockCloudflareApi::new())
        })
        .unwrap();

        let (credentials, redis) = seen.lock().unwrap().take().unwrap();
        assert_eq!(credentials, Credentials::new("user@example.com", "secret"));
        assert!(!redis);
    }

    #[test]
    fn redis_compatibility_is_passed_through() {
        let mut app = configured_app();
        app.config_mut().insert(REDIS_COMPATIBILITY_KEY, true);
        let ext: CloudFlare = CloudFlare::new(Some(&mut app)).unwrap();
        assert!(ext.client().unwrap().redis_compatibility());
    }

    #[test]
    fn registers_on_the_application() {
        let mut app = configured_app();
        let ext = init(&mut app, MockCloudflareApi::new());

        let registered = MockExt::from_app(&app).unwrap();
        assert_eq!(registered.app_name(), Some("test-app"));
        assert!(Arc::ptr_eq(&registered.bound, &ext.bound));
        assert!(app.extensions().contains("cloudflare"));
    }

    #[test]
    fn deferred_init() {
        let mut ext: CloudFlare = CloudFlare::new(None).unwrap();
        assert!(matches!(ext.client(), Err(Error::NotInitialized)));
        assert!(matches!(
            ext.register_account("a1", "main"),
            Err(Error::NotInitialized)
        ));

        let mut app = configured_app();
        ext.init_app(&mut app).unwrap();
        assert!(ext.is_initialized());
        assert_eq!(ext.app_name(), Some("test-app"));
    }

    #[test]
    fn debug_shows_initialization_state() {
        let mut app = configured_app();
        let mut ext = MockExt::default();
        assert_eq!(
            format!("{ext:?}"),
            "CloudFlare { app: None, initialized: false }"
        );
        ext.init_app_with(&mut app, |_, _| Ok(MockCloudflareApi::new()))
            .unwrap();
        assert_eq!(
            format!("{ext:?}"),
            "CloudFlare { app: Some(\"test-app\"), initialized: true }"
        );
    }

    #[test]
    fn second_init_is_rejected() {
        let mut app = configured_app();
        let mut ext = init(&mut app, MockCloudflareApi::new());
        let err = ext
            .init_app_with(&mut app, |_, _| Ok(MockCloudflareApi::new()))
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyInitialized));
    }

    #[test]
    fn register_account_passes_through() {
        let mut mock = MockCloudflareApi::new();
        mock.expect_register_account()
            .times(1)
            .returning(|account_id, name| {
                Ok(Account {
                    id: account_id.to_string(),
                    name: name.to_string(),
                })
            });
        let mut app = configured_app();
        let ext = init(&mut app, mock);

        let account = ext.register_account("01a7362d577a6c3019a474fd6f485823", "main").unwrap();
        assert_eq!(
            account,
            Account {
                id: "01a7362d577a6c3019a474fd6f485823".into(),
                name: "main".into(),
            }
        );
    }

    #[tokio::test]
    async fn forwarded_results_are_unmodified() {
        let mut mock = MockCloudflareApi::new();
        mock.expect_zones().times(2).returning(|| Ok(vec![zone()]));
        let mut app = configured_app();
        let ext = init(&mut app, mock);

        assert_eq!(ext.zones().await.unwrap(), vec![zone()]);
        let by_name = ext.invoke("zones", &[]).await.unwrap().unwrap();
        assert_eq!(by_name, serde_json::to_value(vec![zone()]).unwrap());
    }

    #[tokio::test]
    async fn forwarded_errors_are_unmodified() {
        let mut mock = MockCloudflareApi::new();
        mock.expect_kv_get()
            .returning(|_, _, key| Err(Error::KeyNotFound(key.to_string())));
        let mut app = configured_app();
        let ext = init(&mut app, mock);

        let err = ext.kv_get("main", "ns", "missing").await.unwrap_err();
        assert!(matches!(err, Error::KeyNotFound(key) if key == "missing"));
    }

    #[tokio::test]
    async fn unknown_operation_yields_none_by_default() {
        let mut app = configured_app();
        let ext = init(&mut app, MockCloudflareApi::new());
        assert_eq!(ext.invoke("purge_everything", &["a", "b"]).await.unwrap(), None);
    }

    #[tokio::test]
    async fn unknown_operation_fails_when_strict() {
        let mut app = configured_app();
        app.config_mut().insert(STRICT_ATTRIBUTES_KEY, true);
        let ext = init(&mut app, MockCloudflareApi::new());
        let err = ext.invoke("purge_everything", &[]).await.unwrap_err();
        assert!(matches!(err, Error::UnknownOperation(name) if name == "purge_everything"));
    }

    #[tokio::test]
    async fn invoke_checks_arity() {
        let mut app = configured_app();
        let ext = init(&mut app, MockCloudflareApi::new());
        let err = ext.invoke("register_account", &["only-one"]).await.unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidArguments {
                operation: "register_account",
                expected: 2,
                got: 1
            }
        ));
    }

    #[tokio::test]
    async fn invoke_distinguishes_absent_values() {
        let mut mock = MockCloudflareApi::new();
        mock.expect_kv_get().returning(|_, _, _| Ok(None));
        let mut app = configured_app();
        let ext = init(&mut app, mock);
        assert_eq!(
            ext.invoke("kv_get", &["main", "ns", "key"]).await.unwrap(),
            Some(Value::Null)
        );
    }
}

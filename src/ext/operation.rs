use crate::cloudflare::CloudflareApi;
use crate::error::{Error, Result};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// An operation reachable by name on a Cloudflare client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    User,
    RegisterAccount,
    Account,
    Accounts,
    Zones,
    Records,
    UpdateRecord,
    KvNamespaces,
    CreateKvNamespace,
    KvKeys,
    KvGet,
    KvPut,
    KvDelete,
}

impl Operation {
    pub const ALL: [Operation; 13] = [
        Operation::User,
        Operation::RegisterAccount,
        Operation::Account,
        Operation::Accounts,
        Operation::Zones,
        Operation::Records,
        Operation::UpdateRecord,
        Operation::KvNamespaces,
        Operation::CreateKvNamespace,
        Operation::KvKeys,
        Operation::KvGet,
        Operation::KvPut,
        Operation::KvDelete,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::User => "user",
            Operation::RegisterAccount => "register_account",
            Operation::Account => "account",
            Operation::Accounts => "accounts",
            Operation::Zones => "zones",
            Operation::Records => "records",
            Operation::UpdateRecord => "update_record",
            Operation::KvNamespaces => "kv_namespaces",
            Operation::CreateKvNamespace => "create_kv_namespace",
            Operation::KvKeys => "kv_keys",
            Operation::KvGet => "kv_get",
            Operation::KvPut => "kv_put",
            Operation::KvDelete => "kv_delete",
        }
    }

    /// The number of positional string arguments the operation takes.
    pub fn arity(self) -> usize {
        match self {
            Operation::User | Operation::Accounts | Operation::Zones => 0,
            Operation::Account | Operation::Records | Operation::KvNamespaces => 1,
            Operation::RegisterAccount
            | Operation::CreateKvNamespace
            | Operation::KvKeys => 2,
            Operation::UpdateRecord | Operation::KvGet | Operation::KvDelete => 3,
            Operation::KvPut => 4,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| Error::UnknownOperation(s.to_string()))
    }
}

/// Run an operation against a client, encoding its result as JSON.
///
/// KV values are returned as (lossy) UTF-8 strings; a missing value is
/// `null`.
pub(crate) async fn dispatch<C>(client: &C, op: Operation, args: &[&str]) -> Result<Value>
where
    C: CloudflareApi + ?Sized,
{
    let value = match (op, args) {
        (Operation::User, []) => serde_json::to_value(client.user().await?)?,
        (Operation::RegisterAccount, [account_id, name]) => {
            serde_json::to_value(client.register_account(account_id, name)?)?
        }
        (Operation::Account, [name]) => serde_json::to_value(client.account(name)?)?,
        (Operation::Accounts, []) => serde_json::to_value(client.accounts()?)?,
        (Operation::Zones, []) => serde_json::to_value(client.zones().await?)?,
        (Operation::Records, [zone_id]) => {
            serde_json::to_value(client.records(zone_id).await?)?
        }
        (Operation::UpdateRecord, [zone_id, record_id, content]) => serde_json::to_value(
            client.update_record(zone_id, record_id, content).await?,
        )?,
        (Operation::KvNamespaces, [account]) => {
            serde_json::to_value(client.kv_namespaces(account).await?)?
        }
        (Operation::CreateKvNamespace, [account, title]) => {
            serde_json::to_value(client.create_kv_namespace(account, title).await?)?
        }
        (Operation::KvKeys, [account, namespace_id]) => {
            serde_json::to_value(client.kv_keys(account, namespace_id).await?)?
        }
        (Operation::KvGet, [account, namespace_id, key]) => {
            match client.kv_get(account, namespace_id, key).await? {
                Some(bytes) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
                None => Value::Null,
            }
        }
        (Operation::KvPut, [account, namespace_id, key, value]) => {
            client
                .kv_put(account, namespace_id, key, value.as_bytes().to_vec())
                .await?;
            Value::Null
        }
        (Operation::KvDelete, [account, namespace_id, key]) => {
            client.kv_delete(account, namespace_id, key).await?;
            Value::Null
        }
        (op, args) => {
            return Err(Error::InvalidArguments {
                operation: op.name(),
                expected: op.arity(),
                got: args.len(),
            })
        }
    };
    Ok(value)
}

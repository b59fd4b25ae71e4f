use crate::cloudflare::models::{
    KvKey, KvNamespace, Record, ResultInfo, User, Zone,
};
use crate::cloudflare::requests::Requester;
use crate::error::Result;
use serde_json::json;
use tracing::debug;

/// How many KV keys to request per page.
const KV_KEYS_PAGE_LIMIT: u32 = 1000;

fn has_next_page(page: i32, info: Option<&ResultInfo>) -> bool {
    info.and_then(|info| info.total_pages)
        .is_some_and(|total| page < total)
}

/// Return the user the credentials belong to.
pub(crate) async fn user(req: &Requester) -> Result<User> {
    Ok(req.get::<User>(&["user"], &[]).await?.result)
}

/// Return all known Cloudflare zones.
pub(crate) async fn zones(req: &Requester) -> Result<Vec<Zone>> {
    let mut zones = vec![];
    let mut page_cursor = 1;
    loop {
        debug!(page = page_cursor, "retrieving zones");
        let resp = req
            .get::<Vec<Zone>>(
                &["zones"],
                &[("order", "name".into()), ("page", page_cursor.to_string())],
            )
            .await?;
        zones.extend(resp.result);

        if !has_next_page(page_cursor, resp.result_info.as_ref()) {
            break;
        }
        page_cursor += 1;
    }
    debug!("collected {} zones", zones.len());
    Ok(zones)
}

/// Return all DNS records of a zone.
pub(crate) async fn records(req: &Requester, zone_id: &str) -> Result<Vec<Record>> {
    let mut records = vec![];
    let mut page_cursor = 1;
    loop {
        debug!(zone = zone_id, page = page_cursor, "retrieving records");
        let resp = req
            .get::<Vec<Record>>(
                &["zones", zone_id, "dns_records"],
                &[("order", "name".into()), ("page", page_cursor.to_string())],
            )
            .await?;
        records.extend(resp.result);

        if !has_next_page(page_cursor, resp.result_info.as_ref()) {
            break;
        }
        page_cursor += 1;
    }
    debug!(zone_id, "collected {} records", records.len());
    Ok(records)
}

/// Patch the content of a Cloudflare record.
pub(crate) async fn update_record(
    req: &Requester,
    zone_id: &str,
    record_id: &str,
    content: &str,
) -> Result<Record> {
    let data = json!({ "content": content });
    let resp = req
        .patch::<Record>(&["zones", zone_id, "dns_records", record_id], &data)
        .await?;
    Ok(resp.result)
}

/// Return all Workers KV namespaces of an account.
pub(crate) async fn kv_namespaces(
    req: &Requester,
    account_id: &str,
) -> Result<Vec<KvNamespace>> {
    let mut namespaces = vec![];
    let mut page_cursor = 1;
    loop {
        debug!(account = account_id, page = page_cursor, "retrieving namespaces");
        let resp = req
            .get::<Vec<KvNamespace>>(
                &["accounts", account_id, "storage", "kv", "namespaces"],
                &[("page", page_cursor.to_string())],
            )
            .await?;
        namespaces.extend(resp.result);

        if !has_next_page(page_cursor, resp.result_info.as_ref()) {
            break;
        }
        page_cursor += 1;
    }
    Ok(namespaces)
}

pub(crate) async fn create_kv_namespace(
    req: &Requester,
    account_id: &str,
    title: &str,
) -> Result<KvNamespace> {
    let resp = req
        .post::<KvNamespace>(
            &["accounts", account_id, "storage", "kv", "namespaces"],
            &json!({ "title": title }),
        )
        .await?;
    Ok(resp.result)
}

/// Return every key of a namespace, following the listing cursor.
pub(crate) async fn kv_keys(
    req: &Requester,
    account_id: &str,
    namespace_id: &str,
) -> Result<Vec<KvKey>> {
    let mut keys = vec![];
    let mut cursor: Option<String> = None;
    loop {
        debug!(namespace = namespace_id, ?cursor, "retrieving keys");
        let mut query = vec![("limit", KV_KEYS_PAGE_LIMIT.to_string())];
        if let Some(cursor) = cursor.take() {
            query.push(("cursor", cursor));
        }
        let resp = req
            .get::<Vec<KvKey>>(
                &[
                    "accounts",
                    account_id,
                    "storage",
                    "kv",
                    "namespaces",
                    namespace_id,
                    "keys",
                ],
                &query,
            )
            .await?;
        keys.extend(resp.result);

        cursor = resp
            .result_info
            .and_then(|info| info.cursor)
            .filter(|cursor| !cursor.is_empty());
        if cursor.is_none() {
            break;
        }
    }
    debug!(namespace = namespace_id, "collected {} keys", keys.len());
    Ok(keys)
}

/// Read a value. `None` when the key does not exist.
pub(crate) async fn kv_get(
    req: &Requester,
    account_id: &str,
    namespace_id: &str,
    key: &str,
) -> Result<Option<Vec<u8>>> {
    req.get_bytes(&kv_value_path(account_id, namespace_id, key))
        .await
}

pub(crate) async fn kv_put(
    req: &Requester,
    account_id: &str,
    namespace_id: &str,
    key: &str,
    value: Vec<u8>,
) -> Result<()> {
    req.put_bytes::<Option<serde_json::Value>>(
        &kv_value_path(account_id, namespace_id, key),
        value,
    )
    .await?;
    Ok(())
}

pub(crate) async fn kv_delete(
    req: &Requester,
    account_id: &str,
    namespace_id: &str,
    key: &str,
) -> Result<()> {
    req.delete::<Option<serde_json::Value>>(&kv_value_path(account_id, namespace_id, key))
        .await?;
    Ok(())
}

fn kv_value_path<'a>(
    account_id: &'a str,
    namespace_id: &'a str,
    key: &'a str,
) -> [&'a str; 8] {
    [
        "accounts",
        account_id,
        "storage",
        "kv",
        "namespaces",
        namespace_id,
        "values",
        key,
    ]
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudflareError {
    pub code: i32,
    pub message: String,
    #[serde(default)]
    pub error_chain: Option<Vec<CloudflareMessage>>,
}

impl fmt::Display for CloudflareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(chain) = self.error_chain.as_ref() {
            for message in chain {
                write!(f, " (caused by {message})")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudflareMessage {
    pub code: i32,
    pub message: String,
}

impl fmt::Display for CloudflareMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// The metadata every Version 4 response carries.
#[derive(Debug, Deserialize)]
pub struct CloudflareResponse {
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<CloudflareError>,
    #[serde(default)]
    pub messages: Vec<CloudflareMessage>,
}

/// A successful response payload.
#[derive(Debug, Deserialize)]
pub struct ResultResponse<T> {
    pub result: T,
    #[serde(default)]
    pub result_info: Option<ResultInfo>,
}

/// Pagination details. Page based for most listings, cursor based for KV
/// keys.
#[derive(Debug, Default, Deserialize)]
pub struct ResultInfo {
    #[serde(default)]
    pub page: Option<i32>,
    #[serde(default)]
    pub total_pages: Option<i32>,
    #[serde(default)]
    pub count: Option<i32>,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.email, self.id)
    }
}

/// An account registered on the client under a local name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub modified_on: Option<DateTime<Utc>>,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub zone_id: Option<String>,
    #[serde(default)]
    pub zone_name: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub content: String,
    #[serde(default)]
    pub proxied: Option<bool>,
    #[serde(default)]
    pub ttl: Option<u32>,
    #[serde(default)]
    pub locked: bool,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} => {}", self.name, self.id, self.content)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvNamespace {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub supports_url_encoding: Option<bool>,
}

impl fmt::Display for KvNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvKey {
    pub name: String,
    /// Unix timestamp at which the key expires.
    #[serde(default)]
    pub expiration: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_deserializes_without_zone_fields() {
        let record: Record = serde_json::from_str(
            r#"{"id":"372e","name":"example.com","type":"A","content":"198.51.100.4"}"#,
        )
        .unwrap();
        assert_eq!(record.record_type, "A");
        assert_eq!(record.zone_id, None);
        assert!(!record.locked);
        assert_eq!(record.to_string(), "example.com: 372e => 198.51.100.4");
    }

    #[test]
    fn error_display_includes_chain() {
        let err: CloudflareError = serde_json::from_str(
            r#"{"code":1003,"message":"Invalid or missing zone id.",
                "error_chain":[{"code":7003,"message":"Could not route"}]}"#,
        )
        .unwrap();
        assert_eq!(
            err.to_string(),
            "1003: Invalid or missing zone id. (caused by 7003: Could not route)"
        );
    }
}

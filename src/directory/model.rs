//! Wire model for the directory `applications` listing.

use chrono::{DateTime, Utc};
use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

/// A registered application and its credentials.
///
/// Field names follow the directory's camelCase JSON. Credential lists
/// keep the order the directory returned them in, since the metric
/// sequence index is positional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    /// Opaque application (client) identifier; empty if the directory omitted it.
    #[serde(default, deserialize_with = "null_as_default")]
    pub app_id: String,
    /// Human-readable name; may be absent or null.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Client secrets.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub password_credentials: Vec<PasswordCredential>,
    /// Certificate credentials.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub key_credentials: Vec<KeyCredential>,
}

/// A password-style credential (client secret).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordCredential {
    /// Expiration time; `None` if absent or unparseable.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub end_date_time: Option<DateTime<Utc>>,
}

/// A public-key credential (certificate).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyCredential {
    /// Issuance time; `None` if absent or unparseable.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub start_date_time: Option<DateTime<Utc>>,
    /// Expiration time; `None` if absent or unparseable.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub end_date_time: Option<DateTime<Utc>>,
}

/// One page of the `applications` listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationPage {
    /// Applications on this page.
    #[serde(default)]
    pub value: Vec<Application>,
    /// URL of the next page, if any.
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

/// Token endpoint response; only the bearer token is used.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Bearer token for the directory API.
    pub access_token: String,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts any JSON value for a timestamp field.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Other(IgnoredAny),
}

/// Parses an RFC 3339 timestamp, mapping anything unusable to `None` so a
/// single bad credential cannot fail the whole page.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTimestamp>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawTimestamp::Text(text)) => DateTime::parse_from_rfc3339(&text)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        _ => None,
    })
}

/*
 * Responsibility
 * - POST /authorize の入力 (gateway の REQUEST authorizer イベント)
 * - 型の合わないフィールドは 400 にせず読み飛ばす (必ず decision を返すため)
 * - 出力は services::auth::AuthorizationDecision をそのまま JSON 化する
 */
use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Authorizer request envelope.
///
/// Accepts the gateway's native `methodArn` as well as `resourceIdentifier`
/// (the latter wins when both are sent). Unknown fields (`type`,
/// `requestContext`, ...) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerRequest {
    #[serde(default, deserialize_with = "string_or_none")]
    pub resource_identifier: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub method_arn: Option<String>,
    #[serde(default, deserialize_with = "string_headers")]
    pub headers: HashMap<String, String>,
}

impl AuthorizerRequest {
    /// The invoked resource, or `""` when the envelope names none.
    pub fn resource(&self) -> &str {
        self.resource_identifier
            .as_deref()
            .or(self.method_arn.as_deref())
            .unwrap_or_default()
    }
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

// Gateways send `"headers": null` when a request has no headers; non-string
// values are dropped rather than failing the whole request.
fn string_headers<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let headers = match Value::deserialize(deserializer)? {
        Value::Object(map) => map
            .into_iter()
            .filter_map(|(name, value)| match value {
                Value::String(v) => Some((name, v)),
                _ => None,
            })
            .collect(),
        _ => HashMap::new(),
    };
    Ok(headers)
}

//! Caller-supplied user creation request.
//!
//! Callers are bots and admin panels that are not strict about JSON types,
//! so numeric fields accept either numbers or numeric strings. A field that
//! is present but cannot be read as a number is treated as absent.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Partial user description accepted by the create operation.
///
/// Every field is optional; [`crate::UserNormalizer`] resolves the
/// missing ones.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreateUserRequest {
    /// Explicit username. Empty strings count as absent.
    #[serde(default)]
    pub username: Option<String>,

    /// Telegram id of the subscriber, used for generated usernames.
    #[serde(default, deserialize_with = "loose_string")]
    pub telegram_id: Option<String>,

    /// Plan tag (e.g. `M12`), used for generated usernames.
    #[serde(default, deserialize_with = "loose_string")]
    pub plan: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    /// Absolute expiry in Unix seconds. Wins over `months`.
    #[serde(default, deserialize_with = "loose_int")]
    pub expire: Option<i64>,

    /// Calendar months from now.
    #[serde(default, deserialize_with = "loose_int")]
    pub months: Option<i64>,

    /// Data limit in bytes.
    #[serde(default, deserialize_with = "loose_int")]
    pub data_limit: Option<i64>,

    #[serde(default)]
    pub data_limit_reset_strategy: Option<String>,

    /// Protocol name to protocol settings.
    #[serde(default)]
    pub proxies: Option<Map<String, Value>>,

    /// Protocol name to inbound tags.
    #[serde(default)]
    pub inbounds: Option<BTreeMap<String, Vec<String>>>,

    #[serde(default)]
    pub excluded_inbounds: Option<BTreeMap<String, Vec<String>>>,

    #[serde(default)]
    pub note: Option<String>,
}

fn loose_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(int_from_value))
}

fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn int_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn parse(value: Value) -> CreateUserRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn empty_object_is_all_absent() {
        assert_eq!(parse(json!({})), CreateUserRequest::default());
    }

    #[test]
    fn numbers_and_numeric_strings() {
        let req = parse(json!({
            "telegram_id": 42,
            "expire": "1800000000",
            "months": 3,
            "data_limit": 1073741824.0,
        }));
        assert_eq!(req.telegram_id.as_deref(), Some("42"));
        assert_eq!(req.expire, Some(1_800_000_000));
        assert_eq!(req.months, Some(3));
        assert_eq!(req.data_limit, Some(1_073_741_824));
    }

    #[test]
    fn non_numeric_values_are_absent() {
        let req = parse(json!({
            "expire": "soon",
            "months": null,
            "data_limit": [1],
            "telegram_id": {"id": 1},
        }));
        assert_eq!(req.expire, None);
        assert_eq!(req.months, None);
        assert_eq!(req.data_limit, None);
        assert_eq!(req.telegram_id, None);
    }

    #[test]
    fn structured_fields() {
        let req = parse(json!({
            "proxies": {"vless": {"flow": "xtls-rprx-vision"}},
            "inbounds": {"vless": ["VLESS TCP REALITY"]},
            "note": "from bot",
        }));
        assert_eq!(
            req.proxies.unwrap()["vless"],
            json!({"flow": "xtls-rprx-vision"})
        );
        assert_eq!(req.inbounds.unwrap()["vless"], vec!["VLESS TCP REALITY"]);
        assert_eq!(req.note.as_deref(), Some("from bot"));
    }
}

//! Canonical user record sent to the panel.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// User-creation payload in the shape the panel expects.
///
/// Optional fields are omitted from the JSON when unset so the panel's
/// own defaults (unlimited expiry, unlimited data) apply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriberRecord {
    pub username: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_limit: Option<i64>,
    pub data_limit_reset_strategy: String,
    pub proxies: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inbounds: Option<BTreeMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_inbounds: Option<BTreeMap<String, Vec<String>>>,
    pub note: String,
}

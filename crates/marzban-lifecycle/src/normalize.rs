//! User-creation payload normalization.
//!
//! Resolution order:
//!
//! 1. username: explicit, else `{telegram_id|user}_{plan|M}_{0..=9999}`
//! 2. expiry: explicit `expire`, else now + `months` calendar months, else omitted
//! 3. defaults for status, reset strategy, proxies, note and inbounds
//!
//! Caller-supplied values always win over defaults. Unlimited data is
//! represented by omitting `data_limit`.

use std::collections::BTreeMap;

use marzban_core::defaults;
use rand::Rng;
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::calendar::add_months;
use crate::error::NormalizeError;
use crate::record::SubscriberRecord;
use crate::request::CreateUserRequest;

/// Deployment-specific defaults applied to new users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDefaults {
    /// Protocol enabled when the caller gives no proxies.
    pub proxy_protocol: String,
    /// Inbound tag selected for `proxy_protocol` when the caller gives no inbounds.
    pub inbound_tag: String,
}

impl Default for UserDefaults {
    fn default() -> Self {
        Self {
            proxy_protocol: defaults::DEFAULT_PROXY_PROTOCOL.to_string(),
            inbound_tag: defaults::DEFAULT_INBOUND_TAG.to_string(),
        }
    }
}

/// Builds canonical [`SubscriberRecord`]s from [`CreateUserRequest`]s.
#[derive(Debug, Clone, Default)]
pub struct UserNormalizer {
    defaults: UserDefaults,
}

impl UserNormalizer {
    pub fn new(defaults: UserDefaults) -> Self {
        Self { defaults }
    }

    /// Normalize using the system clock and a random username suffix.
    pub fn normalize(&self, request: CreateUserRequest) -> Result<SubscriberRecord, NormalizeError> {
        let suffix = rand::thread_rng().gen_range(0..=defaults::USERNAME_SUFFIX_MAX);
        self.normalize_with(request, OffsetDateTime::now_utc(), suffix)
    }

    /// Normalize with an explicit clock reading and username suffix.
    pub fn normalize_with(
        &self,
        request: CreateUserRequest,
        now: OffsetDateTime,
        suffix: u32,
    ) -> Result<SubscriberRecord, NormalizeError> {
        let expire = resolve_expire(request.expire, request.months, now)?;

        let username = match request.username.filter(|u| !u.trim().is_empty()) {
            Some(username) => username,
            None => format!(
                "{}_{}_{}",
                non_empty(request.telegram_id)
                    .unwrap_or_else(|| defaults::DEFAULT_USERNAME_PREFIX.to_string()),
                non_empty(request.plan).unwrap_or_else(|| defaults::DEFAULT_PLAN_TAG.to_string()),
                suffix
            ),
        };

        let proxies = match request.proxies.filter(|p| !p.is_empty()) {
            Some(proxies) => proxies,
            None => {
                let mut proxies = Map::new();
                proxies.insert(
                    self.defaults.proxy_protocol.clone(),
                    Value::Object(Map::new()),
                );
                proxies
            }
        };

        // The default inbound only makes sense for the default protocol; for
        // any other protocol set the panel's "all inbounds" default applies.
        let inbounds = request.inbounds.filter(|i| !i.is_empty()).or_else(|| {
            proxies.contains_key(&self.defaults.proxy_protocol).then(|| {
                BTreeMap::from([(
                    self.defaults.proxy_protocol.clone(),
                    vec![self.defaults.inbound_tag.clone()],
                )])
            })
        });

        Ok(SubscriberRecord {
            username,
            status: non_empty(request.status)
                .unwrap_or_else(|| defaults::DEFAULT_USER_STATUS.to_string()),
            expire,
            data_limit: request.data_limit,
            data_limit_reset_strategy: non_empty(request.data_limit_reset_strategy)
                .unwrap_or_else(|| defaults::DEFAULT_RESET_STRATEGY.to_string()),
            proxies,
            inbounds,
            excluded_inbounds: request.excluded_inbounds,
            note: request.note.unwrap_or_default(),
        })
    }
}

fn resolve_expire(
    expire: Option<i64>,
    months: Option<i64>,
    now: OffsetDateTime,
) -> Result<Option<i64>, NormalizeError> {
    if expire.is_some() {
        return Ok(expire);
    }
    let Some(months) = months else {
        return Ok(None);
    };
    if months <= 0 {
        return Err(NormalizeError::NonPositiveMonths(months));
    }
    let offset = u32::try_from(months).map_err(|_| NormalizeError::MonthsOutOfRange(months))?;
    add_months(now, offset)
        .map(|at| Some(at.unix_timestamp()))
        .ok_or(NormalizeError::MonthsOutOfRange(months))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

//! Default configuration values.
//!
//! Centralized default constants for use across all crates.

// ============================================================================
// Server Defaults
// ============================================================================

/// Default listen address for the gateway HTTP API.
pub const DEFAULT_LISTEN: &str = "0.0.0.0:3000";
/// Host used when only a port is supplied (e.g. via `PORT`).
pub const DEFAULT_LISTEN_HOST: &str = "0.0.0.0";

// ============================================================================
// Panel Defaults
// ============================================================================

/// Default timeout for a single upstream panel call in seconds.
pub const DEFAULT_PANEL_TIMEOUT_SECS: u64 = 30;
/// Inbound selected for new users when the caller supplies none.
pub const DEFAULT_INBOUND_TAG: &str = "VLESS TCP REALITY";

// ============================================================================
// Subscription Defaults
// ============================================================================

/// Renewal length used when `days` is absent or not a number.
pub const DEFAULT_RENEWAL_DAYS: i64 = 30;
/// Seconds in one renewal day.
pub const SECS_PER_DAY: i64 = 86_400;
/// Proxy protocol enabled for new users by default.
pub const DEFAULT_PROXY_PROTOCOL: &str = "vless";
/// Status assigned to new users.
pub const DEFAULT_USER_STATUS: &str = "active";
/// Data limit reset strategy assigned to new users.
pub const DEFAULT_RESET_STRATEGY: &str = "no_reset";
/// First part of a generated username when no telegram id is given.
pub const DEFAULT_USERNAME_PREFIX: &str = "user";
/// Plan tag used in generated usernames when no plan is given.
pub const DEFAULT_PLAN_TAG: &str = "M";
/// Upper bound (inclusive) of the random suffix in generated usernames.
pub const USERNAME_SUFFIX_MAX: u32 = 9999;
/// Upper bound of `panel.token_cache_secs` (the panel's default token lifetime).
pub const MAX_TOKEN_CACHE_SECS: u64 = 86_400;

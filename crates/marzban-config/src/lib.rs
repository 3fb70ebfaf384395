//! Configuration loading and CLI definitions.

mod defaults;
mod loader;
mod validate;

use std::collections::BTreeMap;
use std::fmt;

use clap::{Parser, ValueEnum};
use marzban_core::defaults::DEFAULT_LISTEN_HOST;
use serde::{Deserialize, Serialize};

use crate::defaults::*;
pub use loader::{ConfigError, load_config, load_or_default};
pub use validate::validate_config;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub panel: PanelConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP API listens on.
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

/// Upstream panel connection.
#[derive(Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Panel base URL, e.g. `https://panel.example.com:8000`.
    #[serde(default)]
    pub url: String,
    /// Admin account username.
    #[serde(default)]
    pub username: String,
    /// Admin account password.
    #[serde(default)]
    pub password: String,
    /// Certificate verification mode for the panel connection.
    #[serde(default)]
    pub tls: TlsMode,
    /// Timeout for a single panel call.
    #[serde(default = "default_panel_timeout_secs")]
    pub timeout_secs: u64,
    /// Inbound tag selected for new users that specify none.
    #[serde(default = "default_inbound")]
    pub default_inbound: String,
    /// Reuse admin tokens for this many seconds (None = authenticate per operation).
    #[serde(default)]
    pub token_cache_secs: Option<u64>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: String::new(),
            password: String::new(),
            tls: TlsMode::default(),
            timeout_secs: default_panel_timeout_secs(),
            default_inbound: default_inbound(),
            token_cache_secs: None,
        }
    }
}

impl fmt::Debug for PanelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("tls", &self.tls)
            .field("timeout_secs", &self.timeout_secs)
            .field("default_inbound", &self.default_inbound)
            .field("token_cache_secs", &self.token_cache_secs)
            .finish()
    }
}

/// Certificate verification for the panel connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Verify the panel certificate against the system roots.
    #[default]
    Verify,
    /// Accept any certificate (self-signed panels).
    Insecure,
}

impl TlsMode {
    #[inline]
    pub fn trust_all(self) -> bool {
        matches!(self, Self::Insecure)
    }
}

/// Presentation of `GET /users`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ListView {
    /// Panel response as-is.
    #[default]
    Raw,
    /// Username, status and human-readable expiry per user.
    Summary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub list_view: ListView,
    /// Renewal length when `days` is absent or not a number.
    #[serde(default = "default_renewal_days")]
    pub default_days: i64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            list_view: ListView::default(),
            default_days: default_renewal_days(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Base log level (trace, debug, info, warn, error).
    pub level: Option<String>,
    /// Output format: pretty (default), compact, json.
    #[serde(default)]
    pub format: Option<String>,
    /// Output target: stderr (default), stdout.
    #[serde(default)]
    pub output: Option<String>,
    /// Per-module level overrides, e.g. `marzban_panel = "debug"`.
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Parser, Default)]
pub struct CliOverrides {
    /// Override listen address, e.g. 0.0.0.0:3000
    #[arg(long)]
    pub listen: Option<String>,
    /// Override listen port, keeping the configured host
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,
    /// Override panel base URL
    #[arg(long, env = "MARZBAN_URL")]
    pub panel_url: Option<String>,
    /// Override panel admin username
    #[arg(long, env = "MARZBAN_USERNAME")]
    pub panel_username: Option<String>,
    /// Override panel admin password
    #[arg(long, env = "MARZBAN_PASSWORD", hide_env_values = true)]
    pub panel_password: Option<String>,
    /// Override panel certificate verification (verify, insecure)
    #[arg(long, env = "MARZBAN_TLS", value_enum)]
    pub panel_tls: Option<TlsMode>,
    /// Override panel call timeout (seconds)
    #[arg(long)]
    pub panel_timeout_secs: Option<u64>,
    /// Override default inbound tag for new users
    #[arg(long)]
    pub default_inbound: Option<String>,
    /// Reuse admin tokens for N seconds (0 = authenticate per operation)
    #[arg(long)]
    pub token_cache_secs: Option<u64>,
    /// Override user list presentation (raw, summary)
    #[arg(long, value_enum)]
    pub list_view: Option<ListView>,
    /// Override default renewal length in days
    #[arg(long)]
    pub default_days: Option<i64>,
    /// Override log level (trace/debug/info/warn/error)
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,
    /// Override log format (pretty/compact/json)
    #[arg(long)]
    pub log_format: Option<String>,
}

pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) {
    if let Some(v) = &overrides.listen {
        config.server.listen = v.clone();
    }
    if let Some(port) = overrides.port {
        config.server.listen = with_port(&config.server.listen, port);
    }
    if let Some(v) = &overrides.panel_url {
        config.panel.url = v.clone();
    }
    if let Some(v) = &overrides.panel_username {
        config.panel.username = v.clone();
    }
    if let Some(v) = &overrides.panel_password {
        config.panel.password = v.clone();
    }
    if let Some(v) = overrides.panel_tls {
        config.panel.tls = v;
    }
    if let Some(v) = overrides.panel_timeout_secs {
        config.panel.timeout_secs = v;
    }
    if let Some(v) = &overrides.default_inbound {
        config.panel.default_inbound = v.clone();
    }
    // Token cache: 0 disables, > 0 enables with that TTL
    if let Some(v) = overrides.token_cache_secs {
        config.panel.token_cache_secs = if v == 0 { None } else { Some(v) };
    }
    if let Some(v) = overrides.list_view {
        config.api.list_view = v;
    }
    if let Some(v) = overrides.default_days {
        config.api.default_days = v;
    }
    if let Some(v) = &overrides.log_level {
        config.logging.level = Some(v.clone());
    }
    if let Some(v) = &overrides.log_format {
        config.logging.format = Some(v.clone());
    }
}

/// Replace the port of a `host:port` listen address.
fn with_port(listen: &str, port: u16) -> String {
    match listen.rsplit_once(':') {
        Some((host, _)) if !host.is_empty() => format!("{host}:{port}"),
        _ => format!("{DEFAULT_LISTEN_HOST}:{port}"),
    }
}

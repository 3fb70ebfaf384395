//! Configuration validation logic.

use std::net::SocketAddr;

use marzban_core::MAX_TOKEN_CACHE_SECS;

use crate::Config;
use crate::loader::ConfigError;

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.listen.parse::<SocketAddr>().is_err() {
        return Err(ConfigError::Validation(format!(
            "server.listen is not a socket address: {:?}",
            config.server.listen
        )));
    }
    let url = config.panel.url.trim();
    if url.is_empty() {
        return Err(ConfigError::Validation(
            "panel.url is empty (set it in the config file or MARZBAN_URL)".into(),
        ));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::Validation(
            "panel.url must start with http:// or https://".into(),
        ));
    }
    if config.panel.username.trim().is_empty() {
        return Err(ConfigError::Validation(
            "panel.username is empty (set it in the config file or MARZBAN_USERNAME)".into(),
        ));
    }
    if config.panel.password.is_empty() {
        return Err(ConfigError::Validation(
            "panel.password is empty (set it in the config file or MARZBAN_PASSWORD)".into(),
        ));
    }
    if config.panel.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "panel.timeout_secs must be > 0".into(),
        ));
    }
    if config.panel.default_inbound.trim().is_empty() {
        return Err(ConfigError::Validation(
            "panel.default_inbound is empty".into(),
        ));
    }
    if config.panel.token_cache_secs == Some(0) {
        return Err(ConfigError::Validation(
            "panel.token_cache_secs must be > 0 (omit it to disable caching)".into(),
        ));
    }
    if let Some(ttl) = config.panel.token_cache_secs
        && ttl > MAX_TOKEN_CACHE_SECS
    {
        return Err(ConfigError::Validation(format!(
            "panel.token_cache_secs must be <= {MAX_TOKEN_CACHE_SECS}, got {ttl}"
        )));
    }
    if config.api.default_days <= 0 {
        return Err(ConfigError::Validation(
            "api.default_days must be > 0".into(),
        ));
    }
    if let Some(format) = config.logging.format.as_deref()
        && !["pretty", "compact", "json"].contains(&format)
    {
        return Err(ConfigError::Validation(
            "logging.format must be one of: pretty, compact, json".into(),
        ));
    }
    if let Some(output) = config.logging.output.as_deref()
        && !["stdout", "stderr"].contains(&output)
    {
        return Err(ConfigError::Validation(
            "logging.output must be one of: stdout, stderr".into(),
        ));
    }
    Ok(())
}

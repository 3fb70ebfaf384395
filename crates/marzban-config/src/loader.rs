//! Configuration file loading and error types.

use std::{fs, path::Path};

use marzban_core::ERROR_CONFIG;

use crate::Config;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unsupported config format")]
    UnsupportedFormat,
    #[error("validation: {0}")]
    Validation(String),
}

impl ConfigError {
    /// Error kind label for logs.
    pub fn kind(&self) -> &'static str {
        ERROR_CONFIG
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)?;
    match path.extension().and_then(|s| s.to_str()).unwrap_or("") {
        "json" => Ok(serde_json::from_str(&data)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(&data)?),
        "toml" => Ok(toml::from_str(&data)?),
        _ => Err(ConfigError::UnsupportedFormat),
    }
}

/// Load `path` when given, otherwise start from defaults so the gateway
/// can be configured entirely from flags and environment variables.
pub fn load_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::TlsMode;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_toml() {
        let file = write_temp(
            ".toml",
            r#"
[panel]
url = "https://panel.example.com:8000"
username = "admin"
password = "secret"
tls = "insecure"
"#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.panel.url, "https://panel.example.com:8000");
        assert_eq!(config.panel.tls, TlsMode::Insecure);
        assert_eq!(config.server.listen, "0.0.0.0:3000");
    }

    #[test]
    fn loads_json() {
        let file = write_temp(
            ".json",
            r#"{"server": {"listen": "127.0.0.1:8080"}, "panel": {"url": "http://panel"}}"#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.server.listen, "127.0.0.1:8080");
        assert_eq!(config.panel.url, "http://panel");
    }

    #[test]
    fn loads_yaml() {
        let file = write_temp(
            ".yml",
            "panel:\n  url: http://panel\n  token_cache_secs: 300\napi:\n  list_view: summary\n",
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.panel.token_cache_secs, Some(300));
        assert_eq!(config.api.list_view, crate::ListView::Summary);
    }

    #[test]
    fn unsupported_extension() {
        let file = write_temp(".ini", "listen=1");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat));
        assert_eq!(err.kind(), ERROR_CONFIG);
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            load_config("/nonexistent/marzban.toml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn no_path_yields_defaults() {
        let config = load_or_default(None).unwrap();
        assert!(config.panel.url.is_empty());
        assert_eq!(config.api.default_days, 30);
    }
}

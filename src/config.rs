use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::report::{ApiKey, DEFAULT_OPENAI_BASE_URL};

/// Application-level constants
pub const APP_NAME: &str = "Mediscript";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Model identifier sent with every completion request.
pub const DEFAULT_MODEL: &str = "gpt-4.1";

/// Decoding temperature. Fixed; not configurable at runtime.
pub const TEMPERATURE: f32 = 0.3;

/// Upper bound for one completion call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Sessions untouched for this long are evicted (30 minutes).
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 1800;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";

/// Shown alongside every generated report.
pub const DISCLAIMER: &str = "Dieses Tool dient der Unterstützung beim Verfassen medizinischer Texte. \
Die inhaltliche Verantwortung verbleibt bei der behandelnden Ärztin / beim behandelnden Arzt.";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "mediscript=info,mediscript_lib=info,tower_http=warn"
}

/// Get the application data directory
/// ~/Mediscript/ on all platforms. `None` when no home directory is known.
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_NAME))
}

/// Default location of the instruction template file.
pub fn default_templates_path() -> Option<PathBuf> {
    app_data_dir().map(|dir| dir.join("templates.json"))
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime configuration resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub api_key: ApiKey,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub session_idle_timeout: Duration,
    /// Template file; `None` means templates come from the environment only.
    pub templates_path: Option<PathBuf>,
}

impl AppConfig {
    /// Read configuration from the process environment (after `.env`).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get("OPENAI_API_KEY")
            .map(ApiKey::new)
            .ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;

        let bind_addr = parse_or(get("MEDISCRIPT_ADDR"), "MEDISCRIPT_ADDR", DEFAULT_BIND_ADDR)?;
        let timeout_secs: u64 = parse_or(
            get("MEDISCRIPT_TIMEOUT_SECS"),
            "MEDISCRIPT_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "MEDISCRIPT_TIMEOUT_SECS",
                value: "0".into(),
            });
        }
        let idle_secs: u64 = parse_or(
            get("MEDISCRIPT_SESSION_IDLE_SECS"),
            "MEDISCRIPT_SESSION_IDLE_SECS",
            &DEFAULT_SESSION_IDLE_SECS.to_string(),
        )?;

        let templates_path = match get("MEDISCRIPT_TEMPLATES") {
            Some(path) => Some(PathBuf::from(path)),
            None => default_templates_path().filter(|p| p.is_file()),
        };

        Ok(Self {
            bind_addr,
            api_key,
            base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.into()),
            model: get("MEDISCRIPT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            timeout: Duration::from_secs(timeout_secs),
            session_idle_timeout: Duration::from_secs(idle_secs),
            templates_path,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError> {
    let raw = value.unwrap_or_else(|| default.to_string());
    raw.parse()
        .map_err(|_| ConfigError::Invalid { key, value: raw })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn app_name_is_mediscript() {
        assert_eq!(APP_NAME, "Mediscript");
    }

    #[test]
    fn app_data_dir_ends_with_app_name() {
        if let Some(dir) = app_data_dir() {
            assert!(dir.ends_with("Mediscript"));
        }
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let cfg = AppConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
        assert_eq!(cfg.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(cfg.base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.timeout, Duration::from_secs(60));
        assert_eq!(cfg.session_idle_timeout, Duration::from_secs(1800));
        assert_eq!(cfg.api_key.expose(), "sk-test");
    }

    #[test]
    fn missing_api_key_is_error() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("OPENAI_API_KEY")));
    }

    #[test]
    fn blank_api_key_is_missing() {
        let err = AppConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn overrides_are_read() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("MEDISCRIPT_ADDR", "0.0.0.0:9000"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1"),
            ("MEDISCRIPT_MODEL", "gpt-4o"),
            ("MEDISCRIPT_TIMEOUT_SECS", "30"),
            ("MEDISCRIPT_TEMPLATES", "/etc/mediscript/templates.json"),
        ]))
        .unwrap();
        assert_eq!(cfg.bind_addr.port(), 9000);
        assert_eq!(cfg.base_url, "http://localhost:8080/v1");
        assert_eq!(cfg.model, "gpt-4o");
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(
            cfg.templates_path,
            Some(PathBuf::from("/etc/mediscript/templates.json"))
        );
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        for value in ["abc", "0"] {
            let err = AppConfig::from_lookup(lookup(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("MEDISCRIPT_TIMEOUT_SECS", value),
            ]))
            .unwrap_err();
            assert!(matches!(
                err,
                ConfigError::Invalid { key: "MEDISCRIPT_TIMEOUT_SECS", .. }
            ));
        }
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("MEDISCRIPT_ADDR", "not-an-addr"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "MEDISCRIPT_ADDR", .. }));
    }
}

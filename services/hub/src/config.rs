//! Application settings
//!
//! Built-in defaults overridden by `HUB_*` environment variables, e.g.
//! `HUB_BIND_ADDRESS=127.0.0.1:9000` or `HUB_MAX_UPLOAD_BYTES=1048576`.
//! Database and Redis settings are read by the `common` crate.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::path::PathBuf;

/// Resume Hub settings
#[derive(Debug, Clone, Deserialize)]
pub struct HubConfig {
    /// Address the HTTP server listens on
    pub bind_address: String,
    /// Directory holding uploaded pictures and résumés
    pub media_root: PathBuf,
    /// Directory holding the stylesheet and scripts
    pub static_root: PathBuf,
    /// Lifetime of a login session in Redis
    pub session_ttl_seconds: u64,
    /// Largest accepted upload, per file
    pub max_upload_bytes: usize,
    /// Password given to the seeded default accounts
    pub seed_password: String,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
}

impl HubConfig {
    /// Load settings from defaults and `HUB_*` environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::with_prefix("HUB").try_parsing(true))
    }

    fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        let config: HubConfig = Config::builder()
            .set_default("bind_address", "0.0.0.0:8000")?
            .set_default("media_root", "media")?
            .set_default("static_root", "services/hub/static")?
            .set_default("session_ttl_seconds", 1_209_600_i64)?
            .set_default("max_upload_bytes", 5 * 1024 * 1024_i64)?
            .set_default("seed_password", "changeit")?
            .set_default("log_level", "info")?
            .set_default("secure_cookies", false)?
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        if config.session_ttl_seconds == 0 {
            return Err(ConfigError::Message(
                "session_ttl_seconds must be positive".to_string(),
            ));
        }
        if config.max_upload_bytes == 0 {
            return Err(ConfigError::Message(
                "max_upload_bytes must be positive".to_string(),
            ));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load_with(vars: &[(&str, &str)]) -> Result<HubConfig, ConfigError> {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        HubConfig::from_environment(
            Environment::with_prefix("HUB")
                .try_parsing(true)
                .source(Some(source)),
        )
    }

    #[test]
    fn test_defaults() {
        let config = load_with(&[]).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8000");
        assert_eq!(config.media_root, PathBuf::from("media"));
        assert_eq!(config.session_ttl_seconds, 1_209_600);
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(config.seed_password, "changeit");
        assert!(!config.secure_cookies);
    }

    #[test]
    fn test_environment_overrides() {
        let config = load_with(&[
            ("HUB_BIND_ADDRESS", "127.0.0.1:9000"),
            ("HUB_MAX_UPLOAD_BYTES", "1024"),
            ("HUB_SECURE_COOKIES", "true"),
        ])
        .unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.max_upload_bytes, 1024);
        assert!(config.secure_cookies);
    }

    #[test]
    fn test_zero_session_ttl_is_rejected() {
        let result = load_with(&[("HUB_SESSION_TTL_SECONDS", "0")]);
        assert!(result.is_err());
    }
}

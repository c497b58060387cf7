//! Configuration management for RAX Docs Server
//!
//! Settings are layered: built-in defaults, then an optional `config.toml`,
//! then `RAX_DOCS_*` environment variables. Everything here is read once at
//! startup; changing a value requires a restart.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// Locations searched for `config.toml`, in order.
const CONFIG_PATHS: [&str; 2] = [
    "rax-docs-server/config", // Docker production: /app/rax-docs-server/config.toml
    "config",                 // Local development: ./config.toml
];

/// Upper bound on session lifetime
const MAX_SESSION_TTL_DAYS: u64 = 3650;

/// Complete server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    // ═══ NETWORK ═══
    /// IP address the HTTP listener binds to
    pub bind_address: String,

    /// HTTP port
    pub port: u16,

    // ═══ STORAGE ═══
    /// Directory beneath which all managed documents live
    pub storage_root: String,

    /// Maximum files accepted by a single upload request
    pub max_upload_files: usize,

    /// Per-file upload cap in MB
    pub max_upload_size_mb: u64,

    // ═══ SESSIONS ═══
    /// Lifetime of an issued session cookie
    pub session_ttl_days: u64,

    /// Mark the session cookie `Secure` (enable behind TLS)
    pub secure_cookies: bool,

    /// Failed logins tolerated per client address within the window
    pub login_max_attempts: usize,
    pub login_window_secs: u64,

    /// Credential store: username -> password
    #[serde(default)]
    pub users: HashMap<String, String>,
}

impl ServerConfig {
    /// Load configuration from defaults, config.toml and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Self::defaults()?;
        for config_path in CONFIG_PATHS {
            builder = builder.add_source(File::with_name(config_path).required(false));
        }

        let settings = builder
            .add_source(Environment::with_prefix("RAX_DOCS").try_parsing(true))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text layered over the defaults
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let settings = Self::defaults()?
            .add_source(File::from_str(source, config::FileFormat::Toml))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("bind_address", "127.0.0.1")?
            .set_default("port", 3000)?
            .set_default("storage_root", "./files")?
            .set_default("max_upload_files", 5)?
            .set_default("max_upload_size_mb", 10)?
            .set_default("session_ttl_days", 5)?
            .set_default("secure_cookies", false)?
            .set_default("login_max_attempts", 5)?
            .set_default("login_window_secs", 300)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Message("port cannot be 0".into()));
        }

        if self.storage_root.trim().is_empty() {
            return Err(ConfigError::Message("storage_root cannot be empty".into()));
        }

        if self.max_upload_files == 0 {
            return Err(ConfigError::Message(
                "max_upload_files must be greater than 0".into(),
            ));
        }

        if self.max_upload_size_mb == 0 {
            return Err(ConfigError::Message(
                "max_upload_size_mb must be greater than 0".into(),
            ));
        }

        if self.session_ttl_days == 0 || self.session_ttl_days > MAX_SESSION_TTL_DAYS {
            return Err(ConfigError::Message(format!(
                "session_ttl_days must be between 1 and {}",
                MAX_SESSION_TTL_DAYS
            )));
        }

        if self.login_max_attempts == 0 {
            return Err(ConfigError::Message(
                "login_max_attempts must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and port as a socket address string
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Get storage root as PathBuf
    pub fn storage_root_path(&self) -> PathBuf {
        PathBuf::from(&self.storage_root)
    }

    /// Get maximum upload size per file in bytes
    pub fn max_upload_size_bytes(&self) -> u64 {
        self.max_upload_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_days.saturating_mul(24 * 60 * 60))
    }

    pub fn login_window(&self) -> Duration {
        Duration::from_secs(self.login_window_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_keys_are_missing() {
        let config = ServerConfig::from_toml("").unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.storage_root, "./files");
        assert_eq!(config.max_upload_files, 5);
        assert_eq!(config.max_upload_size_bytes(), 10 * 1024 * 1024);
        assert_eq!(config.session_ttl(), Duration::from_secs(5 * 24 * 60 * 60));
        assert!(config.users.is_empty());
    }

    #[test]
    fn huge_upload_size_saturates() {
        let config =
            ServerConfig::from_toml(&format!("max_upload_size_mb = {}\n", i64::MAX)).unwrap();
        assert_eq!(config.max_upload_size_bytes(), u64::MAX);
    }

    #[test]
    fn session_ttl_is_bounded() {
        assert!(ServerConfig::from_toml("session_ttl_days = 3650\n").is_ok());
        assert!(ServerConfig::from_toml("session_ttl_days = 3651\n").is_err());
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = ServerConfig::from_toml(
            r#"
            port = 8080
            storage_root = "/srv/docs"

            [users]
            alice = "alice123"
            "#,
        )
        .unwrap();

        assert_eq!(config.listen_addr(), "127.0.0.1:8080");
        assert_eq!(config.storage_root_path(), PathBuf::from("/srv/docs"));
        assert_eq!(config.users.get("alice").map(String::as_str), Some("alice123"));
    }

    #[test]
    fn zero_port_is_rejected() {
        assert!(ServerConfig::from_toml("port = 0").is_err());
    }

    #[test]
    fn empty_storage_root_is_rejected() {
        assert!(ServerConfig::from_toml("storage_root = \"\"").is_err());
    }
}

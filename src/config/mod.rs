//! Configuration management
//!
//! This module handles loading and parsing configuration for the Ontour backend.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Upload configuration
    #[serde(default)]
    pub upload: UploadConfig,
    /// Admin page shells
    #[serde(default)]
    pub admin: AdminConfig,
    /// Admin credentials
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin (for cookie-based auth)
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Database configuration (SQLite)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database file path or `:memory:`
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/ontour.db".to_string()
}

/// Cache configuration for the public read path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache TTL in seconds
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,
    /// Maximum number of cached entries
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl(),
            max_capacity: default_max_capacity(),
        }
    }
}

fn default_ttl() -> u64 {
    300
}

fn default_max_capacity() -> u64 {
    1_000
}

/// Upload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Upload directory path
    #[serde(default = "default_upload_path")]
    pub path: PathBuf,
    /// Maximum file size in bytes (default: 10MB)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Allowed MIME types
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            path: default_upload_path(),
            max_file_size: default_max_file_size(),
            allowed_types: default_allowed_types(),
        }
    }
}

fn default_upload_path() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024 // 10MB
}

fn default_allowed_types() -> Vec<String> {
    vec![
        "image/jpeg".to_string(),
        "image/png".to_string(),
        "image/gif".to_string(),
        "image/webp".to_string(),
        "image/svg+xml".to_string(),
        "video/mp4".to_string(),
        "application/pdf".to_string(),
    ]
}

impl UploadConfig {
    /// Check if a MIME type is allowed
    pub fn is_type_allowed(&self, mime_type: &str) -> bool {
        self.allowed_types.iter().any(|t| t == mime_type)
    }
}

/// Admin page shell configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Directory holding `<page>.html` files served under `/admin`
    #[serde(default = "default_admin_pages_path")]
    pub pages_path: PathBuf,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            pages_path: default_admin_pages_path(),
        }
    }
}

fn default_admin_pages_path() -> PathBuf {
    PathBuf::from("admin")
}

/// Admin login credentials
///
/// Login is disabled while either field is empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub admin_email: String,
    /// Argon2 PHC string, see the `hash-password` binary
    #[serde(default)]
    pub admin_password_hash: String,
}

impl AuthConfig {
    pub fn is_configured(&self) -> bool {
        !self.admin_email.is_empty() && !self.admin_password_hash.is_empty()
    }
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError {
        path: String,
        message: String,
    },
}

impl Config {
    /// Read `path`; a missing or blank file yields the defaults.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::FileRead {
                    path: path.display().to_string(),
                    source,
                }
                .into())
            }
        };

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                path: path.display().to_string(),
                message: describe_yaml_error(&e),
            }
            .into()
        })
    }

    /// [`Config::load`], then `ONTOUR_<SECTION>_<FIELD>` environment
    /// overrides (e.g. `ONTOUR_SERVER_PORT`, `ONTOUR_AUTH_ADMIN_EMAIL`).
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        override_with(&mut self.server.host, "ONTOUR_SERVER_HOST");
        override_parsed(&mut self.server.port, "ONTOUR_SERVER_PORT");
        override_with(&mut self.server.cors_origin, "ONTOUR_SERVER_CORS_ORIGIN");
        override_with(&mut self.database.url, "ONTOUR_DATABASE_URL");
        override_parsed(&mut self.cache.ttl_seconds, "ONTOUR_CACHE_TTL_SECONDS");
        override_parsed(&mut self.upload.path, "ONTOUR_UPLOAD_PATH");
        override_parsed(&mut self.admin.pages_path, "ONTOUR_ADMIN_PAGES_PATH");
        override_with(&mut self.auth.admin_email, "ONTOUR_AUTH_ADMIN_EMAIL");
        override_with(&mut self.auth.admin_password_hash, "ONTOUR_AUTH_ADMIN_PASSWORD_HASH");
    }
}

fn override_with(field: &mut String, key: &str) {
    if let Ok(value) = std::env::var(key) {
        *field = value;
    }
}

/// Values that fail to parse leave the field untouched.
fn override_parsed<T: std::str::FromStr>(field: &mut T, key: &str) {
    if let Some(value) = std::env::var(key).ok().and_then(|v| v.trim().parse().ok()) {
        *field = value;
    }
}

fn describe_yaml_error(e: &serde_yaml::Error) -> String {
    match e.location() {
        Some(at) => format!("line {}, column {}: {}", at.line(), at.column(), e),
        None => e.to_string(),
    }
}

// Environment variables are process-wide; every test touching them holds this.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn valid_server_config_strategy() -> impl Strategy<Value = ServerConfig> {
        (
            prop_oneof![
                Just("0.0.0.0".to_string()),
                Just("127.0.0.1".to_string()),
                Just("localhost".to_string()),
            ],
            1024u16..=65535,
        )
            .prop_map(|(host, port)| ServerConfig {
                host,
                port,
                cors_origin: default_cors_origin(),
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        /// Serializing a config to YAML and loading it back preserves it.
        #[test]
        fn config_yaml_roundtrip(
            server in valid_server_config_strategy(),
            ttl in 1u64..86_400,
            max_file_size in 1u64..100_000_000,
        ) {
            let config = Config {
                server,
                cache: CacheConfig { ttl_seconds: ttl, ..CacheConfig::default() },
                upload: UploadConfig { max_file_size, ..UploadConfig::default() },
                ..Config::default()
            };

            let yaml = serde_yaml::to_string(&config).expect("Failed to serialize config");
            let mut file = NamedTempFile::new().expect("Failed to create temp file");
            write!(file, "{}", yaml).expect("Failed to write config");

            let parsed = Config::load(file.path()).expect("Failed to parse config");

            prop_assert_eq!(config.server.host, parsed.server.host);
            prop_assert_eq!(config.server.port, parsed.server.port);
            prop_assert_eq!(config.cache.ttl_seconds, parsed.cache.ttl_seconds);
            prop_assert_eq!(config.upload.max_file_size, parsed.upload.max_file_size);
            prop_assert_eq!(config.upload.allowed_types, parsed.upload.allowed_types);
        }
    }
}

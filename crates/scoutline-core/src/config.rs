//! Configuration management for Scoutline

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable consulted first for the backend origin
pub const API_BASE_URL_ENV: &str = "SCOUTLINE_API_BASE_URL";

/// Environment variable consulted when [`API_BASE_URL_ENV`] is unset
pub const BASE_URL_ENV: &str = "SCOUTLINE_BASE_URL";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Media storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Security configuration
    #[serde(default)]
    pub security: SecurityConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Client-side (web server and API client) configuration
    #[serde(default)]
    pub client: ClientConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Which store backs the controllers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    /// Process-local store, lost on restart
    #[default]
    Memory,
    /// PostgreSQL through a connection pool
    Postgres,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Store backend
    #[serde(default)]
    pub backend: DatabaseBackend,

    /// Database URL (postgres backend only)
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Maximum number of connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// Idle timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout: u64,
}

/// Media storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory uploaded media is written to
    #[serde(default = "default_media_dir")]
    pub media_dir: PathBuf,

    /// Maximum file size in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// Accepted media content types
    #[serde(default = "default_allowed_content_types")]
    pub allowed_content_types: Vec<String>,

    /// Organize files by upload date
    #[serde(default = "default_organize_by_date")]
    pub organize_by_date: bool,
}

/// API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Enable CORS
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,

    /// CORS allowed origins
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Page size used when a listing request does not specify one
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Upper bound for requested page sizes
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Hex md5 digests of the bearer tokens accepted on mutating routes
    #[serde(default)]
    pub admin_token_hashes: Vec<String>,

    /// Maximum request body size for uploads
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: u64,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json or text)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Client-side configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend origin; normalized by the API client
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Host the web server binds to
    #[serde(default = "default_host")]
    pub web_host: String,

    /// Port the web server listens on
    #[serde(default = "default_web_port")]
    pub web_port: u16,

    /// Outgoing request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

const fn default_web_port() -> u16 {
    3000
}

fn default_database_url() -> String {
    "postgresql://localhost/scoutline".to_string()
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    2
}

const fn default_connect_timeout() -> u64 {
    30
}

const fn default_idle_timeout() -> u64 {
    600
}

fn default_media_dir() -> PathBuf {
    PathBuf::from("./data/media")
}

const fn default_max_file_size() -> u64 {
    50_000_000 // 50MB
}

fn default_allowed_content_types() -> Vec<String> {
    ["image/jpeg", "image/png", "image/webp", "video/mp4"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

const fn default_organize_by_date() -> bool {
    true
}

const fn default_enable_cors() -> bool {
    true
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

const fn default_page_size() -> u32 {
    20
}

const fn default_max_page_size() -> u32 {
    100
}

const fn default_max_upload_size() -> u64 {
    60_000_000
}

const fn default_request_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_api_base_url() -> String {
    "http://localhost:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::default(),
            url: default_database_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout: default_connect_timeout(),
            idle_timeout: default_idle_timeout(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            media_dir: default_media_dir(),
            max_file_size: default_max_file_size(),
            allowed_content_types: default_allowed_content_types(),
            organize_by_date: default_organize_by_date(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enable_cors: default_enable_cors(),
            cors_origins: default_cors_origins(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            admin_token_hashes: Vec::new(),
            max_upload_size: default_max_upload_size(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            web_host: default_host(),
            web_port: default_web_port(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl StorageConfig {
    /// Whether a content type may be stored as profile media
    #[must_use]
    pub fn accepts(&self, content_type: &str) -> bool {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();
        self.allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(essence))
    }
}

/// Pick the backend origin from the environment
///
/// [`API_BASE_URL_ENV`] wins over [`BASE_URL_ENV`]; blank values are skipped.
pub fn resolve_api_base_url<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    [API_BASE_URL_ENV, BASE_URL_ENV]
        .into_iter()
        .filter_map(lookup)
        .find(|value| !value.trim().is_empty())
}

impl Config {
    /// Load configuration from `config.toml` and `SCOUTLINE_*` environment variables
    ///
    /// Nested keys use a double underscore, e.g. `SCOUTLINE_SERVER__PORT=9000`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed.
    pub fn load() -> crate::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("SCOUTLINE")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("security.admin_token_hashes")
                    .with_list_parse_key("api.cors_origins")
                    .with_list_parse_key("storage.allowed_content_types")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })?;

        let mut loaded: Self =
            config
                .try_deserialize()
                .map_err(|e| crate::Error::Configuration {
                    message: e.to_string(),
                })?;

        if let Some(url) = resolve_api_base_url(|key| std::env::var(key).ok()) {
            loaded.client.api_base_url = url;
        }

        loaded.validate()?;
        Ok(loaded)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first inconsistent setting.
    pub fn validate(&self) -> crate::Result<()> {
        if self.api.default_page_size == 0 || self.api.max_page_size == 0 {
            return Err(crate::Error::Configuration {
                message: "page sizes must be positive".to_string(),
            });
        }
        if self.api.default_page_size > self.api.max_page_size {
            return Err(crate::Error::Configuration {
                message: format!(
                    "default_page_size {} exceeds max_page_size {}",
                    self.api.default_page_size, self.api.max_page_size
                ),
            });
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(crate::Error::Configuration {
                message: "database.min_connections exceeds max_connections".to_string(),
            });
        }
        if let Some(bad) = self
            .security
            .admin_token_hashes
            .iter()
            .find(|hash| hash.len() != 32 || !hash.chars().all(|c| c.is_ascii_hexdigit()))
        {
            return Err(crate::Error::Configuration {
                message: format!("admin token hash '{bad}' is not a 32-character hex md5 digest"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::field_reassign_with_default)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);

        assert_eq!(config.database.backend, DatabaseBackend::Memory);
        assert!(config.database.url.contains("postgresql"));
        assert!(config.database.max_connections >= config.database.min_connections);

        assert_eq!(config.api.default_page_size, 20);
        assert_eq!(config.api.max_page_size, 100);
        assert_eq!(config.api.cors_origins, vec!["*"]);

        assert!(config.security.admin_token_hashes.is_empty());
        assert_eq!(config.security.request_timeout, 30);

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "json");

        assert_eq!(config.client.api_base_url, "http://localhost:8080");
        assert_eq!(config.client.web_port, 3000);

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_storage_accepts_content_type() {
        let storage = StorageConfig::default();

        assert!(storage.accepts("image/jpeg"));
        assert!(storage.accepts("IMAGE/PNG"));
        assert!(storage.accepts("video/mp4; codecs=avc1"));
        assert!(!storage.accepts("application/pdf"));
        assert!(!storage.accepts(""));
    }

    #[test]
    fn test_resolve_api_base_url_precedence() {
        let env: HashMap<&str, &str> = HashMap::from([
            (API_BASE_URL_ENV, "http://api.example"),
            (BASE_URL_ENV, "http://site.example"),
        ]);
        let resolved = resolve_api_base_url(|key| env.get(key).map(ToString::to_string));
        assert_eq!(resolved.as_deref(), Some("http://api.example"));

        let only_base: HashMap<&str, &str> = HashMap::from([(BASE_URL_ENV, "http://site.example")]);
        let resolved = resolve_api_base_url(|key| only_base.get(key).map(ToString::to_string));
        assert_eq!(resolved.as_deref(), Some("http://site.example"));

        let blank: HashMap<&str, &str> =
            HashMap::from([(API_BASE_URL_ENV, "  "), (BASE_URL_ENV, "http://site.example")]);
        let resolved = resolve_api_base_url(|key| blank.get(key).map(ToString::to_string));
        assert_eq!(resolved.as_deref(), Some("http://site.example"));

        assert!(resolve_api_base_url(|_| None).is_none());
    }

    #[test]
    fn test_validate_rejects_bad_page_sizes() {
        let mut config = Config::default();
        config.api.default_page_size = 500;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.max_page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_malformed_token_hash() {
        let mut config = Config::default();
        config.security.admin_token_hashes = vec!["not-a-digest".to_string()];
        let err = config.validate().expect_err("malformed hash");
        assert!(err.to_string().contains("not-a-digest"));

        // md5("secret")
        config.security.admin_token_hashes = vec!["5ebe2294ecd0e0f08eab7690d2a6ee69".to_string()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_deserializes_with_partial_sections() {
        let json = serde_json::json!({
            "server": { "port": 9000 },
            "database": { "backend": "postgres" },
            "security": { "admin_token_hashes": ["5ebe2294ecd0e0f08eab7690d2a6ee69"] }
        });

        let config: Config = serde_json::from_value(json).expect("deserialize");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.backend, DatabaseBackend::Postgres);
        assert_eq!(config.security.admin_token_hashes.len(), 1);
        assert_eq!(config.api.max_page_size, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = Config::default();
        let json = serde_json::to_string(&config).expect("serialize");
        let back: Config = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(back.server.port, config.server.port);
        assert_eq!(back.storage.media_dir, config.storage.media_dir);
        assert_eq!(back.client.api_base_url, config.client.api_base_url);
    }
}

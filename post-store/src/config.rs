//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: `POST_STORE_`, nesting separator: `__`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/post-store/config.toml
//! 4. System directory: /etc/post-store/config.toml
//! 5. Default values
//!
//! ```toml
//! [store]
//! scheme = "ws"
//! user = "root"
//! password = "root"
//! database = "blog"
//! host = "localhost"
//! port = 8000
//! timeout_secs = 10
//!
//! [repository]
//! collection = "posts"
//!
//! [log]
//! level = "info"
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::connection::{ConnectionConfig, DEFAULT_AUTH_SOURCE, DEFAULT_SCHEME};
use crate::error::Result;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "POST_STORE_";

const APP_DIR: &str = "post-store";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Store connection configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Repository configuration
    #[serde(default)]
    pub repository: RepositoryConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

/// Store connection configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// URL scheme (ws, wss, http, https, mem)
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Root user; leave empty to skip sign-in
    #[serde(default)]
    pub user: String,

    /// Root password
    #[serde(default)]
    pub password: String,

    /// Database name
    #[serde(default = "default_database")]
    pub database: String,

    /// Store host
    #[serde(default = "default_host")]
    pub host: String,

    /// Store port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Authentication source written into the connection URI
    #[serde(default = "default_auth_source")]
    pub auth_source: String,

    /// Namespace to select (defaults to `auth_source`)
    #[serde(default)]
    pub namespace: Option<String>,

    /// Bound for connecting and for each repository operation, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Repository configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Collection (table) holding posts
    #[serde(default = "default_collection")]
    pub collection: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Build the connection configurator for this section
    pub fn configurator(&self) -> ConnectionConfig {
        let config = ConnectionConfig::new(
            self.user.clone(),
            self.password.clone(),
            self.database.clone(),
            self.host.clone(),
            self.port.to_string(),
        )
        .with_scheme(self.scheme.clone())
        .with_auth_source(self.auth_source.clone())
        .with_timeout(self.timeout());

        match &self.namespace {
            Some(namespace) => config.with_namespace(namespace.clone()),
            None => config,
        }
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("scheme", &self.scheme)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("auth_source", &self.auth_source)
            .field("namespace", &self.namespace)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            user: String::new(),
            password: String::new(),
            database: default_database(),
            host: default_host(),
            port: default_port(),
            auth_source: default_auth_source(),
            namespace: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_scheme() -> String {
    DEFAULT_SCHEME.to_string()
}

fn default_database() -> String {
    "blog".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_auth_source() -> String {
    DEFAULT_AUTH_SOURCE.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_collection() -> String {
    "posts".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from all sources
    ///
    /// Config files are merged lowest priority first, then environment
    /// variables override everything.
    pub fn load() -> Result<Self> {
        let config_paths = Self::find_config_paths();

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        let config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// Bypasses the search path. Environment variables still override the file.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.into()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }

    /// Config file paths in priority order (highest first)
    fn find_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_DIR);
        if let Some(path) = xdg_dirs.find_config_file("config.toml") {
            paths.push(path);
        }

        paths.push(PathBuf::from("/etc").join(APP_DIR).join("config.toml"));
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.store.scheme, "ws");
        assert_eq!(config.store.port, 8000);
        assert_eq!(config.store.auth_source, "admin");
        assert_eq!(config.store.timeout(), Duration::from_secs(10));
        assert_eq!(config.repository.collection, "posts");
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_configurator_from_store_section() {
        let store = StoreConfig {
            user: "admin".to_string(),
            password: "pw".to_string(),
            host: "db".to_string(),
            port: 8001,
            timeout_secs: 3,
            ..StoreConfig::default()
        };

        let configurator = store.configurator();
        assert_eq!(
            configurator.connection_uri(),
            "ws://admin:pw@db:8001/blog?authSource=admin"
        );
        assert_eq!(configurator.timeout(), Duration::from_secs(3));
        assert_eq!(configurator.namespace(), "admin");
    }

    #[test]
    fn test_store_config_debug_redacts_password() {
        let store = StoreConfig {
            password: "hunter2".to_string(),
            ..StoreConfig::default()
        };
        assert!(!format!("{:?}", store).contains("hunter2"));
    }

    #[test]
    fn test_load_from_file() {
        // Jail holds figment's lock so env-setting tests cannot interleave
        Jail::expect_with(|_jail| {
            let mut file = tempfile::NamedTempFile::new().map_err(|e| e.to_string())?;
            writeln!(
                file,
                r#"
                [store]
                scheme = "mem"
                database = "drafts"
                namespace = "tests"
                timeout_secs = 2

                [repository]
                collection = "articles"
                "#
            )
            .map_err(|e| e.to_string())?;

            let config = Config::load_from(file.path()).map_err(|e| e.to_string())?;
            assert_eq!(config.store.scheme, "mem");
            assert_eq!(config.store.database, "drafts");
            assert_eq!(config.store.namespace.as_deref(), Some("tests"));
            assert_eq!(config.store.timeout(), Duration::from_secs(2));
            assert_eq!(config.store.host, "localhost");
            assert_eq!(config.repository.collection, "articles");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                [store]
                host = "file-host"
                auth_source = "file-source"
                "#,
            )?;
            jail.set_env("POST_STORE_STORE__HOST", "env-host");
            jail.set_env("POST_STORE_STORE__PORT", "9000");
            jail.set_env("POST_STORE_LOG__LEVEL", "debug");

            let config = Config::load_from("config.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.store.host, "env-host");
            assert_eq!(config.store.port, 9000);
            assert_eq!(config.store.auth_source, "file-source");
            assert_eq!(config.log.level, "debug");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_value_is_config_error() {
        Jail::expect_with(|jail| {
            jail.create_file("bad.toml", "[store]\nport = \"not a port\"\n")?;

            let result = Config::load_from("bad.toml");
            assert!(matches!(result, Err(crate::error::Error::Config(_))));
            Ok(())
        });
    }
}

//! Server configuration for the Airq API.
//!
//! Every field can be set on the command line or through an `AIRQ_*`
//! environment variable.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AIRQ_SERVER_PORT` | 8080 | Server port |
//! | `AIRQ_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `AIRQ_LOG_LEVEL` | info | Log level |
//! | `AIRQ_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `AIRQ_ENABLE_CORS` | true | Enable CORS |
//! | `AIRQ_CORS_ORIGINS` | * | Allowed origins |
//! | `AIRQ_DATABASE_URL` | | PostgreSQL connection string |
//! | `AIRQ_DB_POOL_MIN` | 1 | Connections opened at start-up |
//! | `AIRQ_DB_POOL_MAX` | 10 | Maximum pool size |
//! | `AIRQ_DB_COMMAND_TIMEOUT_MS` | 6000 | Per-statement timeout (milliseconds) |
//! | `AIRQ_DB_MAX_IDLE` | 15 | Idle connection lifetime (seconds) |
//! | `AIRQ_CACHE_TTL` | 900 | Result cache lifetime (seconds, 0 disables) |
//! | `AIRQ_WEBSITE` | / | `meta.website` of every response |
//! | `AIRQ_DEFAULT_PAGE_SIZE` | 100 | Page size when `limit` is absent |
//! | `AIRQ_MAX_PAGE_SIZE` | 1000 | Largest accepted `limit` |
//!
//! # Example
//!
//! ```rust
//! use airq_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! assert_eq!(config.socket_addr(), "0.0.0.0:3000");
//! ```

use std::time::Duration;

use airq_persistence::db::CacheConfig;
use airq_persistence::query::filters::{MAX_LIMIT, PagingPolicy};
use clap::Parser;

/// Server configuration for the Airq API.
#[derive(Debug, Clone, Parser)]
#[command(name = "airq")]
#[command(about = "Air-quality metadata API server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "AIRQ_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "AIRQ_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "AIRQ_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "AIRQ_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "AIRQ_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "AIRQ_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Database connection string.
    #[arg(long, env = "AIRQ_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Connections opened when the pool is created.
    #[arg(long, env = "AIRQ_DB_POOL_MIN", default_value = "1")]
    pub db_pool_min: usize,

    /// Maximum number of pooled connections.
    #[arg(long, env = "AIRQ_DB_POOL_MAX", default_value = "10")]
    pub db_pool_max: usize,

    /// Per-statement timeout in milliseconds.
    #[arg(long, env = "AIRQ_DB_COMMAND_TIMEOUT_MS", default_value = "6000")]
    pub db_command_timeout_ms: u64,

    /// Seconds an idle connection is kept before it is closed.
    #[arg(long, env = "AIRQ_DB_MAX_IDLE", default_value = "15")]
    pub db_max_idle: u64,

    /// Result cache lifetime in seconds. Zero disables the cache.
    #[arg(long, env = "AIRQ_CACHE_TTL", default_value = "900")]
    pub cache_ttl: u64,

    /// Value reported as `meta.website`.
    #[arg(long, env = "AIRQ_WEBSITE", default_value = "/")]
    pub website: String,

    /// Page size used when a request carries no `limit`.
    #[arg(long, env = "AIRQ_DEFAULT_PAGE_SIZE", default_value = "100")]
    pub default_page_size: u32,

    /// Largest `limit` a request may ask for.
    #[arg(long, env = "AIRQ_MAX_PAGE_SIZE", default_value = "1000")]
    pub max_page_size: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            database_url: None,
            db_pool_min: 1,
            db_pool_max: 10,
            db_command_timeout_ms: 6000,
            db_max_idle: 15,
            cache_ttl: 900,
            website: "/".to_string(),
            default_page_size: 100,
            max_page_size: 1000,
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    pub fn from_env() -> Self {
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Paging limits applied to list endpoints.
    pub fn paging_policy(&self) -> PagingPolicy {
        PagingPolicy::new(self.default_page_size, self.max_page_size)
    }

    /// Result cache settings.
    pub fn cache_config(&self) -> CacheConfig {
        if self.cache_ttl == 0 {
            CacheConfig::disabled()
        } else {
            CacheConfig::with_ttl(Duration::from_secs(self.cache_ttl))
        }
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.db_pool_max == 0 {
            errors.push("Database pool size cannot be 0".to_string());
        }

        if self.db_pool_min > self.db_pool_max {
            errors.push("Minimum pool size cannot exceed maximum pool size".to_string());
        }

        if self.db_command_timeout_ms == 0 {
            errors.push("Command timeout cannot be 0".to_string());
        }

        if self.default_page_size == 0 {
            errors.push("Default page size cannot be 0".to_string());
        }

        if self.default_page_size > self.max_page_size {
            errors.push("Default page size cannot exceed max page size".to_string());
        }

        if self.max_page_size > MAX_LIMIT {
            errors.push(format!("Max page size cannot exceed {}", MAX_LIMIT));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0 and disables CORS.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            log_level: "debug".to_string(),
            request_timeout: 5,
            enable_cors: false,
            website: "http://localhost".to_string(),
            default_page_size: 10,
            max_page_size: 100,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.db_command_timeout_ms, 6000);
        assert_eq!(config.db_max_idle, 15);
        assert!(config.enable_cors);
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            port: 3000,
            host: "0.0.0.0".to_string(),
            ..Default::default()
        };
        assert_eq!(config.socket_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_validate_valid() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_port() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("Port")));
    }

    #[test]
    fn test_validate_invalid_page_sizes() {
        let config = ServerConfig {
            default_page_size: 100,
            max_page_size: 50,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_max_page_size_ceiling() {
        let config = ServerConfig {
            max_page_size: MAX_LIMIT + 1,
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("Max page size")));
    }

    #[test]
    fn test_validate_pool_sizes() {
        let config = ServerConfig {
            db_pool_min: 20,
            db_pool_max: 10,
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("pool")));
    }

    #[test]
    fn test_cache_config_zero_ttl_disables() {
        let config = ServerConfig {
            cache_ttl: 0,
            ..Default::default()
        };
        assert!(!config.cache_config().enabled);
        assert_eq!(
            ServerConfig::default().cache_config().ttl,
            Duration::from_secs(900)
        );
    }

    #[test]
    fn test_paging_policy() {
        let policy = ServerConfig::for_testing().paging_policy();
        assert_eq!(policy.default_limit, 10);
        assert_eq!(policy.max_limit, 100);
    }

    #[test]
    fn test_parse_from_args() {
        let config = ServerConfig::try_parse_from([
            "airq",
            "--port",
            "9000",
            "--database-url",
            "postgres://localhost/openaq",
            "--cache-ttl",
            "60",
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/openaq")
        );
        assert_eq!(config.cache_ttl, 60);
    }

    #[test]
    fn test_for_testing() {
        let config = ServerConfig::for_testing();
        assert_eq!(config.port, 0);
        assert!(!config.enable_cors);
    }
}

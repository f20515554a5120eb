// Centralized configuration management for the RTI backend
// Loaded once in main and handed to AppState; nothing reads env vars after startup

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub security: SecurityConfig,
    pub disable_embedded_migrations: bool,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub environment: Environment,
    pub rust_log: String,
}

/// Environment type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// MySQL pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Seconds a request waits for a pool slot before failing
    pub connect_timeout: u64,
    pub idle_timeout: u64,
    pub max_lifetime: u64,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry: u64,
    pub audience: String,
    pub issuer: String,
}

/// Security configuration: CORS and rate limiting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub cors_allowed_origins: Vec<String>,
    /// Origins whose host ends with this domain are allowed in production
    pub cors_production_domain: Option<String>,
    pub enable_rate_limiting: bool,
    pub rate_limit_window_seconds: u32,
    pub rate_limit_max_requests: u32,
    pub auth_rate_limit_window_seconds: u32,
    pub auth_rate_limit_max_requests: u32,
    /// Reverse proxies in front of the service; 0 means `X-Forwarded-For` is ignored
    pub trusted_proxy_hops: u32,
}

impl AppConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Helper function to get required var
        let get_required = |key: &str| -> Result<String, ConfigError> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingVar(key.to_string()))
        };

        // Helper function to get optional var with default
        let get_or_default =
            |key: &str, default: &str| -> String { lookup(key).unwrap_or_else(|| default.to_string()) };

        let parse_or_default = |key: &str, default: &str| -> Result<u32, ConfigError> {
            get_or_default(key, default).trim().parse().map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), "not a valid u32".to_string())
            })
        };

        let parse_u64_or_default = |key: &str, default: &str| -> Result<u64, ConfigError> {
            get_or_default(key, default).trim().parse().map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), "not a valid u64".to_string())
            })
        };

        let parse_bool_or_default = |key: &str, default: &str| -> bool {
            get_or_default(key, default).trim().to_lowercase() == "true"
        };

        // Parse bind address to extract port
        let bind_address = get_or_default("BIND_ADDRESS", "0.0.0.0:5000");
        let port = bind_address
            .rsplit(':')
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "BIND_ADDRESS".to_string(),
                    "expected host:port".to_string(),
                )
            })?;

        let environment = Environment::from(get_or_default("ENVIRONMENT", "development"));
        let rust_log = get_or_default("RUST_LOG", "info");

        let jwt_secret = get_required("JWT_SECRET")?;
        if jwt_secret.len() < 32 {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET".to_string(),
                "Secret must be at least 32 characters long".to_string(),
            ));
        }

        let database = DatabaseConfig {
            url: get_required("DATABASE_URL")?,
            max_connections: parse_or_default("DATABASE_MAX_CONNECTIONS", "10")?,
            min_connections: parse_or_default("DATABASE_MIN_CONNECTIONS", "1")?,
            connect_timeout: parse_u64_or_default("DATABASE_CONNECT_TIMEOUT", "10")?,
            idle_timeout: parse_u64_or_default("DATABASE_IDLE_TIMEOUT", "600")?,
            max_lifetime: parse_u64_or_default("DATABASE_MAX_LIFETIME", "1800")?,
        };
        if database.max_connections == 0 || database.max_connections < database.min_connections {
            return Err(ConfigError::InvalidValue(
                "DATABASE_MAX_CONNECTIONS".to_string(),
                "must be > 0 and >= DATABASE_MIN_CONNECTIONS".to_string(),
            ));
        }

        let jwt = JwtConfig {
            secret: jwt_secret,
            expiry: parse_u64_or_default("JWT_EXPIRY", "604800")?,
            audience: get_or_default("JWT_AUDIENCE", "rti-portal"),
            issuer: get_or_default("JWT_ISSUER", "rti-portal"),
        };

        let cors_allowed_origins: Vec<String> = get_or_default(
            "CORS_ALLOWED_ORIGINS",
            "http://localhost:3000,http://localhost:5173",
        )
        .split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect();

        let cors_production_domain = lookup("CORS_PRODUCTION_DOMAIN")
            .map(|d| d.trim().trim_start_matches('.').to_lowercase())
            .filter(|d| !d.is_empty());

        let security = SecurityConfig {
            cors_allowed_origins,
            cors_production_domain,
            enable_rate_limiting: parse_bool_or_default("ENABLE_RATE_LIMITING", "true"),
            rate_limit_window_seconds: parse_or_default("RATE_LIMIT_WINDOW_SECONDS", "900")?,
            rate_limit_max_requests: parse_or_default("RATE_LIMIT_MAX_REQUESTS", "100")?,
            auth_rate_limit_window_seconds: parse_or_default(
                "AUTH_RATE_LIMIT_WINDOW_SECONDS",
                "900",
            )?,
            auth_rate_limit_max_requests: parse_or_default("AUTH_RATE_LIMIT_MAX_REQUESTS", "20")?,
            trusted_proxy_hops: parse_or_default("TRUSTED_PROXY_HOPS", "0")?,
        };

        Ok(Self {
            server: ServerConfig {
                bind_address,
                port,
                environment,
                rust_log,
            },
            database,
            jwt,
            security,
            disable_embedded_migrations: parse_bool_or_default(
                "DISABLE_EMBEDDED_MIGRATIONS",
                "false",
            ),
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.server.environment == Environment::Production
    }
}

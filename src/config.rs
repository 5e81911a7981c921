// Process configuration read from the environment (and `.env` when present)

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;

const DEV_JWT_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

/// `url: None` selects the in-memory store
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bootstrap_admin_email: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("bootstrap_admin_email", &self.bootstrap_admin_email)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(other.to_string()),
        }
    }
}

impl AppConfig {
    /// Loads `.env` if present, then reads the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let default_addr = SocketAddr::from(([0, 0, 0, 0], 3000));

        Ok(Self {
            server: ServerConfig {
                bind_addr: parse_or("BIND_ADDR", var("BIND_ADDR"), default_addr)?,
            },
            database: DatabaseConfig {
                url: var("DATABASE_URL"),
                max_connections: parse_or("DB_MAX_CONNECTIONS", var("DB_MAX_CONNECTIONS"), 5)?,
            },
            auth: AuthConfig {
                // Logging is not up yet; main warns about the fallback
                jwt_secret: var("JWT_SECRET").unwrap_or_else(|| DEV_JWT_SECRET.to_string()),
                token_ttl_hours: parse_or("TOKEN_TTL_HOURS", var("TOKEN_TTL_HOURS"), 8)?,
                bootstrap_admin_email: var("BOOTSTRAP_ADMIN_EMAIL"),
            },
            logging: LoggingConfig {
                level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
                format: parse_or("LOG_FORMAT", var("LOG_FORMAT"), LogFormat::default())?,
            },
        })
    }

    /// True when the signing secret is the built-in development value
    pub fn uses_dev_secret(&self) -> bool {
        self.auth.jwt_secret == DEV_JWT_SECRET
    }
}

fn parse_or<T: FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = load(&[]).unwrap();

        assert_eq!(config.server.bind_addr.port(), 3000);
        assert_eq!(config.database.url, None);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.auth.token_ttl_hours, 8);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.uses_dev_secret());
    }

    #[test]
    fn reads_every_variable() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/pedidos"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("JWT_SECRET", "s3cret"),
            ("TOKEN_TTL_HOURS", "24"),
            ("LOG_LEVEL", "debug"),
            ("LOG_FORMAT", "JSON"),
            ("BOOTSTRAP_ADMIN_EMAIL", "admin@loja.com.br"),
        ])
        .unwrap();

        assert_eq!(config.server.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.database.url.as_deref(), Some("postgres://localhost/pedidos"));
        assert_eq!(config.database.max_connections, 12);
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.auth.bootstrap_admin_email.as_deref(), Some("admin@loja.com.br"));
        assert!(!config.uses_dev_secret());
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = load(&[("DATABASE_URL", "  "), ("LOG_LEVEL", "")]).unwrap();
        assert_eq!(config.database.url, None);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn malformed_number_is_rejected() {
        let err = load(&[("DB_MAX_CONNECTIONS", "many")]).unwrap_err();
        assert!(err.to_string().contains("DB_MAX_CONNECTIONS"));
    }

    #[test]
    fn secret_is_not_debug_printed() {
        let config = load(&[("JWT_SECRET", "s3cret")]).unwrap();
        assert!(!format!("{:?}", config).contains("s3cret"));
    }
}

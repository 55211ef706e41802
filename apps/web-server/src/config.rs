//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use yatube_infra::auth::{DEFAULT_SECRET, JwtConfig};
use yatube_infra::database::DatabaseConfig;

use crate::telemetry::TelemetryConfig;

/// Where anonymous users are sent when a page needs a login.
pub const DEFAULT_LOGIN_URL: &str = "/auth/login/";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub login_url: String,
    pub telemetry: TelemetryConfig,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no" | "off"))
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: env_parse("DB_MAX_CONNECTIONS", 20),
            min_connections: env_parse("DB_MIN_CONNECTIONS", 2),
            connect_timeout: Duration::from_secs(env_parse("DB_CONNECT_TIMEOUT_SECS", 10)),
            auto_migrate: env_flag("DB_AUTO_MIGRATE", false),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_parse("PORT", 8080),
            database,
            jwt: Self::jwt_from_env(),
            login_url: env::var("LOGIN_URL").unwrap_or_else(|_| DEFAULT_LOGIN_URL.to_string()),
            telemetry: TelemetryConfig::from_env(),
        }
    }

    fn jwt_from_env() -> JwtConfig {
        let defaults = JwtConfig::default();

        JwtConfig {
            secret: env::var("JWT_SECRET").unwrap_or(defaults.secret),
            expiration_hours: env_parse("JWT_EXPIRATION_HOURS", defaults.expiration_hours),
            issuer: env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        }
    }

    /// Log loudly about settings that must not reach production.
    pub fn warn_insecure_defaults(&self) {
        if self.jwt.secret != DEFAULT_SECRET {
            return;
        }

        let is_production = env::var("RUST_ENV")
            .map(|v| v == "production" || v == "prod")
            .unwrap_or(false);

        if is_production {
            tracing::error!(
                "SECURITY: Using default JWT secret in production! Set JWT_SECRET environment variable."
            );
        } else {
            tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
        }
    }
}

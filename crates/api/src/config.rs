//! Process configuration, read once at startup.

use std::str::FromStr;

use crate::auth::jwt::JwtConfig;

/// Settings for the login throttle.
#[derive(Debug, Clone, Copy)]
pub struct LoginThrottle {
    /// Attempts allowed per client IP within one window.
    pub attempts: u32,
    pub window_secs: u64,
}

impl Default for LoginThrottle {
    fn default() -> Self {
        Self {
            attempts: 5,
            window_secs: 60,
        }
    }
}

/// Everything the server needs to boot.
///
/// | Env var                 | Default                 |
/// |-------------------------|-------------------------|
/// | `DATABASE_URL`          | required                |
/// | `DB_MAX_CONNECTIONS`    | `20`                    |
/// | `HOST`                  | `0.0.0.0`               |
/// | `PORT`                  | `3000`                  |
/// | `CORS_ORIGINS`          | `http://localhost:5173` |
/// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
/// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
/// | `LOGIN_RATE_LIMIT`      | `5`                     |
/// | `LOGIN_RATE_WINDOW_SECS`| `60`                    |
///
/// JWT settings are read by [`JwtConfig::from_env`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    /// Origins allowed to send credentialed requests.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Drain budget for in-flight requests after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    pub login_throttle: LoginThrottle,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Build the configuration from the environment.
    ///
    /// Panics on a missing `DATABASE_URL` or an unparsable value; a bad
    /// deployment should not get as far as binding a socket.
    pub fn from_env() -> Self {
        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in the environment");

        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        let defaults = LoginThrottle::default();

        Self {
            database_url,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 20),
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30),
            login_throttle: LoginThrottle {
                attempts: env_or("LOGIN_RATE_LIMIT", defaults.attempts),
                window_secs: env_or("LOGIN_RATE_WINDOW_SECS", defaults.window_secs),
            },
            jwt: JwtConfig::from_env(),
        }
    }
}

/// Parse `key` from the environment, falling back to `default` when unset.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

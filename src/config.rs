/*
 * Responsibility
 * - Load settings from the environment (JWT_SECRET, session store backend, timeouts)
 * - Validate them once at startup (missing required values fail the boot, not a request)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// HMAC key used to verify access tokens. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct JwtSecret(String);

impl JwtSecret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("JwtSecret(***)")
    }
}

/// Where the active session list lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionBackend {
    Postgres { database_url: String },
    Valkey { url: String, key_prefix: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub jwt_secret: JwtSecret,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,
    pub jwt_leeway_seconds: u64,

    pub session_backend: SessionBackend,
    pub session_check_timeout: Duration,

    pub request_timeout: Duration,
    pub request_body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key/value source. `from_env` feeds it the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = lookup("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let jwt_issuer = lookup("JWT_ISSUER").filter(|s| !s.trim().is_empty());
        let jwt_audience = lookup("JWT_AUDIENCE").filter(|s| !s.trim().is_empty());

        let jwt_leeway_seconds = parse_or("JWT_LEEWAY_SECONDS", lookup("JWT_LEEWAY_SECONDS"), 0)?;

        let session_backend = match lookup("SESSION_STORE")
            .unwrap_or_else(|| "postgres".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" | "postgresql" => SessionBackend::Postgres {
                database_url: lookup("DATABASE_URL")
                    .ok_or(ConfigError::Missing("DATABASE_URL"))?,
            },
            "valkey" | "redis" => SessionBackend::Valkey {
                url: lookup("VALKEY_URL").ok_or(ConfigError::Missing("VALKEY_URL"))?,
                key_prefix: lookup("SESSION_KEY_PREFIX")
                    .unwrap_or_else(|| "sessions".to_string()),
            },
            _ => return Err(ConfigError::Invalid("SESSION_STORE")),
        };

        let session_check_timeout = Duration::from_millis(parse_or(
            "SESSION_CHECK_TIMEOUT_MS",
            lookup("SESSION_CHECK_TIMEOUT_MS"),
            2000,
        )?);

        let request_timeout = Duration::from_secs(parse_or(
            "REQUEST_TIMEOUT_SECONDS",
            lookup("REQUEST_TIMEOUT_SECONDS"),
            30,
        )?);

        let request_body_limit_bytes = parse_or(
            "REQUEST_BODY_LIMIT_BYTES",
            lookup("REQUEST_BODY_LIMIT_BYTES"),
            1024 * 1024,
        )?;

        Ok(Self {
            addr,
            app_env,
            jwt_secret: JwtSecret::new(jwt_secret),
            jwt_issuer,
            jwt_audience,
            jwt_leeway_seconds,
            session_backend,
            session_check_timeout,
            request_timeout,
            request_body_limit_bytes,
        })
    }
}

// Absent -> default, present but unparsable -> error.
fn parse_or<T: FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(s) => s.trim().parse().map_err(|_| ConfigError::Invalid(key)),
    }
}

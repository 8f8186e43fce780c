/*
 * Responsibility
 * - Load settings from the environment (DATABASE_URL, CORS allowlist, token settings)
 * - Validate them up front (fail start-up when something is missing)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use chrono::Duration;

use crate::middleware::auth::BearerScheme;

/// Minimum HS256 secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Longest access-token lifetime accepted from the environment (one year).
pub const MAX_TTL_SECONDS: i64 = 365 * 24 * 60 * 60;

const DEFAULT_TTL_SECONDS: i64 = 2 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    // Process-wide HMAC secret; read-only after start-up.
    pub jwt_secret: String,
    pub auth_issuer: String,
    pub access_token_ttl: Duration,
    pub access_token_leeway_seconds: u64,
    pub bearer_scheme: BearerScheme,

    pub request_timeout_seconds: u64,
    pub body_limit_bytes: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the secret or credentials embedded in the database url
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("auth_issuer", &self.auth_issuer)
            .field("access_token_ttl_seconds", &self.access_token_ttl.num_seconds())
            .field("access_token_leeway_seconds", &self.access_token_leeway_seconds)
            .field("bearer_scheme", &self.bearer_scheme)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("body_limit_bytes", &self.body_limit_bytes)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = setting("PORT", env_opt("PORT"), 3000, |p| *p > 0)?;

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins =
            parse_origins(&std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid("JWT_SECRET"));
        }

        let auth_issuer = std::env::var("AUTH_ISSUER")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "foro-hub".to_string());

        let access_token_ttl = parse_ttl(env_opt("ACCESS_TOKEN_TTL_SECONDS"))?;

        let access_token_leeway_seconds = setting(
            "ACCESS_TOKEN_LEEWAY_SECONDS",
            env_opt("ACCESS_TOKEN_LEEWAY_SECONDS"),
            0u64,
            |_| true,
        )?;

        let bearer_scheme = match std::env::var("AUTH_STRICT_BEARER") {
            Ok(v) => {
                if parse_flag(&v).ok_or(ConfigError::Invalid("AUTH_STRICT_BEARER"))? {
                    BearerScheme::Strict
                } else {
                    BearerScheme::Tolerant
                }
            }
            Err(_) => BearerScheme::default(),
        };

        let request_timeout_seconds = setting(
            "REQUEST_TIMEOUT_SECONDS",
            env_opt("REQUEST_TIMEOUT_SECONDS"),
            30u64,
            |v| *v > 0,
        )?;

        let body_limit_bytes = setting(
            "BODY_LIMIT_BYTES",
            env_opt("BODY_LIMIT_BYTES"),
            1024 * 1024usize,
            |v| *v > 0,
        )?;

        Ok(Self {
            addr,
            database_url,
            app_env,
            cors_allowed_origins,
            jwt_secret,
            auth_issuer,
            access_token_ttl,
            access_token_leeway_seconds,
            bearer_scheme,
            request_timeout_seconds,
            body_limit_bytes,
        })
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Absent: `default`. Present: must parse as `T` and pass `accept`, otherwise
/// start-up fails with `Invalid(key)`.
fn setting<T: FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
    accept: impl Fn(&T) -> bool,
) -> Result<T, ConfigError> {
    match raw {
        Some(v) => v
            .trim()
            .parse::<T>()
            .ok()
            .filter(|parsed| accept(parsed))
            .ok_or(ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn parse_ttl(raw: Option<String>) -> Result<Duration, ConfigError> {
    let seconds = setting(
        "ACCESS_TOKEN_TTL_SECONDS",
        raw,
        DEFAULT_TTL_SECONDS,
        |ttl| (1..=MAX_TTL_SECONDS).contains(ttl),
    )?;

    Duration::try_seconds(seconds).ok_or(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS"))
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

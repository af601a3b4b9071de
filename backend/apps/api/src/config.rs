//! Server Configuration
//!
//! Everything the binary reads from the environment, parsed once at startup.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::AuthConfig;

const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub database_url: String,
    pub frontend_origins: Vec<String>,
    pub port: u16,
    pub auth: AuthConfig,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let frontend_origins = env::var("FRONTEND_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        let port = parse_var("API_PORT")?.unwrap_or(DEFAULT_PORT);

        Ok(Self {
            database_url,
            frontend_origins,
            port,
            auth: auth_config_from_env()?,
        })
    }
}

fn auth_config_from_env() -> anyhow::Result<AuthConfig> {
    let mut config = match env::var("AUTH_TOKEN_SECRET") {
        Ok(secret) => AuthConfig::new(secret.into_bytes()),
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("AUTH_TOKEN_SECRET not set, using a random per-process secret");
            AuthConfig::with_random_secret()
        }
        Err(_) => bail!("AUTH_TOKEN_SECRET must be set in release builds"),
    };

    if let Some(secs) = parse_var::<u64>("AUTH_ACCESS_TTL_SECS")? {
        config.access_ttl = Duration::from_secs(secs);
    }
    if let Some(secs) = parse_var::<u64>("AUTH_REFRESH_TTL_SECS")? {
        config.refresh_ttl = Duration::from_secs(secs);
    }
    if let Some(max) = parse_var::<usize>("AUTH_MAX_SESSIONS")? {
        config.max_sessions = max;
    }
    if let Some(ms) = parse_var::<u64>("AUTH_STORE_TIMEOUT_MS")? {
        config.store_timeout = Duration::from_millis(ms);
    }

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid auth configuration: {}", e))?;
    Ok(config)
}

/// Unset is `None`; set but unparsable is an error.
fn parse_var<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} is not a valid value", name)),
        Err(_) => Ok(None),
    }
}

//! Application Configuration
//!
//! Configuration for the Auth application layer. Loaded from the environment
//! by the API binary and threaded into the token issuer and both middlewares.

use std::fmt;
use std::time::Duration;

/// Access token lifetime (15 minutes)
pub const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(15 * 60);

/// Refresh session lifetime (10 minutes)
pub const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(10 * 60);

/// Sessions kept per account before the oldest is evicted
pub const DEFAULT_MAX_SESSIONS: usize = 10;

/// Upper bound for either token lifetime (365 days)
pub const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Deadline for a single store call
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret for access tokens
    pub token_secret: Vec<u8>,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub max_sessions: usize,
    pub store_timeout: Duration,
}

impl AuthConfig {
    /// Config with the given signing secret and default lifetimes
    pub fn new(token_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            token_secret: token_secret.into(),
            access_ttl: DEFAULT_ACCESS_TTL,
            refresh_ttl: DEFAULT_REFRESH_TTL,
            max_sessions: DEFAULT_MAX_SESSIONS,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Create config with a random per-process secret (for development)
    ///
    /// Tokens do not survive a restart.
    pub fn with_random_secret() -> Self {
        Self::new(platform::crypto::random_bytes(32))
    }

    /// Reject settings that would make every token or session unusable
    pub fn validate(&self) -> Result<(), String> {
        if self.token_secret.len() < 32 {
            return Err("token secret must be at least 32 bytes".to_string());
        }
        if self.access_ttl.is_zero() || self.refresh_ttl.is_zero() {
            return Err("token lifetimes must be positive".to_string());
        }
        if self.access_ttl > MAX_TTL || self.refresh_ttl > MAX_TTL {
            return Err(format!(
                "token lifetimes must be at most {} seconds",
                MAX_TTL.as_secs()
            ));
        }
        if self.max_sessions == 0 {
            return Err("max_sessions must be at least 1".to_string());
        }
        if self.store_timeout.is_zero() {
            return Err("store timeout must be positive".to_string());
        }
        Ok(())
    }

    /// Refresh TTL as a chrono duration for timestamp arithmetic
    pub fn refresh_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.refresh_ttl).unwrap_or(chrono::Duration::MAX)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"[REDACTED]")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("max_sessions", &self.max_sessions)
            .field("store_timeout", &self.store_timeout)
            .finish()
    }
}

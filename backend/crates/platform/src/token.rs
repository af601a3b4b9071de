//! Stateless Signed Tokens
//!
//! HS256 JWTs carrying a caller-defined payload plus `iat`/`exp`. Validity is
//! decided from the token alone: signature first, then expiry.
//!
//! Expiry is boundary-inclusive and has no leeway: a token checked at its
//! `exp` second is already expired.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

/// Why a token was rejected.
///
/// Callers usually surface all of these identically; the distinction is for
/// logs and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token could not be signed: {0}")]
    Signing(String),
}

/// Payload plus the registered timing claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedClaims<P> {
    #[serde(flatten)]
    pub payload: P,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expires at (seconds since epoch)
    pub exp: i64,
}

impl<P> SignedClaims<P> {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Signs and verifies tokens with one shared HMAC secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("algorithm", &Algorithm::HS256)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl TokenSigner {
    pub fn new(secret: &[u8]) -> Self {
        let secret = Zeroizing::new(secret.to_vec());

        // Expiry is checked by hand in `verify_at` so the boundary is exact
        // and testable against an injected clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(&secret),
            decoding_key: DecodingKey::from_secret(&secret),
            validation,
        }
    }

    /// Sign `payload` valid for `ttl` from now.
    pub fn sign<P: Serialize>(&self, payload: P, ttl: Duration) -> Result<String, TokenError> {
        self.sign_at(payload, ttl, Utc::now())
    }

    /// Sign `payload` as if issued at `now`.
    pub fn sign_at<P: Serialize>(
        &self,
        payload: P,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let ttl = chrono::Duration::from_std(ttl).map_err(|e| TokenError::Signing(e.to_string()))?;
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Signing("expiry is out of range".to_string()))?;
        let claims = SignedClaims {
            payload,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token against the current time.
    pub fn verify<P: DeserializeOwned>(&self, token: &str) -> Result<SignedClaims<P>, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as of `now`.
    pub fn verify_at<P: DeserializeOwned>(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<SignedClaims<P>, TokenError> {
        let data = decode::<SignedClaims<P>>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                JwtErrorKind::InvalidSignature | JwtErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                _ => TokenError::Malformed,
            })?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}

//! Access Tokens
//!
//! Stateless: `{sub, iat, exp}` signed with the configured secret. Verified
//! without touching the store.

use std::time::Duration;

use chrono::{DateTime, Utc};
use platform::token::{TokenError, TokenSigner};
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::domain::entity::IssuesTokens;
use crate::domain::value_object::AccountId;
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Serialize, Deserialize)]
struct Subject {
    sub: AccountId,
}

/// What a verified access token asserts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessClaims {
    pub account_id: AccountId,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies access tokens
#[derive(Debug, Clone)]
pub struct AccessTokenCodec {
    signer: TokenSigner,
    ttl: Duration,
}

impl AccessTokenCodec {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            signer: TokenSigner::new(&config.token_secret),
            ttl: config.access_ttl,
        }
    }

    pub fn issue<T: IssuesTokens>(&self, holder: &T) -> AuthResult<String> {
        self.issue_at(holder, Utc::now())
    }

    pub fn issue_at<T: IssuesTokens>(&self, holder: &T, now: DateTime<Utc>) -> AuthResult<String> {
        let subject = Subject {
            sub: holder.token_subject(),
        };
        self.signer
            .sign_at(subject, self.ttl, now)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims, TokenError> {
        let claims = self.signer.verify_at::<Subject>(token, now)?;
        let expires_at = claims.expires_at().ok_or(TokenError::Malformed)?;
        Ok(AccessClaims {
            account_id: claims.payload.sub,
            expires_at,
        })
    }
}

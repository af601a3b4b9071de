//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::Account;
use crate::domain::value_object::AccountId;

// ============================================================================
// Requests
// ============================================================================

/// Sign up request. No `Debug`: carries a secret.
#[derive(Clone, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ============================================================================
// Responses
// ============================================================================

/// Public view of an account: never the secret hash or session tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: AccountId,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.account_id,
            email: account.email.to_string(),
            created_at: account.created_at,
        }
    }
}

/// Renewal response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

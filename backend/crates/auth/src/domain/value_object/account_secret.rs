//! Account Secret Value Objects
//!
//! `RawSecret` is what the caller typed; `SecretHash` is the only form that
//! is persisted. Hashing and verification delegate to `platform::password`.

use std::fmt;

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{ClearTextPassword, HashedPassword, PasswordHashError, PasswordPolicyError};

// ============================================================================
// Raw Secret (User Input)
// ============================================================================

/// Secret from user input, zeroized on drop.
pub struct RawSecret(ClearTextPassword);

impl RawSecret {
    /// Validate a secret chosen at signup.
    pub fn new(raw: String) -> AppResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| match e {
            PasswordPolicyError::TooShort { min, .. } => {
                AppError::bad_request(format!("Password must be at least {} characters", min))
                    .with_action("Choose a longer password")
            }
            PasswordPolicyError::TooLong { max, .. } => {
                AppError::bad_request(format!("Password must be at most {} characters", max))
                    .with_action("Choose a shorter password")
            }
            PasswordPolicyError::EmptyOrWhitespace => {
                AppError::bad_request("Password cannot be empty").with_action("Enter a password")
            }
            PasswordPolicyError::InvalidCharacter => {
                AppError::bad_request("Password contains invalid characters")
                    .with_action("Remove control characters")
            }
            PasswordPolicyError::CommonPattern => {
                AppError::bad_request("Password is too common or follows a predictable pattern")
                    .with_action("Choose a less predictable password")
            }
        })?;

        Ok(Self(clear_text))
    }

    /// Wrap a secret presented at login. Policy is not re-checked.
    pub fn for_login(raw: String) -> AppResult<Self> {
        ClearTextPassword::for_verification(raw)
            .map(Self)
            .map_err(|e| AppError::bad_request(e.to_string()))
    }

    /// Argon2id hash. Blocking; call from `spawn_blocking`.
    pub fn hash(&self) -> AppResult<SecretHash> {
        self.0.hash().map(SecretHash).map_err(|e| match e {
            PasswordHashError::HashingFailed(msg) => {
                AppError::internal(format!("Secret hashing failed: {}", msg))
            }
            PasswordHashError::InvalidHashFormat => AppError::internal("Secret hashing failed"),
        })
    }
}

impl fmt::Debug for RawSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawSecret").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// Secret Hash (for storage)
// ============================================================================

/// Argon2id PHC string.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretHash(HashedPassword);

impl SecretHash {
    /// Restore from the stored PHC string
    pub fn from_phc_string(phc_string: impl Into<String>) -> AppResult<Self> {
        HashedPassword::from_phc_string(phc_string)
            .map(Self)
            .map_err(|_| AppError::internal("Invalid secret hash in store"))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Blocking; call from `spawn_blocking`.
    pub fn verify(&self, raw: &RawSecret) -> bool {
        self.0.verify(&raw.0)
    }

    /// Same cost as `verify`, always false.
    pub fn verify_dummy(raw: &RawSecret) -> bool {
        HashedPassword::verify_dummy(&raw.0)
    }
}

impl fmt::Debug for SecretHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretHash").field("hash", &"[HASH]").finish()
    }
}

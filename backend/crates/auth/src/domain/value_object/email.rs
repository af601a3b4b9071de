//! Email Value Object
//!
//! Account login identifier. Normalized (trimmed, lowercased) before any
//! shape check so lookups and the uniqueness constraint agree.

use std::fmt;

use kernel::error::app_error::{AppError, AppResult};

/// RFC 5321 path limit
const EMAIL_MAX_LENGTH: usize = 254;
const LOCAL_PART_MAX_LENGTH: usize = 64;

/// Normalized account email
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    pub fn new(raw: impl AsRef<str>) -> AppResult<Self> {
        let normalized = raw.as_ref().trim().to_lowercase();

        if normalized.is_empty() {
            return Err(AppError::bad_request("Email cannot be empty").with_action("Enter an email"));
        }
        if normalized.len() > EMAIL_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Email must be at most {} characters",
                EMAIL_MAX_LENGTH
            )));
        }
        if !has_email_shape(&normalized) {
            return Err(AppError::bad_request("Invalid email format")
                .with_action("Enter an address like name@example.com"));
        }

        Ok(Self(normalized))
    }

    /// Stored values were normalized on the way in
    pub fn from_db(stored: String) -> Self {
        Self(stored)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One `@`, a bounded local part without whitespace, and a dotted
/// hostname-like domain.
fn has_email_shape(candidate: &str) -> bool {
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };

    let local_ok = !local.is_empty()
        && local.len() <= LOCAL_PART_MAX_LENGTH
        && !local.chars().any(char::is_whitespace);

    let domain_ok = domain.contains('.')
        && domain.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        });

    local_ok && domain_ok
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! Value Objects

use std::fmt;

use serde::Serialize;

use crate::error::{QuizError, QuizResult};

pub const TITLE_MAX_LENGTH: usize = 200;

/// Trimmed, non-empty title
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Title(String);

impl Title {
    pub fn new(raw: impl AsRef<str>) -> QuizResult<Self> {
        let trimmed = raw.as_ref().trim();

        if trimmed.is_empty() {
            return Err(QuizError::Validation("Title cannot be empty".to_string()));
        }
        if trimmed.chars().count() > TITLE_MAX_LENGTH {
            return Err(QuizError::Validation(format!(
                "Title must be at most {} characters",
                TITLE_MAX_LENGTH
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Stored values were validated on the way in
    pub fn from_db(title: String) -> Self {
        Self(title)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_trimmed() {
        assert_eq!(Title::new("  Chapter 1 ").unwrap().as_str(), "Chapter 1");
    }

    #[test]
    fn test_title_rejects_blank_and_long() {
        assert!(Title::new("").is_err());
        assert!(Title::new(" \t ").is_err());
        assert!(Title::new("x".repeat(TITLE_MAX_LENGTH + 1)).is_err());
        assert!(Title::new("x".repeat(TITLE_MAX_LENGTH)).is_ok());
    }
}

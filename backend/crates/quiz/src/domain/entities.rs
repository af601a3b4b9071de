//! Domain Entities
//!
//! Papers are owned by an account; questions are owned through their paper.

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, PaperId, QuestionId};

use crate::domain::value_objects::Title;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paper {
    pub paper_id: PaperId,
    pub account_id: AccountId,
    pub title: Title,
    pub created_at: DateTime<Utc>,
}

impl Paper {
    pub fn new(account_id: AccountId, title: Title) -> Self {
        Self {
            paper_id: PaperId::new(),
            account_id,
            title,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub question_id: QuestionId,
    pub paper_id: PaperId,
    pub title: Title,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Question {
    /// New questions start incomplete
    pub fn new(paper_id: PaperId, title: Title) -> Self {
        Self {
            question_id: QuestionId::new(),
            paper_id,
            title,
            completed: false,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, changes: &QuestionChanges) {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(completed) = changes.completed {
            self.completed = completed;
        }
    }
}

/// Partial update; `None` leaves the field as is
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionChanges {
    pub title: Option<Title>,
    pub completed: Option<bool>,
}

impl QuestionChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_defaults_to_incomplete() {
        let q = Question::new(PaperId::new(), Title::new("What is ownership?").unwrap());
        assert!(!q.completed);
    }

    #[test]
    fn test_apply_partial_changes() {
        let mut q = Question::new(PaperId::new(), Title::new("Q1").unwrap());

        q.apply(&QuestionChanges {
            title: None,
            completed: Some(true),
        });
        assert!(q.completed);
        assert_eq!(q.title.as_str(), "Q1");

        q.apply(&QuestionChanges {
            title: Some(Title::new("Q1 revised").unwrap()),
            completed: None,
        });
        assert!(q.completed);
        assert_eq!(q.title.as_str(), "Q1 revised");
    }
}

//! API DTOs

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, PaperId, QuestionId};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Paper, Question};

#[derive(Debug, Clone, Deserialize)]
pub struct TitleRequest {
    pub title: String,
}

/// PATCH body for a question; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionPatchRequest {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperResponse {
    pub id: PaperId,
    pub account_id: AccountId,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

impl From<Paper> for PaperResponse {
    fn from(paper: Paper) -> Self {
        Self {
            id: paper.paper_id,
            account_id: paper.account_id,
            title: paper.title.to_string(),
            created_at: paper.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub id: QuestionId,
    pub paper_id: PaperId,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Question> for QuestionResponse {
    fn from(question: Question) -> Self {
        Self {
            id: question.question_id,
            paper_id: question.paper_id,
            title: question.title.to_string(),
            completed: question.completed,
            created_at: question.created_at,
        }
    }
}

//! PostgreSQL Repository Implementation
//!
//! `questions.paper_id` references `papers` with `ON DELETE CASCADE`, so
//! deleting a paper removes its questions in the same statement.

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, PaperId, QuestionId};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{Paper, Question, QuestionChanges};
use crate::domain::repository::QuizRepository;
use crate::domain::value_objects::Title;
use crate::error::QuizResult;

#[derive(Clone)]
pub struct PgQuizRepository {
    pool: PgPool,
}

impl PgQuizRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl QuizRepository for PgQuizRepository {
    async fn list_papers(&self, owner: &AccountId) -> QuizResult<Vec<Paper>> {
        let rows = sqlx::query_as::<_, PaperRow>(
            r#"
            SELECT paper_id, account_id, title, created_at
            FROM papers
            WHERE account_id = $1
            ORDER BY created_at, paper_id
            "#,
        )
        .bind(owner.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PaperRow::into_paper).collect())
    }

    async fn find_paper(&self, owner: &AccountId, paper_id: &PaperId) -> QuizResult<Option<Paper>> {
        let row = sqlx::query_as::<_, PaperRow>(
            r#"
            SELECT paper_id, account_id, title, created_at
            FROM papers
            WHERE paper_id = $1 AND account_id = $2
            "#,
        )
        .bind(paper_id.as_uuid())
        .bind(owner.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PaperRow::into_paper))
    }

    async fn insert_paper(&self, paper: &Paper) -> QuizResult<()> {
        sqlx::query(
            r#"
            INSERT INTO papers (paper_id, account_id, title, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(paper.paper_id.as_uuid())
        .bind(paper.account_id.as_uuid())
        .bind(paper.title.as_str())
        .bind(paper.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn rename_paper(
        &self,
        owner: &AccountId,
        paper_id: &PaperId,
        title: &Title,
    ) -> QuizResult<Option<Paper>> {
        let row = sqlx::query_as::<_, PaperRow>(
            r#"
            UPDATE papers SET title = $3
            WHERE paper_id = $1 AND account_id = $2
            RETURNING paper_id, account_id, title, created_at
            "#,
        )
        .bind(paper_id.as_uuid())
        .bind(owner.as_uuid())
        .bind(title.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PaperRow::into_paper))
    }

    async fn delete_paper(&self, owner: &AccountId, paper_id: &PaperId) -> QuizResult<Option<Paper>> {
        let row = sqlx::query_as::<_, PaperRow>(
            r#"
            DELETE FROM papers
            WHERE paper_id = $1 AND account_id = $2
            RETURNING paper_id, account_id, title, created_at
            "#,
        )
        .bind(paper_id.as_uuid())
        .bind(owner.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PaperRow::into_paper))
    }

    async fn list_questions(&self, paper_id: &PaperId) -> QuizResult<Vec<Question>> {
        let rows = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT question_id, paper_id, title, completed, created_at
            FROM questions
            WHERE paper_id = $1
            ORDER BY created_at, question_id
            "#,
        )
        .bind(paper_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(QuestionRow::into_question).collect())
    }

    async fn find_question(
        &self,
        paper_id: &PaperId,
        question_id: &QuestionId,
    ) -> QuizResult<Option<Question>> {
        let row = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT question_id, paper_id, title, completed, created_at
            FROM questions
            WHERE question_id = $1 AND paper_id = $2
            "#,
        )
        .bind(question_id.as_uuid())
        .bind(paper_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(QuestionRow::into_question))
    }

    async fn insert_question(&self, question: &Question) -> QuizResult<()> {
        sqlx::query(
            r#"
            INSERT INTO questions (question_id, paper_id, title, completed, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(question.question_id.as_uuid())
        .bind(question.paper_id.as_uuid())
        .bind(question.title.as_str())
        .bind(question.completed)
        .bind(question.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_question(
        &self,
        paper_id: &PaperId,
        question_id: &QuestionId,
        changes: &QuestionChanges,
    ) -> QuizResult<Option<Question>> {
        let row = sqlx::query_as::<_, QuestionRow>(
            r#"
            UPDATE questions
            SET title = COALESCE($3, title),
                completed = COALESCE($4, completed)
            WHERE question_id = $1 AND paper_id = $2
            RETURNING question_id, paper_id, title, completed, created_at
            "#,
        )
        .bind(question_id.as_uuid())
        .bind(paper_id.as_uuid())
        .bind(changes.title.as_ref().map(Title::as_str))
        .bind(changes.completed)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(QuestionRow::into_question))
    }

    async fn delete_question(
        &self,
        paper_id: &PaperId,
        question_id: &QuestionId,
    ) -> QuizResult<Option<Question>> {
        let row = sqlx::query_as::<_, QuestionRow>(
            r#"
            DELETE FROM questions
            WHERE question_id = $1 AND paper_id = $2
            RETURNING question_id, paper_id, title, completed, created_at
            "#,
        )
        .bind(question_id.as_uuid())
        .bind(paper_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(QuestionRow::into_question))
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct PaperRow {
    paper_id: Uuid,
    account_id: Uuid,
    title: String,
    created_at: DateTime<Utc>,
}

impl PaperRow {
    fn into_paper(self) -> Paper {
        Paper {
            paper_id: PaperId::from_uuid(self.paper_id),
            account_id: AccountId::from_uuid(self.account_id),
            title: Title::from_db(self.title),
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct QuestionRow {
    question_id: Uuid,
    paper_id: Uuid,
    title: String,
    completed: bool,
    created_at: DateTime<Utc>,
}

impl QuestionRow {
    fn into_question(self) -> Question {
        Question {
            question_id: QuestionId::from_uuid(self.question_id),
            paper_id: PaperId::from_uuid(self.paper_id),
            title: Title::from_db(self.title),
            completed: self.completed,
            created_at: self.created_at,
        }
    }
}

//! Quiz Service
//!
//! Ownership-filtered paper and question operations. A paper that exists but
//! belongs to another account is reported as missing.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use auth::application::deadline::with_deadline;
use kernel::id::{AccountId, PaperId, QuestionId};

use crate::domain::entities::{Paper, Question, QuestionChanges};
use crate::domain::repository::QuizRepository;
use crate::domain::value_objects::Title;
use crate::error::{QuizError, QuizResult};

pub struct QuizService<R>
where
    R: QuizRepository,
{
    repo: Arc<R>,
    store_timeout: Duration,
}

impl<R> QuizService<R>
where
    R: QuizRepository,
{
    pub fn new(repo: Arc<R>, store_timeout: Duration) -> Self {
        Self {
            repo,
            store_timeout,
        }
    }

    async fn deadline<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = QuizResult<T>>,
    ) -> QuizResult<T> {
        with_deadline(self.store_timeout, operation, fut).await
    }

    async fn owned_paper(&self, owner: &AccountId, paper_id: &PaperId) -> QuizResult<Paper> {
        self.deadline("find_paper", self.repo.find_paper(owner, paper_id))
            .await?
            .ok_or(QuizError::PaperNotFound)
    }

    // ========================================================================
    // Papers
    // ========================================================================

    pub async fn list_papers(&self, owner: &AccountId) -> QuizResult<Vec<Paper>> {
        self.deadline("list_papers", self.repo.list_papers(owner)).await
    }

    pub async fn create_paper(&self, owner: &AccountId, title: &str) -> QuizResult<Paper> {
        let paper = Paper::new(*owner, Title::new(title)?);
        self.deadline("insert_paper", self.repo.insert_paper(&paper)).await?;

        tracing::info!(account_id = %owner, paper_id = %paper.paper_id, "Paper created");
        Ok(paper)
    }

    pub async fn rename_paper(
        &self,
        owner: &AccountId,
        paper_id: &PaperId,
        title: &str,
    ) -> QuizResult<Paper> {
        let title = Title::new(title)?;
        self.deadline("rename_paper", self.repo.rename_paper(owner, paper_id, &title))
            .await?
            .ok_or(QuizError::PaperNotFound)
    }

    pub async fn delete_paper(&self, owner: &AccountId, paper_id: &PaperId) -> QuizResult<Paper> {
        let paper = self
            .deadline("delete_paper", self.repo.delete_paper(owner, paper_id))
            .await?
            .ok_or(QuizError::PaperNotFound)?;

        tracing::info!(account_id = %owner, paper_id = %paper_id, "Paper deleted");
        Ok(paper)
    }

    // ========================================================================
    // Questions
    // ========================================================================

    pub async fn list_questions(
        &self,
        owner: &AccountId,
        paper_id: &PaperId,
    ) -> QuizResult<Vec<Question>> {
        self.owned_paper(owner, paper_id).await?;
        self.deadline("list_questions", self.repo.list_questions(paper_id)).await
    }

    pub async fn get_question(
        &self,
        owner: &AccountId,
        paper_id: &PaperId,
        question_id: &QuestionId,
    ) -> QuizResult<Question> {
        self.owned_paper(owner, paper_id).await?;
        self.deadline("find_question", self.repo.find_question(paper_id, question_id))
            .await?
            .ok_or(QuizError::QuestionNotFound)
    }

    pub async fn create_question(
        &self,
        owner: &AccountId,
        paper_id: &PaperId,
        title: &str,
    ) -> QuizResult<Question> {
        let title = Title::new(title)?;
        self.owned_paper(owner, paper_id).await?;

        let question = Question::new(*paper_id, title);
        self.deadline("insert_question", self.repo.insert_question(&question)).await?;
        Ok(question)
    }

    pub async fn update_question(
        &self,
        owner: &AccountId,
        paper_id: &PaperId,
        question_id: &QuestionId,
        changes: QuestionChanges,
    ) -> QuizResult<Question> {
        self.owned_paper(owner, paper_id).await?;

        if changes.is_empty() {
            return self.get_question(owner, paper_id, question_id).await;
        }

        self.deadline("update_question", self.repo.update_question(paper_id, question_id, &changes))
            .await?
            .ok_or(QuizError::QuestionNotFound)
    }

    pub async fn delete_question(
        &self,
        owner: &AccountId,
        paper_id: &PaperId,
        question_id: &QuestionId,
    ) -> QuizResult<Question> {
        self.owned_paper(owner, paper_id).await?;
        self.deadline("delete_question", self.repo.delete_question(paper_id, question_id))
            .await?
            .ok_or(QuizError::QuestionNotFound)
    }
}

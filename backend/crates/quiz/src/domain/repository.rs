//! Repository Traits
//!
//! Every paper query is scoped to its owner. Question queries are scoped to
//! a paper whose ownership the caller has already established.

use kernel::id::{AccountId, PaperId, QuestionId};

use crate::domain::entities::{Paper, Question, QuestionChanges};
use crate::domain::value_objects::Title;
use crate::error::QuizResult;

#[trait_variant::make(QuizRepository: Send)]
pub trait LocalQuizRepository {
    /// Papers owned by `owner`, oldest first
    async fn list_papers(&self, owner: &AccountId) -> QuizResult<Vec<Paper>>;

    async fn find_paper(&self, owner: &AccountId, paper_id: &PaperId) -> QuizResult<Option<Paper>>;

    async fn insert_paper(&self, paper: &Paper) -> QuizResult<()>;

    /// `None` if the paper does not exist or is not owned by `owner`
    async fn rename_paper(
        &self,
        owner: &AccountId,
        paper_id: &PaperId,
        title: &Title,
    ) -> QuizResult<Option<Paper>>;

    /// Removes the paper and its questions
    async fn delete_paper(&self, owner: &AccountId, paper_id: &PaperId) -> QuizResult<Option<Paper>>;

    /// Questions in a paper, oldest first
    async fn list_questions(&self, paper_id: &PaperId) -> QuizResult<Vec<Question>>;

    async fn find_question(
        &self,
        paper_id: &PaperId,
        question_id: &QuestionId,
    ) -> QuizResult<Option<Question>>;

    async fn insert_question(&self, question: &Question) -> QuizResult<()>;

    async fn update_question(
        &self,
        paper_id: &PaperId,
        question_id: &QuestionId,
        changes: &QuestionChanges,
    ) -> QuizResult<Option<Question>>;

    async fn delete_question(
        &self,
        paper_id: &PaperId,
        question_id: &QuestionId,
    ) -> QuizResult<Option<Question>>;
}

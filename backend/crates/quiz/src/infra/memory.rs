//! In-Memory Repository Implementation

use std::sync::Arc;

use kernel::id::{AccountId, PaperId, QuestionId};
use tokio::sync::Mutex;

use crate::domain::entities::{Paper, Question, QuestionChanges};
use crate::domain::repository::QuizRepository;
use crate::domain::value_objects::Title;
use crate::error::QuizResult;

#[derive(Debug, Default)]
struct InnerState {
    /// Insertion order doubles as creation order
    papers: Vec<Paper>,
    questions: Vec<Question>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryQuizRepository {
    state: Arc<Mutex<InnerState>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn question_count(&self) -> usize {
        self.state.lock().await.questions.len()
    }
}

impl QuizRepository for InMemoryQuizRepository {
    async fn list_papers(&self, owner: &AccountId) -> QuizResult<Vec<Paper>> {
        let state = self.state.lock().await;
        Ok(state
            .papers
            .iter()
            .filter(|p| p.account_id == *owner)
            .cloned()
            .collect())
    }

    async fn find_paper(&self, owner: &AccountId, paper_id: &PaperId) -> QuizResult<Option<Paper>> {
        let state = self.state.lock().await;
        Ok(state
            .papers
            .iter()
            .find(|p| p.paper_id == *paper_id && p.account_id == *owner)
            .cloned())
    }

    async fn insert_paper(&self, paper: &Paper) -> QuizResult<()> {
        self.state.lock().await.papers.push(paper.clone());
        Ok(())
    }

    async fn rename_paper(
        &self,
        owner: &AccountId,
        paper_id: &PaperId,
        title: &Title,
    ) -> QuizResult<Option<Paper>> {
        let mut state = self.state.lock().await;
        Ok(state
            .papers
            .iter_mut()
            .find(|p| p.paper_id == *paper_id && p.account_id == *owner)
            .map(|p| {
                p.title = title.clone();
                p.clone()
            }))
    }

    async fn delete_paper(&self, owner: &AccountId, paper_id: &PaperId) -> QuizResult<Option<Paper>> {
        let mut state = self.state.lock().await;
        let Some(index) = state
            .papers
            .iter()
            .position(|p| p.paper_id == *paper_id && p.account_id == *owner)
        else {
            return Ok(None);
        };

        let paper = state.papers.remove(index);
        state.questions.retain(|q| q.paper_id != *paper_id);
        Ok(Some(paper))
    }

    async fn list_questions(&self, paper_id: &PaperId) -> QuizResult<Vec<Question>> {
        let state = self.state.lock().await;
        Ok(state
            .questions
            .iter()
            .filter(|q| q.paper_id == *paper_id)
            .cloned()
            .collect())
    }

    async fn find_question(
        &self,
        paper_id: &PaperId,
        question_id: &QuestionId,
    ) -> QuizResult<Option<Question>> {
        let state = self.state.lock().await;
        Ok(state
            .questions
            .iter()
            .find(|q| q.question_id == *question_id && q.paper_id == *paper_id)
            .cloned())
    }

    async fn insert_question(&self, question: &Question) -> QuizResult<()> {
        self.state.lock().await.questions.push(question.clone());
        Ok(())
    }

    async fn update_question(
        &self,
        paper_id: &PaperId,
        question_id: &QuestionId,
        changes: &QuestionChanges,
    ) -> QuizResult<Option<Question>> {
        let mut state = self.state.lock().await;
        Ok(state
            .questions
            .iter_mut()
            .find(|q| q.question_id == *question_id && q.paper_id == *paper_id)
            .map(|q| {
                q.apply(changes);
                q.clone()
            }))
    }

    async fn delete_question(
        &self,
        paper_id: &PaperId,
        question_id: &QuestionId,
    ) -> QuizResult<Option<Question>> {
        let mut state = self.state.lock().await;
        let index = state
            .questions
            .iter()
            .position(|q| q.question_id == *question_id && q.paper_id == *paper_id);
        Ok(index.map(|i| state.questions.remove(i)))
    }
}

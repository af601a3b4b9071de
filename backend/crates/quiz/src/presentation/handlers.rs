//! HTTP Handlers
//!
//! Every handler runs behind `access_auth` and acts as the account it
//! attached.

use std::sync::Arc;
use std::time::Duration;

use auth::middleware::AuthenticatedAccount;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use kernel::id::{PaperId, QuestionId};

use crate::application::QuizService;
use crate::domain::entities::QuestionChanges;
use crate::domain::repository::QuizRepository;
use crate::domain::value_objects::Title;
use crate::error::{QuizError, QuizResult};
use crate::presentation::dto::{PaperResponse, QuestionPatchRequest, QuestionResponse, TitleRequest};

/// Shared state for quiz handlers
#[derive(Clone)]
pub struct QuizAppState<R>
where
    R: QuizRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub store_timeout: Duration,
}

impl<R> QuizAppState<R>
where
    R: QuizRepository + Clone + Send + Sync + 'static,
{
    fn service(&self) -> QuizService<R> {
        QuizService::new(self.repo.clone(), self.store_timeout)
    }
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> QuizResult<T> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|e| QuizError::Validation(e.body_text()))
}

fn ids<T>(path: Result<Path<T>, PathRejection>) -> QuizResult<T> {
    path.map(|Path(inner)| inner)
        .map_err(|_| QuizError::Validation("Invalid identifier".to_string()))
}

// ============================================================================
// Papers
// ============================================================================

/// GET /papers
pub async fn list_papers<R>(
    State(state): State<QuizAppState<R>>,
    account: AuthenticatedAccount,
) -> QuizResult<Json<Vec<PaperResponse>>>
where
    R: QuizRepository + Clone + Send + Sync + 'static,
{
    let papers = state.service().list_papers(&account.account_id).await?;
    Ok(Json(papers.into_iter().map(PaperResponse::from).collect()))
}

/// POST /papers
pub async fn create_paper<R>(
    State(state): State<QuizAppState<R>>,
    account: AuthenticatedAccount,
    payload: Result<Json<TitleRequest>, JsonRejection>,
) -> QuizResult<(StatusCode, Json<PaperResponse>)>
where
    R: QuizRepository + Clone + Send + Sync + 'static,
{
    let req = body(payload)?;
    let paper = state
        .service()
        .create_paper(&account.account_id, &req.title)
        .await?;
    Ok((StatusCode::CREATED, Json(paper.into())))
}

/// PATCH /papers/{paper_id}
pub async fn rename_paper<R>(
    State(state): State<QuizAppState<R>>,
    account: AuthenticatedAccount,
    path: Result<Path<PaperId>, PathRejection>,
    payload: Result<Json<TitleRequest>, JsonRejection>,
) -> QuizResult<Json<PaperResponse>>
where
    R: QuizRepository + Clone + Send + Sync + 'static,
{
    let paper_id = ids(path)?;
    let req = body(payload)?;
    let paper = state
        .service()
        .rename_paper(&account.account_id, &paper_id, &req.title)
        .await?;
    Ok(Json(paper.into()))
}

/// DELETE /papers/{paper_id}
pub async fn delete_paper<R>(
    State(state): State<QuizAppState<R>>,
    account: AuthenticatedAccount,
    path: Result<Path<PaperId>, PathRejection>,
) -> QuizResult<Json<PaperResponse>>
where
    R: QuizRepository + Clone + Send + Sync + 'static,
{
    let paper_id = ids(path)?;
    let paper = state
        .service()
        .delete_paper(&account.account_id, &paper_id)
        .await?;
    Ok(Json(paper.into()))
}

// ============================================================================
// Questions
// ============================================================================

/// GET /papers/{paper_id}/questions
pub async fn list_questions<R>(
    State(state): State<QuizAppState<R>>,
    account: AuthenticatedAccount,
    path: Result<Path<PaperId>, PathRejection>,
) -> QuizResult<Json<Vec<QuestionResponse>>>
where
    R: QuizRepository + Clone + Send + Sync + 'static,
{
    let paper_id = ids(path)?;
    let questions = state
        .service()
        .list_questions(&account.account_id, &paper_id)
        .await?;
    Ok(Json(questions.into_iter().map(QuestionResponse::from).collect()))
}

/// POST /papers/{paper_id}/questions
pub async fn create_question<R>(
    State(state): State<QuizAppState<R>>,
    account: AuthenticatedAccount,
    path: Result<Path<PaperId>, PathRejection>,
    payload: Result<Json<TitleRequest>, JsonRejection>,
) -> QuizResult<(StatusCode, Json<QuestionResponse>)>
where
    R: QuizRepository + Clone + Send + Sync + 'static,
{
    let paper_id = ids(path)?;
    let req = body(payload)?;
    let question = state
        .service()
        .create_question(&account.account_id, &paper_id, &req.title)
        .await?;
    Ok((StatusCode::CREATED, Json(question.into())))
}

/// GET /papers/{paper_id}/questions/{question_id}
pub async fn get_question<R>(
    State(state): State<QuizAppState<R>>,
    account: AuthenticatedAccount,
    path: Result<Path<(PaperId, QuestionId)>, PathRejection>,
) -> QuizResult<Json<QuestionResponse>>
where
    R: QuizRepository + Clone + Send + Sync + 'static,
{
    let (paper_id, question_id) = ids(path)?;
    let question = state
        .service()
        .get_question(&account.account_id, &paper_id, &question_id)
        .await?;
    Ok(Json(question.into()))
}

/// PATCH /papers/{paper_id}/questions/{question_id}
pub async fn update_question<R>(
    State(state): State<QuizAppState<R>>,
    account: AuthenticatedAccount,
    path: Result<Path<(PaperId, QuestionId)>, PathRejection>,
    payload: Result<Json<QuestionPatchRequest>, JsonRejection>,
) -> QuizResult<Json<QuestionResponse>>
where
    R: QuizRepository + Clone + Send + Sync + 'static,
{
    let (paper_id, question_id) = ids(path)?;
    let req = body(payload)?;
    let changes = QuestionChanges {
        title: req.title.map(Title::new).transpose()?,
        completed: req.completed,
    };
    let question = state
        .service()
        .update_question(&account.account_id, &paper_id, &question_id, changes)
        .await?;
    Ok(Json(question.into()))
}

/// DELETE /papers/{paper_id}/questions/{question_id}
pub async fn delete_question<R>(
    State(state): State<QuizAppState<R>>,
    account: AuthenticatedAccount,
    path: Result<Path<(PaperId, QuestionId)>, PathRejection>,
) -> QuizResult<Json<QuestionResponse>>
where
    R: QuizRepository + Clone + Send + Sync + 'static,
{
    let (paper_id, question_id) = ids(path)?;
    let question = state
        .service()
        .delete_question(&account.account_id, &paper_id, &question_id)
        .await?;
    Ok(Json(question.into()))
}

//! Quiz Router

use std::sync::Arc;
use std::time::Duration;

use auth::middleware::{AccessAuthState, access_auth};
use axum::{
    Router, middleware,
    routing::{get, patch},
};

use crate::domain::repository::QuizRepository;
use crate::infra::postgres::PgQuizRepository;
use crate::presentation::handlers::{self, QuizAppState};

/// Create the quiz router with PostgreSQL repository
pub fn quiz_router(
    repo: PgQuizRepository,
    store_timeout: Duration,
    access: AccessAuthState,
) -> Router {
    quiz_router_generic(repo, store_timeout, access)
}

/// Create a generic quiz router for any repository implementation.
/// Every route requires a valid access token.
pub fn quiz_router_generic<R>(repo: R, store_timeout: Duration, access: AccessAuthState) -> Router
where
    R: QuizRepository + Clone + Send + Sync + 'static,
{
    let state = QuizAppState {
        repo: Arc::new(repo),
        store_timeout,
    };

    Router::new()
        .route(
            "/papers",
            get(handlers::list_papers::<R>).post(handlers::create_paper::<R>),
        )
        .route(
            "/papers/{paper_id}",
            patch(handlers::rename_paper::<R>).delete(handlers::delete_paper::<R>),
        )
        .route(
            "/papers/{paper_id}/questions",
            get(handlers::list_questions::<R>).post(handlers::create_question::<R>),
        )
        .route(
            "/papers/{paper_id}/questions/{question_id}",
            get(handlers::get_question::<R>)
                .patch(handlers::update_question::<R>)
                .delete(handlers::delete_question::<R>),
        )
        .route_layer(middleware::from_fn_with_state(access, access_auth))
        .with_state(state)
}

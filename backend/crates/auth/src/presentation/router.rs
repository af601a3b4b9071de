//! Auth Router

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::domain::repository::AccountRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::session_auth;

/// Create the account router for any repository implementation
///
/// Mount under `/accounts`. Build other guarded routers from the same
/// state via `AuthAppState::access_auth_state` so they share the codec.
pub fn account_router_generic<R>(state: AuthAppState<R>) -> Router
where
    R: AccountRepository + Clone + Send + Sync + 'static,
{
    let session_guarded = Router::new()
        .route("/me/access-token", get(handlers::renew_access_token::<R>))
        .route("/me/session", delete(handlers::revoke_session::<R>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_auth::<R>,
        ));

    Router::new()
        .route("/", post(handlers::sign_up::<R>))
        .route("/login", post(handlers::log_in::<R>))
        .merge(session_guarded)
        .with_state(state)
}

//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use auth::application::PurgeExpiredSessionsUseCase;
use auth::middleware::{ACCESS_TOKEN_HEADER, ACCOUNT_ID_HEADER, REFRESH_TOKEN_HEADER};
use auth::{AuthAppState, PgAccountRepository, account_router_generic};
use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    routing::get,
};
use quiz::{PgQuizRepository, quiz_router};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer, ExposeHeaders};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,quiz=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env()?;
    tracing::info!(auth = ?config.auth, port = config.port, "Configuration loaded");

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let auth_state = AuthAppState::new(PgAccountRepository::new(pool.clone()), config.auth.clone());

    // Startup cleanup: errors here should not prevent server startup
    let purge = PurgeExpiredSessionsUseCase::new(auth_state.repo.clone(), Arc::clone(&auth_state.config));
    match purge.execute().await {
        Ok(sessions) => {
            tracing::info!(sessions_deleted = sessions, "Expired session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Expired session cleanup failed, continuing anyway");
        }
    }

    // CORS configuration
    let allowed_origins: Vec<HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let token_headers = [
        HeaderName::from_static(ACCESS_TOKEN_HEADER),
        HeaderName::from_static(REFRESH_TOKEN_HEADER),
    ];

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(ACCESS_TOKEN_HEADER),
            HeaderName::from_static(REFRESH_TOKEN_HEADER),
            HeaderName::from_static(ACCOUNT_ID_HEADER),
        ]))
        .expose_headers(ExposeHeaders::list(token_headers));

    // Build router
    let quiz = quiz_router(
        PgQuizRepository::new(pool.clone()),
        config.auth.store_timeout,
        auth_state.access_auth_state(),
    );

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/accounts", account_router_generic(auth_state))
        .merge(quiz)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

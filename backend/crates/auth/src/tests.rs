//! Crate-level tests for the auth flows
//! Use cases and routers run against the in-memory repository.

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::routing::get;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::application::{
    AccessTokenCodec, AuthConfig, CheckSessionUseCase, PurgeExpiredSessionsUseCase, TokenIssuer,
};
use crate::domain::entity::HasSessions;
use crate::domain::repository::AccountRepository;
use crate::error::{AuthError, SessionMiss};
use crate::infra::InMemoryAccountRepository;
use crate::presentation::handlers::AuthAppState;
use crate::presentation::middleware::{
    ACCESS_TOKEN_HEADER, ACCOUNT_ID_HEADER, AuthenticatedAccount, REFRESH_TOKEN_HEADER,
    access_auth,
};
use crate::presentation::router::account_router_generic;

const EMAIL: &str = "student@example.com";
const PASSWORD: &str = "hunter12";

// ============================================================================
// Harness
// ============================================================================

struct TestApp {
    router: Router,
    state: AuthAppState<InMemoryAccountRepository>,
}

impl TestApp {
    fn new() -> Self {
        Self::with(InMemoryAccountRepository::new(), AuthConfig::with_random_secret())
    }

    fn with(repo: InMemoryAccountRepository, config: AuthConfig) -> Self {
        let state = AuthAppState::new(repo, config);

        // A stand-in resource guarded the way real resources are
        let protected = Router::new()
            .route(
                "/whoami",
                get(|account: AuthenticatedAccount| async move { account.account_id.to_string() }),
            )
            .layer(axum::middleware::from_fn_with_state(
                state.access_auth_state(),
                access_auth,
            ));

        let router = Router::new()
            .nest("/accounts", account_router_generic(state.clone()))
            .merge(protected);

        Self { router, state }
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::String(
                String::from_utf8_lossy(&bytes).into_owned(),
            ))
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> TestResponse {
        self.send(json_request("/accounts", json!({ "email": email, "password": password })))
            .await
    }

    async fn log_in(&self, email: &str, password: &str) -> TestResponse {
        self.send(json_request(
            "/accounts/login",
            json!({ "email": email, "password": password }),
        ))
        .await
    }

    async fn renew(&self, account_id: &str, refresh_token: &str) -> TestResponse {
        let req = Request::get("/accounts/me/access-token")
            .header(ACCOUNT_ID_HEADER, account_id)
            .header(REFRESH_TOKEN_HEADER, refresh_token)
            .body(Body::empty())
            .unwrap();
        self.send(req).await
    }

    async fn whoami(&self, access_token: Option<&str>) -> TestResponse {
        let mut req = Request::get("/whoami");
        if let Some(token) = access_token {
            req = req.header(ACCESS_TOKEN_HEADER, token);
        }
        self.send(req.body(Body::empty()).unwrap()).await
    }

    async fn stored_session_count(&self, account_id: &str) -> usize {
        self.state
            .repo
            .find_by_id(&account_id.parse().unwrap())
            .await
            .unwrap()
            .unwrap()
            .sessions()
            .len()
    }
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

impl TestResponse {
    fn header(&self, name: &str) -> String {
        self.headers
            .get(name)
            .unwrap_or_else(|| panic!("missing header {name}"))
            .to_str()
            .unwrap()
            .to_string()
    }

    fn account_id(&self) -> String {
        self.body["id"].as_str().unwrap().to_string()
    }

    fn code(&self) -> &str {
        self.body["code"].as_str().unwrap_or_default()
    }
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ============================================================================
// Sign up / log in
// ============================================================================

#[tokio::test]
async fn test_sign_up_returns_account_and_both_tokens() {
    let app = TestApp::new();
    let res = app.sign_up("  Student@Example.com ", PASSWORD).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["email"], EMAIL);
    assert!(res.body["createdAt"].is_string());
    assert!(res.body.get("password").is_none());
    assert!(res.body.get("secretHash").is_none());
    assert!(res.body.get("sessions").is_none());

    assert!(!res.header(ACCESS_TOKEN_HEADER).is_empty());
    assert_eq!(res.header(REFRESH_TOKEN_HEADER).len(), 43);
}

#[tokio::test]
async fn test_sign_up_refresh_token_is_immediately_usable() {
    let app = TestApp::new();
    let signed_up = app.sign_up(EMAIL, PASSWORD).await;

    let renewed = app
        .renew(&signed_up.account_id(), &signed_up.header(REFRESH_TOKEN_HEADER))
        .await;

    assert_eq!(renewed.status, StatusCode::OK);
    let access_token = renewed.body["accessToken"].as_str().unwrap();
    assert_eq!(renewed.header(ACCESS_TOKEN_HEADER), access_token);
    assert!(renewed.headers.get(REFRESH_TOKEN_HEADER).is_none());

    let me = app.whoami(Some(access_token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body, Value::String(signed_up.account_id()));
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let app = TestApp::new();
    assert_eq!(app.sign_up(EMAIL, PASSWORD).await.status, StatusCode::OK);

    let again = app.sign_up("STUDENT@example.com", "another-pass9").await;
    assert_eq!(again.status, StatusCode::BAD_REQUEST);
    assert_eq!(again.code(), "DUPLICATE_EMAIL");
}

#[tokio::test]
async fn test_sign_up_validation() {
    let app = TestApp::new();

    let bad_email = app.sign_up("not-an-email", PASSWORD).await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_email.code(), "VALIDATION_ERROR");

    let weak = app.sign_up(EMAIL, "short").await;
    assert_eq!(weak.status, StatusCode::BAD_REQUEST);
    assert_eq!(weak.code(), "VALIDATION_ERROR");

    let missing_field = app
        .send(json_request("/accounts", json!({ "email": EMAIL })))
        .await;
    assert_eq!(missing_field.status, StatusCode::BAD_REQUEST);

    assert_eq!(app.state.repo.account_count().await, 0);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_look_identical() {
    let app = TestApp::new();
    app.sign_up(EMAIL, PASSWORD).await;

    let wrong_password = app.log_in(EMAIL, "hunter13").await;
    let unknown_email = app.log_in("nobody@example.com", PASSWORD).await;

    assert_eq!(wrong_password.status, StatusCode::BAD_REQUEST);
    assert_eq!(wrong_password.status, unknown_email.status);
    assert_eq!(wrong_password.body, unknown_email.body);
    assert_eq!(wrong_password.code(), "INVALID_CREDENTIALS");
    assert!(wrong_password.headers.get(ACCESS_TOKEN_HEADER).is_none());
}

#[tokio::test]
async fn test_login_opens_additional_session() {
    let app = TestApp::new();
    let first = app.sign_up(EMAIL, PASSWORD).await;
    assert_eq!(app.stored_session_count(&first.account_id()).await, 1);

    let second = app.log_in(EMAIL, PASSWORD).await;
    assert_eq!(app.stored_session_count(&first.account_id()).await, 2);

    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.account_id(), first.account_id());
    assert_ne!(
        second.header(REFRESH_TOKEN_HEADER),
        first.header(REFRESH_TOKEN_HEADER)
    );

    for res in [&first, &second] {
        let renewed = app
            .renew(&res.account_id(), &res.header(REFRESH_TOKEN_HEADER))
            .await;
        assert_eq!(renewed.status, StatusCode::OK);
    }
}

// ============================================================================
// Session middleware
// ============================================================================

#[tokio::test]
async fn test_renewal_requires_both_headers() {
    let app = TestApp::new();
    let signed_up = app.sign_up(EMAIL, PASSWORD).await;

    let req = Request::get("/accounts/me/access-token")
        .header(REFRESH_TOKEN_HEADER, signed_up.header(REFRESH_TOKEN_HEADER))
        .body(Body::empty())
        .unwrap();
    let res = app.send(req).await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.code(), "MISSING_CREDENTIALS");
}

#[tokio::test]
async fn test_renewal_with_unknown_session() {
    let app = TestApp::new();
    let signed_up = app.sign_up(EMAIL, PASSWORD).await;
    let other = app.sign_up("other@example.com", PASSWORD).await;

    let wrong_token = app.renew(&signed_up.account_id(), "not-a-real-token").await;
    assert_eq!(wrong_token.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_token.code(), "SESSION_NOT_FOUND");

    // A valid token presented under someone else's id
    let crossed = app
        .renew(&other.account_id(), &signed_up.header(REFRESH_TOKEN_HEADER))
        .await;
    assert_eq!(crossed.code(), "SESSION_NOT_FOUND");

    let bad_id = app
        .renew("not-a-uuid", &signed_up.header(REFRESH_TOKEN_HEADER))
        .await;
    assert_eq!(bad_id.status, StatusCode::UNAUTHORIZED);
    assert_eq!(bad_id.code(), "SESSION_NOT_FOUND");
}

#[tokio::test]
async fn test_expired_session_is_rejected() {
    let mut config = AuthConfig::with_random_secret();
    config.refresh_ttl = Duration::from_millis(1);
    let app = TestApp::with(InMemoryAccountRepository::new(), config);

    let signed_up = app.sign_up(EMAIL, PASSWORD).await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    let res = app
        .renew(&signed_up.account_id(), &signed_up.header(REFRESH_TOKEN_HEADER))
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.code(), "SESSION_EXPIRED");
}

#[tokio::test]
async fn test_revoke_session() {
    let app = TestApp::new();
    let first = app.sign_up(EMAIL, PASSWORD).await;
    let second = app.log_in(EMAIL, PASSWORD).await;
    let account_id = first.account_id();
    let revoked_token = first.header(REFRESH_TOKEN_HEADER);

    let req = Request::delete("/accounts/me/session")
        .header(ACCOUNT_ID_HEADER, &account_id)
        .header(REFRESH_TOKEN_HEADER, &revoked_token)
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.send(req).await.status, StatusCode::NO_CONTENT);

    let res = app.renew(&account_id, &revoked_token).await;
    assert_eq!(res.code(), "SESSION_NOT_FOUND");

    let still_signed_in = app
        .renew(&account_id, &second.header(REFRESH_TOKEN_HEADER))
        .await;
    assert_eq!(still_signed_in.status, StatusCode::OK);
}

#[tokio::test]
async fn test_session_cap_evicts_oldest() {
    let mut config = AuthConfig::with_random_secret();
    config.max_sessions = 3;
    let app = TestApp::with(InMemoryAccountRepository::new(), config);

    let first = app.sign_up(EMAIL, PASSWORD).await;
    let mut latest = Vec::new();
    for _ in 0..4 {
        latest.push(app.log_in(EMAIL, PASSWORD).await.header(REFRESH_TOKEN_HEADER));
    }

    let account_id = first.account_id();
    let evicted = app.renew(&account_id, &first.header(REFRESH_TOKEN_HEADER)).await;
    assert_eq!(evicted.code(), "SESSION_NOT_FOUND");

    for token in &latest[1..] {
        assert_eq!(app.renew(&account_id, token).await.status, StatusCode::OK);
    }

    let stored = app
        .state
        .repo
        .find_by_id(&account_id.parse().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.sessions().len(), 3);
}

// ============================================================================
// Access middleware
// ============================================================================

#[tokio::test]
async fn test_access_auth_rejections() {
    let app = TestApp::new();
    let signed_up = app.sign_up(EMAIL, PASSWORD).await;

    let missing = app.whoami(None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.code(), "MISSING_TOKEN");

    let garbage = app.whoami(Some("garbage")).await;
    assert_eq!(garbage.code(), "INVALID_OR_EXPIRED_TOKEN");

    // Refresh tokens are not access tokens
    let refresh = app.whoami(Some(&signed_up.header(REFRESH_TOKEN_HEADER))).await;
    assert_eq!(refresh.code(), "INVALID_OR_EXPIRED_TOKEN");

    let ok = app.whoami(Some(&signed_up.header(ACCESS_TOKEN_HEADER))).await;
    assert_eq!(ok.status, StatusCode::OK);
}

#[tokio::test]
async fn test_expired_and_forged_access_tokens_look_identical() {
    let app = TestApp::new();
    let signed_up = app.sign_up(EMAIL, PASSWORD).await;
    let account = app
        .state
        .repo
        .find_by_id(&signed_up.account_id().parse().unwrap())
        .await
        .unwrap()
        .unwrap();

    let expired = app
        .state
        .codec
        .issue_at(&account, chrono::Utc::now() - chrono::Duration::hours(1))
        .unwrap();
    let forged = AccessTokenCodec::new(&AuthConfig::with_random_secret())
        .issue(&account)
        .unwrap();

    let expired_res = app.whoami(Some(&expired)).await;
    let forged_res = app.whoami(Some(&forged)).await;

    assert_eq!(expired_res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(expired_res.body, forged_res.body);
}

// ============================================================================
// Use cases
// ============================================================================

#[tokio::test]
async fn test_concurrent_session_creation_all_persist() {
    let mut config = AuthConfig::with_random_secret();
    config.max_sessions = 100;
    let app = TestApp::with(InMemoryAccountRepository::new(), config);
    let signed_up = app.sign_up(EMAIL, PASSWORD).await;

    let repo = app.state.repo.clone();
    let account = repo
        .find_by_id(&signed_up.account_id().parse().unwrap())
        .await
        .unwrap()
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..20 {
        let issuer = TokenIssuer::new(
            repo.clone(),
            app.state.config.clone(),
            app.state.codec.clone(),
        );
        let account = account.clone();
        handles.push(tokio::spawn(async move {
            issuer.create_session(&account).await.unwrap()
        }));
    }

    let mut tokens = Vec::new();
    for handle in handles {
        tokens.push(handle.await.unwrap());
    }

    let stored = repo.find_by_id(&account.account_id).await.unwrap().unwrap();
    // The signup session plus one per concurrent call
    assert_eq!(stored.sessions().len(), 21);
    for token in &tokens {
        assert!(stored.sessions().iter().any(|s| s.token == *token));
    }
}

#[tokio::test]
async fn test_check_session_boundary() {
    let app = TestApp::new();
    let signed_up = app.sign_up(EMAIL, PASSWORD).await;
    let account_id = signed_up.account_id();
    let token = signed_up.header(REFRESH_TOKEN_HEADER);

    let stored = app
        .state
        .repo
        .find_by_id(&account_id.parse().unwrap())
        .await
        .unwrap()
        .unwrap();
    let expires_at = stored.sessions()[0].expires_at;

    let check = CheckSessionUseCase::new(app.state.repo.clone(), app.state.config.clone());
    let before = check
        .execute_at(&account_id, &token, expires_at - chrono::Duration::milliseconds(1))
        .await;
    assert!(before.is_ok());

    let at = check.execute_at(&account_id, &token, expires_at).await;
    assert!(matches!(at, Err(AuthError::SessionExpired)));
}

#[tokio::test]
async fn test_session_miss_reasons_stay_distinct() {
    let app = TestApp::new();
    let signed_up = app.sign_up(EMAIL, PASSWORD).await;
    let account_id = signed_up.account_id();
    let token = signed_up.header(REFRESH_TOKEN_HEADER);
    let check = CheckSessionUseCase::new(app.state.repo.clone(), app.state.config.clone());

    let malformed = check.execute("not-a-uuid", &token).await;
    assert!(matches!(
        malformed,
        Err(AuthError::SessionNotFound(SessionMiss::MalformedAccountId))
    ));

    let unknown = check
        .execute(&crate::domain::value_object::AccountId::new().to_string(), &token)
        .await;
    assert!(matches!(
        unknown,
        Err(AuthError::SessionNotFound(SessionMiss::UnknownAccount))
    ));

    let unmatched = check.execute(&account_id, "someone-elses-token").await;
    assert!(matches!(
        unmatched,
        Err(AuthError::SessionNotFound(SessionMiss::NoMatchingSession))
    ));

    // Callers still see one response for all three
    let bodies = [
        app.renew("not-a-uuid", &token).await.body,
        app.renew(&crate::domain::value_object::AccountId::new().to_string(), &token)
            .await
            .body,
        app.renew(&account_id, "someone-elses-token").await.body,
    ];
    assert!(bodies.iter().all(|b| b == &bodies[0]));
    assert_eq!(bodies[0]["code"], "SESSION_NOT_FOUND");
}

#[tokio::test]
async fn test_slow_store_is_unavailable_not_unauthorized() {
    let mut config = AuthConfig::with_random_secret();
    config.store_timeout = Duration::from_millis(20);
    let app = TestApp::with(
        InMemoryAccountRepository::with_latency(Duration::from_millis(500)),
        config,
    );

    let res = app.sign_up(EMAIL, PASSWORD).await;
    assert_eq!(res.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.code(), "STORE_UNAVAILABLE");
    assert_eq!(res.body["retryable"], true);

    let renew = app.renew(&crate::domain::value_object::AccountId::new().to_string(), "t").await;
    assert_eq!(renew.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_purge_expired_sessions() {
    let mut config = AuthConfig::with_random_secret();
    config.refresh_ttl = Duration::from_millis(1);
    let app = TestApp::with(InMemoryAccountRepository::new(), config);

    app.sign_up(EMAIL, PASSWORD).await;
    app.log_in(EMAIL, PASSWORD).await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    let purge = PurgeExpiredSessionsUseCase::new(app.state.repo.clone(), app.state.config.clone());
    assert_eq!(purge.execute().await.unwrap(), 2);
    assert_eq!(purge.execute().await.unwrap(), 0);
}

// ============================================================================
// End to end
// ============================================================================

#[tokio::test]
async fn test_signup_login_expiry_and_forgery_scenario() {
    let mut config = AuthConfig::with_random_secret();
    config.refresh_ttl = Duration::from_millis(300);
    let app = TestApp::with(InMemoryAccountRepository::new(), config);

    // Signup: both tokens work straight away
    let signed_up = app.sign_up(EMAIL, PASSWORD).await;
    assert_eq!(signed_up.status, StatusCode::OK);
    let account_id = signed_up.account_id();
    assert_eq!(
        app.whoami(Some(&signed_up.header(ACCESS_TOKEN_HEADER))).await.status,
        StatusCode::OK
    );

    // Login on a second device
    let logged_in = app.log_in(EMAIL, PASSWORD).await;
    let renewed = app
        .renew(&account_id, &logged_in.header(REFRESH_TOKEN_HEADER))
        .await;
    assert_eq!(renewed.status, StatusCode::OK);

    // Both sessions lapse
    tokio::time::sleep(Duration::from_millis(350)).await;
    let lapsed = app
        .renew(&account_id, &logged_in.header(REFRESH_TOKEN_HEADER))
        .await;
    assert_eq!(lapsed.code(), "SESSION_EXPIRED");

    // A token signed with another secret never passes
    let account = app
        .state
        .repo
        .find_by_id(&account_id.parse().unwrap())
        .await
        .unwrap()
        .unwrap();
    let forged = AccessTokenCodec::new(&AuthConfig::with_random_secret())
        .issue(&account)
        .unwrap();
    let res = app.whoami(Some(&forged)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.code(), "INVALID_OR_EXPIRED_TOKEN");

    // Logging in again starts over
    let again = app.log_in(EMAIL, PASSWORD).await;
    assert_eq!(
        app.renew(&account_id, &again.header(REFRESH_TOKEN_HEADER))
            .await
            .status,
        StatusCode::OK
    );
}

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use troublemaker_api::auth::jwt::{generate_access_token, JwtConfig};
use troublemaker_api::auth::password::hash_password;
use troublemaker_api::config::ServerConfig;
use troublemaker_api::routes;
use troublemaker_api::state::AppState;
use troublemaker_core::roles::{ROLE_ENCADRANT, ROLE_ETUDIANT};
use troublemaker_core::types::DbId;
use troublemaker_db::models::user::{CreateUser, User};
use troublemaker_db::repositories::UserRepo;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        gemini_api_key: None,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let state = AppState {
        pool,
        config: Arc::new(config),
        http: reqwest::Client::new(),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:3000".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Issue a GET request, optionally with a Bearer token.
pub async fn get(app: Router, path: &str, token: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(path);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Issue a JSON request with the given method, optionally with a Bearer token.
pub async fn send_json(
    app: Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Shorthand for POSTing JSON.
pub async fn post_json(
    app: Router,
    path: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    send_json(app, Method::POST, path, token, body).await
}

/// Read the full response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// Create an encadrant account with the given password.
pub async fn seed_encadrant(pool: &PgPool, email: &str, password: &str) -> User {
    let input = CreateUser {
        username: email.split('@').next().unwrap().to_string(),
        email: email.to_string(),
        password_hash: Some(hash_password(password).unwrap()),
        first_name: None,
        last_name: None,
        role: ROLE_ENCADRANT.to_string(),
    };
    UserRepo::create(pool, &input).await.unwrap()
}

/// Create a student account (no password).
pub async fn seed_etudiant(pool: &PgPool, email: &str) -> User {
    let input = CreateUser {
        username: email.split('@').next().unwrap().to_string(),
        email: email.to_string(),
        password_hash: None,
        first_name: None,
        last_name: None,
        role: ROLE_ETUDIANT.to_string(),
    };
    UserRepo::create(pool, &input).await.unwrap()
}

/// Mint an access token for a seeded user, matching [`test_config`]'s JWT
/// settings.
pub fn token_for(user_id: DbId, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt).unwrap()
}

use std::fmt::Write as _;
use std::sync::LazyLock;

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

const ANONYMOUS_SESSION: &str = "anonymous";
const PUBLIC_PATHS: [&str; 2] = ["/healthz", "/api/v1/auth/login"];

const MOCK_USER_ID: &str = "1";
const MOCK_USER_NAME: &str = "John Doe";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Opaque session identity taken from the bearer token. It only decides
/// which timesheet collection a request sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session(pub String);

impl Session {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest {
    email: String,
    password: String,
    #[serde(default)]
    remember_me: bool,
}

#[derive(Debug, Serialize)]
struct UserResponse {
    id: &'static str,
    name: &'static str,
    email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    user: UserResponse,
    access_token: String,
    refresh_token: String,
}

/// Mock credential check: any well-formed email with a non-empty password
/// signs in as the demo user.
async fn login(Json(payload): Json<LoginRequest>) -> AppResult<Json<LoginResponse>> {
    let email = payload.email.trim().to_ascii_lowercase();
    if !EMAIL_PATTERN.is_match(&email) {
        return Err(AppError::BadRequest("invalid email address".to_string()));
    }

    if payload.password.is_empty() {
        return Err(AppError::BadRequest("password is required".to_string()));
    }

    tracing::info!(remember_me = payload.remember_me, "mock login accepted");

    Ok(Json(LoginResponse {
        access_token: access_token_for(&email),
        refresh_token: format!("mock_refresh_token_{}", Utc::now().timestamp_millis()),
        user: UserResponse {
            id: MOCK_USER_ID,
            name: MOCK_USER_NAME,
            email,
        },
    }))
}

/// Stable per email, so signing in again reopens the same session.
fn access_token_for(email: &str) -> String {
    let digest = Sha256::digest(email.as_bytes());
    let mut token = String::from("mock_access_token_");
    for byte in digest.iter().take(12) {
        let _ = write!(&mut token, "{byte:02x}");
    }
    token
}

pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request<axum::body::Body>,
    next: Next,
) -> AppResult<Response> {
    if PUBLIC_PATHS.contains(&request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let provided = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_bearer_token)
        .map(ToOwned::to_owned);

    let session = match provided {
        Some(token) => Session(token),
        None if state.config.allow_anonymous => Session(ANONYMOUS_SESSION.to_string()),
        None => return Err(AppError::Unauthorized),
    };

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

fn parse_bearer_token(value: &str) -> Option<&str> {
    let mut parts = value.splitn(2, ' ');
    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    if token.is_empty() {
        return None;
    }

    Some(token)
}

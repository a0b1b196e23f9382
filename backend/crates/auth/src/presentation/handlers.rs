//! HTTP Handlers
//!
//! Register and login run behind the credential validator (see
//! `presentation::validator`) and read its results from request extensions.

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use platform::cookie::extract_cookie;

use crate::application::config::AuthConfig;
use crate::application::{
    CheckSessionUseCase, LoginInput, LoginUseCase, LogoutUseCase, RegisterInput, RegisterUseCase,
};
use crate::domain::repository::GatewayRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{
    MessageResponse, RegisterResponse, SessionStatusResponse, UserSummary,
};
use crate::presentation::middleware::CurrentSession;
use crate::presentation::validator::{Credentials, FoundUser, ValidPassword};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: GatewayRepository,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthAppState<R>
where
    R: GatewayRepository,
{
    pub fn new(repo: R, config: AuthConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
        }
    }

    fn session_cookie(&self, headers: &HeaderMap) -> Option<String> {
        extract_cookie(headers, &self.config.session_cookie_name)
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Extension(credentials): Extension<Credentials>,
    Extension(ValidPassword(password)): Extension<ValidPassword>,
) -> AuthResult<(StatusCode, Json<RegisterResponse>)>
where
    R: GatewayRepository,
{
    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    let user = use_case
        .execute(RegisterInput {
            username: credentials.username,
            password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse::from(user))))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    Extension(FoundUser(user)): Extension<FoundUser>,
    Extension(ValidPassword(password)): Extension<ValidPassword>,
) -> AuthResult<impl IntoResponse>
where
    R: GatewayRepository,
{
    let use_case = LoginUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(LoginInput {
            user,
            password,
            current_token: state.session_cookie(&headers),
        })
        .await?;

    let cookie = state
        .config
        .cookie_config()
        .build_set_cookie(&output.session_token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse::new(format!(
            "Welcome {}!",
            output.session.username
        ))),
    ))
}

// ============================================================================
// Logout
// ============================================================================

/// GET /api/auth/logout
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Response>
where
    R: GatewayRepository,
{
    let token = state.session_cookie(&headers);

    let use_case = LogoutUseCase::new(state.repo.clone(), state.config.clone());
    let outcome = use_case.execute(token.as_deref()).await?;

    let body = Json(MessageResponse::new(outcome.message()));

    // Clear whatever cookie the client sent, live or stale
    if token.is_some() {
        let cookie = state.config.cookie_config().build_delete_cookie();
        return Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], body).into_response());
    }

    Ok((StatusCode::OK, body).into_response())
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/auth/session
pub async fn session_status<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Json<SessionStatusResponse>>
where
    R: GatewayRepository,
{
    let Some(token) = state.session_cookie(&headers) else {
        return Ok(Json(SessionStatusResponse::anonymous()));
    };

    let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());

    match use_case.current(&token).await? {
        Some(session) => Ok(Json(SessionStatusResponse {
            authenticated: true,
            id: Some(session.user_id),
            username: Some(session.username),
            expires_at_ms: Some(session.expires_at_ms),
        })),
        None => Ok(Json(SessionStatusResponse::anonymous())),
    }
}

// ============================================================================
// Users (requires session)
// ============================================================================

/// GET /api/users
pub async fn list_users<R>(
    State(state): State<AuthAppState<R>>,
    Extension(CurrentSession(session)): Extension<CurrentSession>,
) -> AuthResult<Json<Vec<UserSummary>>>
where
    R: GatewayRepository,
{
    let users = state.repo.list().await?;

    tracing::debug!(
        user_id = %session.user_id,
        count = users.len(),
        "Listed users"
    );

    Ok(Json(users.into_iter().map(UserSummary::from).collect()))
}

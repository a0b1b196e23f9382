//! Auth Middleware
//!
//! Middleware for requiring authentication on restricted routes.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::application::CheckSessionUseCase;
use crate::domain::entity::auth_session::AuthSession;
use crate::domain::repository::GatewayRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::handlers::AuthAppState;

/// Live session of the caller, stored in request extensions
#[derive(Debug, Clone)]
pub struct CurrentSession(pub AuthSession);

/// Middleware that requires a valid auth session
pub async fn require_session<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request,
    next: Next,
) -> AuthResult<Response>
where
    R: GatewayRepository,
{
    let token = platform::cookie::extract_cookie(req.headers(), &state.config.session_cookie_name)
        .ok_or(AuthError::SessionRequired)?;

    let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());

    let session = use_case
        .current(&token)
        .await?
        .ok_or(AuthError::SessionRequired)?;

    req.extensions_mut().insert(CurrentSession(session));

    Ok(next.run(req).await)
}

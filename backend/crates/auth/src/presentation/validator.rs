//! Credential Validator
//!
//! Middleware that checks register/login preconditions before the handler
//! runs. Each stage either calls `next` or answers with an error, never both.
//!
//! Stages hand their results to later stages through request extensions:
//! - [`read_credentials`] inserts [`Credentials`]
//! - [`check_username_exists`] inserts [`FoundUser`]
//! - [`check_password_length`] inserts [`ValidPassword`]

use axum::Json;
use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use zeroize::Zeroizing;

use crate::domain::entity::user::User;
use crate::domain::repository::GatewayRepository;
use crate::domain::value_object::{user_password::RawPassword, username::Username};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::CredentialsRequest;
use crate::presentation::handlers::AuthAppState;

/// Credentials bodies are tiny; anything bigger is not a credentials body
const MAX_CREDENTIALS_BODY_BYTES: usize = 16 * 1024;

/// Parsed request body
#[derive(Clone)]
pub struct Credentials {
    pub username: Username,
    /// Emptied once [`check_password_length`] has taken it
    pub password: Zeroizing<String>,
}

/// User resolved by [`check_username_exists`]
#[derive(Clone)]
pub struct FoundUser(pub User);

/// Password that passed the length policy
#[derive(Clone)]
pub struct ValidPassword(pub RawPassword);

/// Buffer the JSON body into [`Credentials`]
pub async fn read_credentials(req: Request, next: Next) -> AuthResult<Response> {
    let (parts, body) = req.into_parts();

    let bytes = to_bytes(body, MAX_CREDENTIALS_BODY_BYTES)
        .await
        .map_err(|_| AuthError::MissingCredentials)?;
    let Json(body) = Json::<CredentialsRequest>::from_bytes(&bytes)?;

    let credentials = Credentials {
        username: Username::new(body.username)?,
        password: Zeroizing::new(body.password),
    };

    let mut req = Request::from_parts(parts, Body::empty());
    req.extensions_mut().insert(credentials);

    Ok(next.run(req).await)
}

/// Halt with 422 if the username is already registered
pub async fn check_username_free<R>(
    State(state): State<AuthAppState<R>>,
    req: Request,
    next: Next,
) -> AuthResult<Response>
where
    R: GatewayRepository,
{
    let username = credentials(&req)?.username.clone();

    if state.repo.find_by_username(&username).await?.is_some() {
        tracing::debug!(username = %username, "Register with taken username");
        return Err(AuthError::UsernameTaken);
    }

    Ok(next.run(req).await)
}

/// Halt with 401 if the username is unknown, else attach the user
pub async fn check_username_exists<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request,
    next: Next,
) -> AuthResult<Response>
where
    R: GatewayRepository,
{
    let username = credentials(&req)?.username.clone();

    let Some(user) = state.repo.find_by_username(&username).await? else {
        tracing::debug!(username = %username, "Login with unknown username");
        return Err(AuthError::InvalidCredentials);
    };

    req.extensions_mut().insert(FoundUser(user));

    Ok(next.run(req).await)
}

/// Halt with 422 unless the password is longer than 3 characters
pub async fn check_password_length(mut req: Request, next: Next) -> AuthResult<Response> {
    let credentials = req
        .extensions_mut()
        .get_mut::<Credentials>()
        .ok_or_else(missing_stage)?;

    let password = RawPassword::new(std::mem::take(&mut *credentials.password))?;
    req.extensions_mut().insert(ValidPassword(password));

    Ok(next.run(req).await)
}

fn credentials(req: &Request) -> AuthResult<&Credentials> {
    req.extensions().get::<Credentials>().ok_or_else(missing_stage)
}

fn missing_stage() -> AuthError {
    AuthError::Internal("read_credentials must run before this validator".to_string())
}

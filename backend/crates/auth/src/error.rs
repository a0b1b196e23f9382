//! Auth Error Types
//!
//! This module provides gateway-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::{PasswordHashError, PasswordPolicyError};
use thiserror::Error;

use crate::domain::value_object::username::UsernameError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
///
/// The `Display` text of each variant is exactly the `message` the client
/// receives.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Body is not JSON, lacks a field, or has a blank username
    #[error("username and password are required")]
    MissingCredentials,

    /// Username already exists
    #[error("Username taken")]
    UsernameTaken,

    /// Unknown username or wrong password (deliberately indistinguishable)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Password policy violation
    #[error(transparent)]
    PasswordPolicy(#[from] PasswordPolicyError),

    /// Restricted route without a live session
    #[error("You shall not pass!")]
    SessionRequired,

    /// Session store refused to destroy the session
    #[error("Can't log out")]
    LogoutFailed(#[source] Box<AuthError>),

    /// Database error
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing error
    #[error("{0}")]
    Hashing(#[from] PasswordHashError),

    /// Internal error
    #[error("{0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MissingCredentials => ErrorKind::BadRequest,
            AuthError::UsernameTaken | AuthError::PasswordPolicy(_) => {
                ErrorKind::UnprocessableEntity
            }
            AuthError::InvalidCredentials | AuthError::SessionRequired => ErrorKind::Unauthorized,
            AuthError::LogoutFailed(_)
            | AuthError::Database(_)
            | AuthError::Hashing(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn into_app_error(self) -> AppError {
        match self {
            AuthError::Database(e) => AppError::from(e),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Hashing(e) => {
                tracing::error!(error = %e, "Password hashing error");
            }
            AuthError::LogoutFailed(e) => {
                tracing::error!(error = %e, "Session destroy failed");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "Unreadable credentials body");
        AuthError::MissingCredentials
    }
}

impl From<UsernameError> for AuthError {
    fn from(_: UsernameError) -> Self {
        AuthError::MissingCredentials
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

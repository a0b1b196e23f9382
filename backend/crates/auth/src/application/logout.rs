//! Logout Use Case

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::repository::SessionRepository;
use crate::error::{AuthError, AuthResult};

/// What logout found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// A live session was destroyed
    LoggedOut,
    /// The request carried no live session
    NoSession,
}

impl LogoutOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            LogoutOutcome::LoggedOut => "logged out",
            LogoutOutcome::NoSession => "No session",
        }
    }
}

/// Logout use case
pub struct LogoutUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> LogoutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// Destroy the session behind `token`
    ///
    /// Store failures surface as `AuthError::LogoutFailed`.
    pub async fn execute(&self, token: Option<&str>) -> AuthResult<LogoutOutcome> {
        let Some(session_id) =
            token.and_then(|t| session_token::parse(&self.config.session_secret, t))
        else {
            return Ok(LogoutOutcome::NoSession);
        };

        let session = self
            .session_repo
            .find(session_id)
            .await
            .map_err(|e| AuthError::LogoutFailed(Box::new(e)))?;

        let Some(session) = session else {
            return Ok(LogoutOutcome::NoSession);
        };

        self.session_repo
            .destroy(session_id)
            .await
            .map_err(|e| AuthError::LogoutFailed(Box::new(e)))?;

        if session.is_expired() {
            return Ok(LogoutOutcome::NoSession);
        }

        tracing::info!(
            user_id = %session.user_id,
            session_id = %session_id,
            "User logged out"
        );

        Ok(LogoutOutcome::LoggedOut)
    }
}

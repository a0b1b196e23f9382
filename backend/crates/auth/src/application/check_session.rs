//! Check Session Use Case
//!
//! Resolves a session cookie to a live session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::entity::auth_session::AuthSession;
use crate::domain::repository::SessionRepository;
use crate::error::AuthResult;

/// Check session use case
pub struct CheckSessionUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> CheckSessionUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    /// The live session behind `token`, if any
    ///
    /// Bad signatures, unknown ids and expired sessions all yield `None`.
    /// Expired sessions are removed on sight.
    pub async fn current(&self, token: &str) -> AuthResult<Option<AuthSession>> {
        let Some(session_id) = session_token::parse(&self.config.session_secret, token) else {
            tracing::debug!("Session cookie failed verification");
            return Ok(None);
        };

        let Some(session) = self.session_repo.find(session_id).await? else {
            return Ok(None);
        };

        if session.is_expired() {
            if let Err(e) = self.session_repo.destroy(session_id).await {
                tracing::warn!(session_id = %session_id, error = %e, "Failed to remove expired session");
            }
            return Ok(None);
        }

        Ok(Some(session))
    }
}

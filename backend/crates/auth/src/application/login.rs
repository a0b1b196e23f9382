//! Login Use Case
//!
//! Verifies the password of an already-resolved user and opens a session.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token;
use crate::domain::entity::{auth_session::AuthSession, user::User};
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::user_password::RawPassword;
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    /// User found by the credential validator
    pub user: User,
    pub password: RawPassword,
    /// Session cookie the client already holds, if any
    pub current_token: Option<String>,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    pub session: AuthSession,
    /// Signed cookie value
    pub session_token: String,
}

/// Login use case
pub struct LoginUseCase<S>
where
    S: SessionRepository,
{
    session_repo: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> LoginUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_repo,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let LoginInput {
            user,
            password,
            current_token,
        } = input;

        if !user
            .password_hash
            .verify(&password, self.config.pepper())
            .await?
        {
            tracing::warn!(username = %user.username, "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        // Rotate: a fresh login never reuses the previous session id
        if let Some(old_id) = current_token
            .as_deref()
            .and_then(|token| session_token::parse(&self.config.session_secret, token))
        {
            if let Err(e) = self.session_repo.destroy(old_id).await {
                tracing::warn!(session_id = %old_id, error = %e, "Failed to destroy previous session");
            }
        }

        let session = AuthSession::new(&user, self.config.session_ttl_chrono()?);
        self.session_repo.create(&session).await?;

        let session_token = session_token::issue(&self.config.session_secret, session.session_id);

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            session_id = %session.session_id,
            "User logged in"
        );

        Ok(LoginOutput {
            session,
            session_token,
        })
    }
}

//! Register Use Case
//!
//! Creates a new user account. Preconditions (username free, password long
//! enough) are checked by the credential validator before this runs; the
//! store still enforces uniqueness on insert.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    user_password::{RawPassword, UserPassword},
    username::Username,
};
use crate::error::AuthResult;

/// Register input
pub struct RegisterInput {
    pub username: Username,
    pub password: RawPassword,
}

/// Register use case
pub struct RegisterUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> RegisterUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<User> {
        let password_hash = UserPassword::hash(&input.password, self.config.pepper()).await?;

        let user = self
            .user_repo
            .add(&NewUser::new(input.username, password_hash))
            .await?;

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            "User registered"
        );

        Ok(user)
    }
}

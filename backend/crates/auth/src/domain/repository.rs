//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infrastructure layer.

use uuid::Uuid;

use crate::domain::entity::{
    auth_session::AuthSession,
    user::{NewUser, User},
};
use crate::domain::value_object::username::Username;
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Persist a new user and return it with its assigned id
    ///
    /// Fails with `AuthError::UsernameTaken` if the username already exists,
    /// checked atomically with the insert.
    async fn add(&self, user: &NewUser) -> AuthResult<User>;

    /// Find user by exact (case-sensitive) username
    async fn find_by_username(&self, username: &Username) -> AuthResult<Option<User>>;

    /// All users in id order
    async fn list(&self) -> AuthResult<Vec<User>>;
}

/// Auth session repository trait
///
/// Stores return sessions regardless of expiry; callers decide what an
/// expired session means.
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Create a new session
    async fn create(&self, session: &AuthSession) -> AuthResult<()>;

    /// Find session by ID
    async fn find(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>>;

    /// Delete a session; `false` if it did not exist
    async fn destroy(&self, session_id: Uuid) -> AuthResult<bool>;

    /// Clean up expired sessions
    async fn cleanup_expired(&self) -> AuthResult<u64>;
}

/// Everything the gateway needs from a store, shareable across handlers
pub trait GatewayRepository:
    UserRepository + SessionRepository + Clone + Send + Sync + 'static
{
}

impl<T> GatewayRepository for T where
    T: UserRepository + SessionRepository + Clone + Send + Sync + 'static
{
}

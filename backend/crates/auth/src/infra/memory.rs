//! In-Memory Repository Implementation
//!
//! Used when no `DATABASE_URL` is configured and by the router tests.
//! Everything lives behind one `RwLock`, so the username check and the
//! insert in [`UserRepository::add`] happen atomically.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entity::{
    auth_session::AuthSession,
    user::{NewUser, User},
};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{user_id::UserId, username::Username};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct MemoryState {
    users: BTreeMap<UserId, User>,
    by_username: HashMap<Username, UserId>,
    sessions: HashMap<Uuid, AuthSession>,
    next_id: i64,
}

/// Process-local user and session store
#[derive(Clone, Default)]
pub struct MemoryAuthRepository {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for MemoryAuthRepository {
    async fn add(&self, user: &NewUser) -> AuthResult<User> {
        let mut state = self.state.write().await;

        if state.by_username.contains_key(&user.username) {
            return Err(AuthError::UsernameTaken);
        }

        state.next_id += 1;
        let id = UserId::from_i64(state.next_id);
        let user = user.clone().into_user(id);

        state.by_username.insert(user.username.clone(), id);
        state.users.insert(id, user.clone());

        Ok(user)
    }

    async fn find_by_username(&self, username: &Username) -> AuthResult<Option<User>> {
        let state = self.state.read().await;

        Ok(state
            .by_username
            .get(username)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().cloned().collect())
    }
}

impl SessionRepository for MemoryAuthRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()> {
        self.state
            .write()
            .await
            .sessions
            .insert(session.session_id, session.clone());
        Ok(())
    }

    async fn find(&self, session_id: Uuid) -> AuthResult<Option<AuthSession>> {
        Ok(self.state.read().await.sessions.get(&session_id).cloned())
    }

    async fn destroy(&self, session_id: Uuid) -> AuthResult<bool> {
        Ok(self
            .state
            .write()
            .await
            .sessions
            .remove(&session_id)
            .is_some())
    }

    async fn cleanup_expired(&self) -> AuthResult<u64> {
        let now_ms = Utc::now().timestamp_millis();
        let mut state = self.state.write().await;

        let before = state.sessions.len();
        state.sessions.retain(|_, s| s.expires_at_ms >= now_ms);
        let deleted = (before - state.sessions.len()) as u64;

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired auth sessions");

        Ok(deleted)
    }
}

//! Auth Session Entity
//!
//! Represents an authenticated user session.
//! Stored server-side and referenced by a signed cookie token.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::entity::user::User;
use crate::domain::value_object::{user_id::UserId, username::Username};

/// Auth session entity
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Session ID (UUID v4)
    pub session_id: Uuid,
    /// Reference to User
    pub user_id: UserId,
    /// Username at login time
    pub username: Username,
    /// Session expiration (Unix timestamp ms)
    pub expires_at_ms: i64,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl AuthSession {
    /// Create a new auth session for `user`
    ///
    /// TTL is provided by the application layer (config), not hard-coded here.
    /// An expiry past the representable range saturates.
    pub fn new(user: &User, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            session_id: Uuid::new_v4(),
            user_id: user.id,
            username: user.username.clone(),
            expires_at_ms: now
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
                .timestamp_millis(),
            created_at: now,
        }
    }

    /// Check if session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp_millis() > self.expires_at_ms
    }
}

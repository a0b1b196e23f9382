//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;
use crate::domain::value_object::{user_id::UserId, username::Username};

// ============================================================================
// Credentials
// ============================================================================

/// Register / login request body
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

// ============================================================================
// Register
// ============================================================================

/// Register response (the hash never leaves the server)
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub id: UserId,
    pub username: Username,
}

impl From<User> for RegisterResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

// ============================================================================
// Messages
// ============================================================================

/// `{"message": ...}` body shared by login, logout and every error
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Session Status
// ============================================================================

/// Session status response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<Username>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at_ms: Option<i64>,
}

impl SessionStatusResponse {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            id: None,
            username: None,
            expires_at_ms: None,
        }
    }
}

// ============================================================================
// Users
// ============================================================================

/// Public view of a user
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: Username,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_status_omits_user_fields() {
        let json = serde_json::to_value(SessionStatusResponse::anonymous()).unwrap();
        assert_eq!(json, serde_json::json!({ "authenticated": false }));
    }

    #[test]
    fn test_status_is_camel_case() {
        let status = SessionStatusResponse {
            authenticated: true,
            id: Some(UserId::from_i64(3)),
            username: Some(Username::new("sue").unwrap()),
            expires_at_ms: Some(42),
        };
        let json = serde_json::to_value(status).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "authenticated": true,
                "id": 3,
                "username": "sue",
                "expiresAtMs": 42
            })
        );
    }
}

//! Session Token
//!
//! The cookie value is `<session_uuid>.<base64url(HMAC-SHA256(secret, session_uuid))>`.
//! Anything that fails to verify is simply "no session".

use platform::crypto::{sign_token, verify_token};
use uuid::Uuid;

/// Sign a session id into a cookie value
pub fn issue(secret: &[u8], session_id: Uuid) -> String {
    sign_token(secret, &session_id.to_string())
}

/// Verify a cookie value and recover the session id
pub fn parse(secret: &[u8], token: &str) -> Option<Uuid> {
    verify_token(secret, token)?.parse().ok()
}

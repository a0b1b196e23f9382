//! Cryptographic Utilities
//!
//! Signed tokens are `<payload>.<base64url(HMAC-SHA256(key, payload))>`.

use base64::{Engine, engine::general_purpose};
use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Encode bytes as base64
pub fn to_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decode base64 to bytes
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}

/// Sign `payload` and return the combined token
pub fn sign_token(key: &[u8], payload: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    format!(
        "{}.{}",
        payload,
        general_purpose::URL_SAFE_NO_PAD.encode(signature)
    )
}

/// Verify a token produced by [`sign_token`] and return its payload
///
/// Returns `None` for malformed tokens and bad signatures alike.
pub fn verify_token<'a>(key: &[u8], token: &'a str) -> Option<&'a str> {
    let (payload, signature_b64) = token.rsplit_once('.')?;

    let signature = general_purpose::URL_SAFE_NO_PAD
        .decode(signature_b64)
        .ok()?;

    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(payload.as_bytes());

    // verify_slice is constant-time
    mac.verify_slice(&signature).ok()?;

    Some(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bytes() {
        let bytes = random_bytes(32);
        assert_eq!(bytes.len(), 32);
        // Should not be all zeros (statistically)
        assert!(bytes.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_base64_roundtrip() {
        let data = b"hello world";
        let encoded = to_base64(data);
        let decoded = from_base64(&encoded).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_sign_and_verify() {
        let key = [42u8; 32];
        let token = sign_token(&key, "session-abc");
        assert!(token.starts_with("session-abc."));
        assert_eq!(verify_token(&key, &token), Some("session-abc"));
    }

    #[test]
    fn test_verify_rejects_wrong_key() {
        let token = sign_token(&[1u8; 32], "session-abc");
        assert_eq!(verify_token(&[2u8; 32], &token), None);
    }

    #[test]
    fn test_verify_rejects_tampered_payload() {
        let key = [7u8; 32];
        let token = sign_token(&key, "session-abc");
        let (_, sig) = token.split_once('.').unwrap();
        let forged = format!("session-xyz.{}", sig);
        assert_eq!(verify_token(&key, &forged), None);
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let key = [7u8; 32];
        assert_eq!(verify_token(&key, "no-dot-here"), None);
        assert_eq!(verify_token(&key, "payload.!!!not-base64!!!"), None);
        assert_eq!(verify_token(&key, ""), None);
    }
}

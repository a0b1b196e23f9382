//! Password Hashing and Verification
//!
//! Salted one-way password handling with:
//! - Argon2id hashing (memory-hard, recommended by OWASP)
//! - Zeroization of sensitive data
//! - Constant-time comparison
//! - Hashing on the blocking thread pool so request tasks are never stalled
//!
//! The policy is intentionally minimal: a password must be longer than
//! [`MIN_PASSWORD_EXCLUSIVE`] characters. Nothing else is enforced.

use std::fmt;
use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Passwords of this many characters or fewer are rejected
pub const MIN_PASSWORD_EXCLUSIVE: usize = 3;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    /// Password is too short
    #[error("Password must be longer than {min_exclusive} chars")]
    TooShort { min_exclusive: usize, actual: usize },
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Invalid hash format
    #[error("Invalid password hash format")]
    InvalidHashFormat,

    /// The blocking task panicked or was cancelled
    #[error("Password hashing task failed: {0}")]
    TaskFailed(String),
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
///
/// ## Examples
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let password = ClearTextPassword::new("1234".to_string()).unwrap();
/// assert!(ClearTextPassword::new("123".to_string()).is_err());
/// # drop(password);
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new clear text password with validation
    ///
    /// The length is counted in code points (not bytes) on the input as
    /// submitted. NFKC normalization is applied afterwards, for hashing only.
    pub fn new(mut raw: String) -> Result<Self, PasswordPolicyError> {
        let char_count = raw.chars().count();
        if char_count <= MIN_PASSWORD_EXCLUSIVE {
            raw.zeroize();
            return Err(PasswordPolicyError::TooShort {
                min_exclusive: MIN_PASSWORD_EXCLUSIVE,
                actual: char_count,
            });
        }

        let normalized: String = raw.nfkc().collect();
        raw.zeroize();

        Ok(Self(normalized))
    }

    /// Get the password as bytes for hashing
    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash the password using Argon2id
    ///
    /// CPU-bound; async callers should prefer [`ClearTextPassword::hash_blocking`].
    ///
    /// ## Arguments
    /// * `pepper` - Optional application-wide secret for additional security
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let mut password_bytes = peppered(self, pepper);

        // Random 128-bit salt per hash
        let salt = SaltString::generate(OsRng);

        // OWASP recommended Argon2id parameters:
        // m=19456 (19 MiB), t=2, p=1
        let argon2 = Argon2::default();

        let result = argon2
            .hash_password(&password_bytes, &salt)
            .map(|hash| HashedPassword {
                hash: hash.to_string(),
            })
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()));

        password_bytes.zeroize();
        result
    }

    /// Hash on the blocking thread pool
    pub async fn hash_blocking(
        self: Arc<Self>,
        pepper: Option<Vec<u8>>,
    ) -> Result<HashedPassword, PasswordHashError> {
        tokio::task::spawn_blocking(move || self.hash(pepper.as_deref()))
            .await
            .map_err(|e| PasswordHashError::TaskFailed(e.to_string()))?
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format
///
/// The PHC string carries algorithm, version, parameters, salt and hash,
/// so verification needs nothing but the string itself.
///
/// ## Examples
/// ```rust
/// use platform::password::{ClearTextPassword, HashedPassword};
///
/// let password = ClearTextPassword::new("correct horse".to_string()).unwrap();
/// let hashed = password.hash(None).unwrap();
///
/// let restored = HashedPassword::from_phc_string(hashed.as_phc_string()).unwrap();
/// assert!(restored.verify(&password, None));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();

        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;

        Ok(Self { hash })
    }

    /// Get the PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Verify a password against this hash
    ///
    /// Uses constant-time comparison to prevent timing attacks.
    ///
    /// ## Arguments
    /// * `password` - The clear text password to verify
    /// * `pepper` - Optional pepper (must match the one used during hashing)
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let parsed_hash = match PasswordHash::new(&self.hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        let mut password_bytes = peppered(password, pepper);

        // Argon2 uses constant-time comparison internally
        let ok = Argon2::default()
            .verify_password(&password_bytes, &parsed_hash)
            .is_ok();

        password_bytes.zeroize();
        ok
    }

    /// Verify on the blocking thread pool
    pub async fn verify_blocking(
        &self,
        password: Arc<ClearTextPassword>,
        pepper: Option<Vec<u8>>,
    ) -> Result<bool, PasswordHashError> {
        let hashed = self.clone();
        tokio::task::spawn_blocking(move || hashed.verify(&password, pepper.as_deref()))
            .await
            .map_err(|e| PasswordHashError::TaskFailed(e.to_string()))
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Password bytes with the pepper appended
fn peppered(password: &ClearTextPassword, pepper: Option<&[u8]>) -> Vec<u8> {
    let mut combined = password.as_bytes().to_vec();
    if let Some(p) = pepper {
        combined.extend_from_slice(p);
    }
    combined
}

// ============================================================================
// Tests
// ============================================================================

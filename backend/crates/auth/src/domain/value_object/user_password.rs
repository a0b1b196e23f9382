//! User Password Value Object
//!
//! Domain value object for user passwords.
//! Delegates to `platform::password` for cryptographic operations.
//!
//! ## Security Features
//! - Argon2id hashing (memory-hard)
//! - Automatic memory zeroization
//! - Constant-time comparison
//! - Unicode NFKC normalization
//! - Hashing and verification run on the blocking thread pool
//!
//! ## Usage
//! ```rust,no_run
//! use auth::domain::value_object::user_password::{RawPassword, UserPassword};
//!
//! # async fn demo() -> auth::AuthResult<()> {
//! let raw = RawPassword::new("1234".to_string())?;
//! let hashed = UserPassword::hash(&raw, None).await?;
//! assert!(hashed.verify(&raw, None).await?);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use platform::password::{ClearTextPassword, HashedPassword};

use crate::error::{AuthError, AuthResult};

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input
///
/// Cloning shares the same zeroize-on-drop buffer; the clear text is never
/// duplicated.
#[derive(Clone)]
pub struct RawPassword(Arc<ClearTextPassword>);

impl RawPassword {
    /// Create a new raw password with validation
    ///
    /// ## Errors
    /// `AuthError::PasswordPolicy` when the password is 3 characters or fewer
    pub fn new(raw: String) -> AuthResult<Self> {
        let clear_text = ClearTextPassword::new(raw)?;
        Ok(Self(Arc::new(clear_text)))
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Hashed user password for storage
///
/// Stores password in Argon2id PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a raw password on the blocking thread pool
    ///
    /// ## Arguments
    /// * `raw` - The validated raw password
    /// * `pepper` - Optional application-wide secret
    pub async fn hash(raw: &RawPassword, pepper: Option<&[u8]>) -> AuthResult<Self> {
        let hashed = Arc::clone(&raw.0)
            .hash_blocking(pepper.map(<[u8]>::to_vec))
            .await?;

        Ok(Self(hashed))
    }

    /// Create from PHC string (from database)
    pub fn from_phc_string(phc_string: impl Into<String>) -> AuthResult<Self> {
        let hashed = HashedPassword::from_phc_string(phc_string)
            .map_err(|_| AuthError::Internal("Invalid password hash in database".to_string()))?;

        Ok(Self(hashed))
    }

    /// Get PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Verify a raw password against this hash on the blocking thread pool
    ///
    /// ## Arguments
    /// * `raw` - The raw password to verify
    /// * `pepper` - Must match the pepper used during hashing
    pub async fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> AuthResult<bool> {
        let ok = self
            .0
            .verify_blocking(Arc::clone(&raw.0), pepper.map(<[u8]>::to_vec))
            .await?;

        Ok(ok)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

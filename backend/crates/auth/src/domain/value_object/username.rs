//! Username Value Object
//!
//! Usernames are stored exactly as submitted and compared case-sensitively:
//! `Sue` and `sue` are two different accounts. The only rule is that a
//! username must contain something other than whitespace.

use derive_more::Display;
use serde::Serialize;

/// Error returned when username validation fails
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsernameError {
    /// Username is empty or whitespace only
    #[error("Username cannot be empty")]
    Empty,
}

/// Case-sensitive, non-blank username
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Create a new Username from raw input
    pub fn new(input: impl Into<String>) -> Result<Self, UsernameError> {
        let input = input.into();
        if input.trim().is_empty() {
            return Err(UsernameError::Empty);
        }
        Ok(Self(input))
    }

    /// Create from database values (already validated on insert)
    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

//! User Entity
//!
//! A registered account. Created once on register and never mutated.

use crate::domain::value_object::{
    user_id::UserId, user_password::UserPassword, username::Username,
};

/// Persisted user
#[derive(Debug, Clone)]
pub struct User {
    /// Store-assigned identifier
    pub id: UserId,
    /// Unique, case-sensitive login name
    pub username: Username,
    /// Argon2id PHC string
    pub password_hash: UserPassword,
}

/// User before the store has assigned an id
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub password_hash: UserPassword,
}

impl NewUser {
    pub fn new(username: Username, password_hash: UserPassword) -> Self {
        Self {
            username,
            password_hash,
        }
    }

    /// Attach the id assigned by the store
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            username: self.username,
            password_hash: self.password_hash,
        }
    }
}

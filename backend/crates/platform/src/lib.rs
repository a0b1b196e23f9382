//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC token signing, Base64, random bytes)
//! - Password hashing (Argon2id, off the async executor)
//! - Cookie management
//! - Environment-driven configuration helpers

pub mod config;
pub mod cookie;
pub mod crypto;
pub mod password;

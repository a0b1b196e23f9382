//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of gateway vocabulary:
//! - Common error types and result aliases
//! - Store-assigned integer ID types
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all crates.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;

//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - In-memory and PostgreSQL store implementations
//! - `presentation/` - HTTP handlers, credential validator, DTOs, router
//!
//! ## Features
//! - Register / login / logout with username + password
//! - Server-side sessions referenced by a signed cookie
//! - Restricted routes behind `require_session`
//!
//! ## Security Model
//! - Passwords hashed with Argon2id on the blocking thread pool
//! - Session cookies are HMAC-signed; anything that fails to verify is "no session"
//! - Unknown username and wrong password produce the same response

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use domain::repository::GatewayRepository;
pub use error::{AuthError, AuthResult};
pub use infra::{MemoryAuthRepository, PgAuthRepository};
pub use presentation::router::{auth_router, gateway_router, users_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;

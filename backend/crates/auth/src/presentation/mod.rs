//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod validator;

pub use handlers::AuthAppState;
pub use middleware::{CurrentSession, require_session};
pub use router::{auth_router, gateway_router, users_router};

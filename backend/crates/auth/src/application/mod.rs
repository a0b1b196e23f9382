//! Application Layer
//!
//! Use cases and application services.

pub mod check_session;
pub mod config;
pub mod login;
pub mod logout;
pub mod register;
pub mod session_token;

// Re-exports
pub use check_session::CheckSessionUseCase;
pub use config::AuthConfig;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use logout::{LogoutOutcome, LogoutUseCase};
pub use register::{RegisterInput, RegisterUseCase};

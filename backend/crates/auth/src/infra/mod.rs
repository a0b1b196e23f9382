//! Infrastructure Layer
//!
//! Store implementations.

pub mod memory;
pub mod postgres;

pub use memory::MemoryAuthRepository;
pub use postgres::PgAuthRepository;

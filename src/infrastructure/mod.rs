//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Repository implementations, in-memory and SeaORM (repositories)
//! - Application state (state)

pub mod repositories;
pub mod state;

pub use repositories::*;
pub use state::AppState;

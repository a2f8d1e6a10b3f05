//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Repository implementations over SeaORM (repositories)
//! - Application state wiring services together (state)

pub mod repositories;
pub mod state;

pub use repositories::*;
pub use state::AppState;

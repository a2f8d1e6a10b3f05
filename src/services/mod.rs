//! Services Layer
//!
//! Business operations over the repositories: validation of transfer
//! objects, actor checks, state transitions and transactional writes.
//! Services hold no per-request state and are cheap to clone.

pub mod actor;
pub mod error;
pub mod oeuvre_service;
pub mod taxonomy_service;
pub mod user_service;

pub use actor::{Actor, resolve_actor};
pub use error::ServiceError;
pub use oeuvre_service::{OeuvreService, OeuvreStats};
pub use taxonomy_service::{TaxonomyService, slugify};
pub use user_service::{UserService, UserStats};

//! Repository implementations using SeaORM

pub mod base_repository;
pub mod oeuvre_repository;
pub mod taxonomy_repository;
pub mod translatable_columns;
pub mod user_repository;

pub use base_repository::{EntityStats, FindOptions, Repository, with_transaction};
pub use oeuvre_repository::{OeuvreInclude, OeuvreRecord, OeuvreRepository};
pub use taxonomy_repository::{CategoryStore, TagStore, category_store, tag_store};
pub use translatable_columns::{AssignMode, assign_translatable};
pub use user_repository::{Suspension, UserRepository};

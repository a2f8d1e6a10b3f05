//! Domain layer - Storage-agnostic value types
//!
//! Multilingual values, pagination, query descriptors, search sanitization
//! and the storage error kinds shared by every repository.

pub mod errors;
pub mod pagination;
pub mod query;
pub mod search;
pub mod translatable;

pub use errors::StorageError;
pub use pagination::{Page, PageInfo, PageLimits, PageRequest, Paginated};
pub use query::{Direction, Filter, FilterOp, OrderBy};
pub use translatable::{Language, TranslatableText};

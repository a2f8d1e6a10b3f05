pub mod category;
pub mod oeuvre;
pub mod oeuvre_categories;
pub mod oeuvre_tags;
pub mod tag;
pub mod user;

pub use oeuvre::{WorkStatus, WorkType};
pub use user::{Role, UserType, ValidationStatus};

//! Categories and tags share the same shape: a unique slug plus a
//! translatable name.

use crate::domain::{Direction, PageLimits};
use crate::models::{category, tag};

use super::base_repository::Repository;

pub type CategoryStore = Repository<category::Entity, category::ActiveModel>;
pub type TagStore = Repository<tag::Entity, tag::ActiveModel>;

pub fn category_store(limits: PageLimits, max_search_length: usize) -> CategoryStore {
    Repository::new("category")
        .with_limits(limits, max_search_length)
        .searchable(&["slug", "name"])
        .translatable(&["name"])
        .default_order("slug", Direction::Asc)
}

pub fn tag_store(limits: PageLimits, max_search_length: usize) -> TagStore {
    Repository::new("tag")
        .with_limits(limits, max_search_length)
        .searchable(&["slug", "name"])
        .translatable(&["name"])
        .default_order("slug", Direction::Asc)
}

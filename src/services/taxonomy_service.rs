//! Categories and tags

use sea_orm::ActiveValue::Set;
use sea_orm::DatabaseConnection;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use super::actor::resolve_actor;
use super::error::ServiceError;
use crate::domain::{Language, Paginated, TranslatableText};
use crate::dto::CreateTaxonomyDto;
use crate::infrastructure::repositories::{
    AssignMode, CategoryStore, FindOptions, TagStore, UserRepository, assign_translatable,
};
use crate::models::{category, tag};

/// ASCII slug of `text`: accents folded, runs of other characters collapsed
/// to a single dash.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut dash = false;
    for c in text.nfd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            dash = false;
        } else if !dash && !slug.is_empty() {
            slug.push('-');
            dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Explicit slug, or one derived from the primary-language name
fn resolve_slug(dto: &CreateTaxonomyDto) -> Result<String, ServiceError> {
    let slug = match &dto.slug {
        Some(slug) => slug.clone(),
        None => slugify(&dto.name.extract(Language::PRIMARY)),
    };
    if slug.is_empty() {
        return Err(ServiceError::invalid(
            "slug",
            "is required when the name has no latin characters",
        ));
    }
    Ok(slug)
}

#[derive(Clone)]
pub struct TaxonomyService {
    db: DatabaseConnection,
    categories: CategoryStore,
    tags: TagStore,
    users: UserRepository,
}

impl TaxonomyService {
    pub fn new(
        db: DatabaseConnection,
        categories: CategoryStore,
        tags: TagStore,
        users: UserRepository,
    ) -> Self {
        Self {
            db,
            categories,
            tags,
            users,
        }
    }

    async fn require_moderator(&self, actor_id: i32) -> Result<(), ServiceError> {
        resolve_actor(&self.users, &self.db, actor_id)
            .await?
            .require_moderator()
    }

    fn prepare(dto: &CreateTaxonomyDto) -> Result<(String, TranslatableText), ServiceError> {
        ServiceError::check(dto.validate())?;
        Ok((resolve_slug(dto)?, dto.name.clone()))
    }

    pub async fn create_category(
        &self,
        actor_id: i32,
        dto: CreateTaxonomyDto,
    ) -> Result<category::Model, ServiceError> {
        self.require_moderator(actor_id).await?;
        let (slug, name) = Self::prepare(&dto)?;
        let mut active = category::ActiveModel {
            slug: Set(slug),
            ..Default::default()
        };
        assign_translatable(&mut active, "name", &name, AssignMode::Replace)?;
        let created = self.categories.create(&self.db, active).await?;
        tracing::info!(category_id = created.id, slug = %created.slug, "category created");
        Ok(created)
    }

    pub async fn create_tag(
        &self,
        actor_id: i32,
        dto: CreateTaxonomyDto,
    ) -> Result<tag::Model, ServiceError> {
        self.require_moderator(actor_id).await?;
        let (slug, name) = Self::prepare(&dto)?;
        let mut active = tag::ActiveModel {
            slug: Set(slug),
            ..Default::default()
        };
        assign_translatable(&mut active, "name", &name, AssignMode::Replace)?;
        let created = self.tags.create(&self.db, active).await?;
        tracing::info!(tag_id = created.id, slug = %created.slug, "tag created");
        Ok(created)
    }

    pub async fn list_categories(
        &self,
        options: FindOptions,
    ) -> Result<Paginated<category::Model>, ServiceError> {
        Ok(self.categories.find_all(&self.db, options).await?)
    }

    pub async fn list_tags(&self, options: FindOptions) -> Result<Paginated<tag::Model>, ServiceError> {
        Ok(self.tags.find_all(&self.db, options).await?)
    }

    pub async fn search_categories(
        &self,
        term: &str,
        options: FindOptions,
    ) -> Result<Paginated<category::Model>, ServiceError> {
        Ok(self.categories.search(&self.db, term, None, options).await?)
    }

    pub async fn search_tags(
        &self,
        term: &str,
        options: FindOptions,
    ) -> Result<Paginated<tag::Model>, ServiceError> {
        Ok(self.tags.search(&self.db, term, None, options).await?)
    }

    /// Remove a category; its links to works are dropped with it
    pub async fn delete_category(&self, id: i32, actor_id: i32) -> Result<(), ServiceError> {
        self.require_moderator(actor_id).await?;
        if !self.categories.delete(&self.db, id).await? {
            return Err(ServiceError::not_found("category", id));
        }
        Ok(())
    }

    pub async fn delete_tag(&self, id: i32, actor_id: i32) -> Result<(), ServiceError> {
        self.require_moderator(actor_id).await?;
        if !self.tags.delete(&self.db, id).await? {
            return Err(ServiceError::not_found("tag", id));
        }
        Ok(())
    }
}

//! Work ("oeuvre") queries and association management

use std::collections::{BTreeSet, HashMap};
use std::ops::Deref;

use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
};

use super::base_repository::{FindOptions, Repository};
use crate::domain::{Direction, Filter, PageLimits, Paginated, StorageError};
use crate::models::oeuvre::{ActiveModel, Entity as OeuvreEntity, Model};
use crate::models::{WorkStatus, WorkType, category, oeuvre_categories, oeuvre_tags, tag, user};

pub type OeuvreStore = Repository<OeuvreEntity, ActiveModel>;

/// Associations to load alongside works
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OeuvreInclude {
    pub categories: bool,
    pub tags: bool,
    pub owner: bool,
}

impl OeuvreInclude {
    pub fn all() -> Self {
        Self {
            categories: true,
            tags: true,
            owner: true,
        }
    }

    fn any(&self) -> bool {
        self.categories || self.tags || self.owner
    }
}

/// A work with the associations requested through [`OeuvreInclude`]
#[derive(Debug, Clone)]
pub struct OeuvreRecord {
    pub work: Model,
    pub categories: Vec<category::Model>,
    pub tags: Vec<tag::Model>,
    pub owner: Option<user::Model>,
}

impl OeuvreRecord {
    pub fn bare(work: Model) -> Self {
        Self {
            work,
            categories: Vec::new(),
            tags: Vec::new(),
            owner: None,
        }
    }

    pub fn category_ids(&self) -> Vec<i32> {
        self.categories.iter().map(|c| c.id).collect()
    }

    pub fn tag_ids(&self) -> Vec<i32> {
        self.tags.iter().map(|t| t.id).collect()
    }
}

#[derive(Clone)]
pub struct OeuvreRepository {
    base: OeuvreStore,
}

impl Deref for OeuvreRepository {
    type Target = OeuvreStore;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl OeuvreRepository {
    pub fn new(limits: PageLimits, max_search_length: usize) -> Self {
        Self {
            base: Repository::new("oeuvre")
                .with_limits(limits, max_search_length)
                .searchable(&["title", "description"])
                .translatable(&["title", "description"])
                .default_order("created_at", Direction::Desc),
        }
    }

    pub async fn find_by_status<C: ConnectionTrait>(
        &self,
        db: &C,
        status: WorkStatus,
        options: FindOptions,
    ) -> Result<Paginated<Model>, StorageError> {
        let filter = Filter::new().eq("status", status).and(options.filter.clone());
        self.find_all(db, options.filtered(filter)).await
    }

    pub async fn find_by_owner<C: ConnectionTrait>(
        &self,
        db: &C,
        owner_id: i32,
        options: FindOptions,
    ) -> Result<Paginated<Model>, StorageError> {
        let filter = Filter::new().eq("owner_id", owner_id).and(options.filter.clone());
        self.find_all(db, options.filtered(filter)).await
    }

    pub async fn find_by_type<C: ConnectionTrait>(
        &self,
        db: &C,
        work_type: WorkType,
        options: FindOptions,
    ) -> Result<Paginated<Model>, StorageError> {
        let filter = Filter::new().eq("work_type", work_type).and(options.filter.clone());
        self.find_all(db, options.filtered(filter)).await
    }

    /// Row counts for every status
    pub async fn count_by_status<C: ConnectionTrait>(
        &self,
        db: &C,
    ) -> Result<Vec<(WorkStatus, u64)>, StorageError> {
        let mut counts = Vec::new();
        for status in [
            WorkStatus::Draft,
            WorkStatus::Pending,
            WorkStatus::Published,
            WorkStatus::Rejected,
            WorkStatus::Archived,
            WorkStatus::Deleted,
        ] {
            let total = self.count(db, &Filter::new().eq("status", status)).await?;
            counts.push((status, total));
        }
        Ok(counts)
    }

    pub async fn find_with<C: ConnectionTrait>(
        &self,
        db: &C,
        id: i32,
        include: OeuvreInclude,
    ) -> Result<Option<OeuvreRecord>, StorageError> {
        let Some(work) = self.find_by_id(db, id).await? else {
            return Ok(None);
        };
        let mut records = self.attach(db, vec![work], include).await?;
        Ok(records.pop())
    }

    /// Load associations for a page of works
    pub async fn include_page<C: ConnectionTrait>(
        &self,
        db: &C,
        page: Paginated<Model>,
        include: OeuvreInclude,
    ) -> Result<Paginated<OeuvreRecord>, StorageError> {
        let rows = page.data.clone();
        let records = self.attach(db, rows, include).await?;
        Ok(page.with_data(records))
    }

    async fn attach<C: ConnectionTrait>(
        &self,
        db: &C,
        works: Vec<Model>,
        include: OeuvreInclude,
    ) -> Result<Vec<OeuvreRecord>, StorageError> {
        let mut records: Vec<OeuvreRecord> = works.into_iter().map(OeuvreRecord::bare).collect();
        if records.is_empty() || !include.any() {
            return Ok(records);
        }
        let ids: Vec<i32> = records.iter().map(|r| r.work.id).collect();

        if include.categories {
            let mut by_work: HashMap<i32, Vec<category::Model>> = HashMap::new();
            let links = oeuvre_categories::Entity::find()
                .filter(oeuvre_categories::Column::OeuvreId.is_in(ids.clone()))
                .find_also_related(category::Entity)
                .all(db)
                .await?;
            for (link, found) in links {
                if let Some(found) = found {
                    by_work.entry(link.oeuvre_id).or_default().push(found);
                }
            }
            for record in &mut records {
                let mut categories = by_work.remove(&record.work.id).unwrap_or_default();
                categories.sort_by_key(|c| c.id);
                record.categories = categories;
            }
        }

        if include.tags {
            let mut by_work: HashMap<i32, Vec<tag::Model>> = HashMap::new();
            let links = oeuvre_tags::Entity::find()
                .filter(oeuvre_tags::Column::OeuvreId.is_in(ids.clone()))
                .find_also_related(tag::Entity)
                .all(db)
                .await?;
            for (link, found) in links {
                if let Some(found) = found {
                    by_work.entry(link.oeuvre_id).or_default().push(found);
                }
            }
            for record in &mut records {
                let mut tags = by_work.remove(&record.work.id).unwrap_or_default();
                tags.sort_by_key(|t| t.id);
                record.tags = tags;
            }
        }

        if include.owner {
            let owner_ids: BTreeSet<i32> = records.iter().map(|r| r.work.owner_id).collect();
            let owners: HashMap<i32, user::Model> = user::Entity::find()
                .filter(user::Column::Id.is_in(owner_ids))
                .all(db)
                .await?
                .into_iter()
                .map(|u| (u.id, u))
                .collect();
            for record in &mut records {
                record.owner = owners.get(&record.work.owner_id).cloned();
            }
        }

        Ok(records)
    }

    /// Replace the category set of a work with exactly `category_ids`.
    ///
    /// Unknown ids fail before any join row is touched.
    pub async fn replace_categories<C: ConnectionTrait>(
        &self,
        db: &C,
        oeuvre_id: i32,
        category_ids: &[i32],
    ) -> Result<(), StorageError> {
        let ids: BTreeSet<i32> = category_ids.iter().copied().collect();
        let known = category::Entity::find()
            .filter(category::Column::Id.is_in(ids.clone()))
            .count(db)
            .await?;
        if known != ids.len() as u64 {
            return Err(StorageError::ForeignKeyViolation {
                field: String::from("category_ids"),
                message: String::from("one or more categories do not exist"),
            });
        }

        oeuvre_categories::Entity::delete_many()
            .filter(oeuvre_categories::Column::OeuvreId.eq(oeuvre_id))
            .exec(db)
            .await?;
        if !ids.is_empty() {
            let links = ids.into_iter().map(|category_id| oeuvre_categories::ActiveModel {
                oeuvre_id: Set(oeuvre_id),
                category_id: Set(category_id),
            });
            oeuvre_categories::Entity::insert_many(links)
                .exec_without_returning(db)
                .await?;
        }
        Ok(())
    }

    /// Replace the tag set of a work with exactly `tag_ids`.
    pub async fn replace_tags<C: ConnectionTrait>(
        &self,
        db: &C,
        oeuvre_id: i32,
        tag_ids: &[i32],
    ) -> Result<(), StorageError> {
        let ids: BTreeSet<i32> = tag_ids.iter().copied().collect();
        let known = tag::Entity::find()
            .filter(tag::Column::Id.is_in(ids.clone()))
            .count(db)
            .await?;
        if known != ids.len() as u64 {
            return Err(StorageError::ForeignKeyViolation {
                field: String::from("tag_ids"),
                message: String::from("one or more tags do not exist"),
            });
        }

        oeuvre_tags::Entity::delete_many()
            .filter(oeuvre_tags::Column::OeuvreId.eq(oeuvre_id))
            .exec(db)
            .await?;
        if !ids.is_empty() {
            let links = ids.into_iter().map(|tag_id| oeuvre_tags::ActiveModel {
                oeuvre_id: Set(oeuvre_id),
                tag_id: Set(tag_id),
            });
            oeuvre_tags::Entity::insert_many(links)
                .exec_without_returning(db)
                .await?;
        }
        Ok(())
    }
}

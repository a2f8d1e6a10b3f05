//! Work service: CRUD, visibility and the publication workflow
//!
//! ```text
//! draft -> pending -> published -> archived
//!                  \-> rejected
//! any state except deleted -> deleted -> (purged by an administrator)
//! ```
//!
//! Every transition looks the work up first, then checks the actor and the
//! current status, and only then writes. A refused transition writes nothing.

use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::DatabaseConnection;
use serde::Serialize;

use super::actor::{Actor, resolve_actor};
use super::error::ServiceError;
use crate::domain::{Filter, OrderBy, PageRequest, Paginated};
use crate::dto::{CreateOeuvreDto, UpdateOeuvreDto};
use crate::infrastructure::repositories::{
    EntityStats, FindOptions, OeuvreInclude, OeuvreRecord, OeuvreRepository, UserRepository,
    with_transaction,
};
use crate::models::oeuvre::{ActiveModel, Model};
use crate::models::{WorkStatus, WorkType};

const ENTITY: &str = "oeuvre";

/// Counts shown on the moderation dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OeuvreStats {
    pub created: EntityStats,
    pub by_status: BTreeMap<String, u64>,
}

#[derive(Clone)]
pub struct OeuvreService {
    db: DatabaseConnection,
    works: OeuvreRepository,
    users: UserRepository,
}

/// Refuse a transition unless the work is in one of `allowed`
fn guard_status(work: &Model, allowed: &[WorkStatus], action: &str) -> Result<(), ServiceError> {
    if allowed.contains(&work.status) {
        return Ok(());
    }
    tracing::warn!(
        oeuvre_id = work.id,
        status = %work.status,
        action,
        "transition refused"
    );
    Err(ServiceError::Conflict(format!(
        "cannot {action} a work in status {}",
        work.status
    )))
}

/// Whether `viewer` may read `work`
fn can_view(work: &Model, viewer: Option<&Actor>) -> bool {
    match viewer {
        Some(actor) if actor.is_admin() => true,
        _ if work.status == WorkStatus::Deleted => false,
        Some(actor) if actor.id() == work.owner_id || actor.role().can_moderate() => true,
        _ => work.status == WorkStatus::Published,
    }
}

/// Restriction added to listings for `viewer`. `owner_id` scopes the
/// listing to one owner's works.
fn visibility_filter(viewer: Option<&Actor>, owner_id: Option<i32>) -> Filter {
    match viewer {
        Some(actor) if actor.is_admin() => Filter::new(),
        Some(actor) if actor.role().can_moderate() || Some(actor.id()) == owner_id => {
            Filter::new().ne("status", WorkStatus::Deleted)
        }
        _ => Filter::new().eq("status", WorkStatus::Published),
    }
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

impl OeuvreService {
    pub fn new(db: DatabaseConnection, works: OeuvreRepository, users: UserRepository) -> Self {
        Self { db, works, users }
    }

    async fn actor(&self, actor_id: i32) -> Result<Actor, ServiceError> {
        resolve_actor(&self.users, &self.db, actor_id).await
    }

    async fn viewer(&self, viewer_id: Option<i32>) -> Result<Option<Actor>, ServiceError> {
        match viewer_id {
            Some(id) => Ok(Some(self.actor(id).await?)),
            None => Ok(None),
        }
    }

    async fn load(&self, id: i32) -> Result<Model, ServiceError> {
        self.works
            .find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    /// Work the actor may act on. Deleted works are invisible to anyone but
    /// administrators.
    async fn load_for(&self, id: i32, actor: &Actor) -> Result<Model, ServiceError> {
        let work = self.load(id).await?;
        if work.status == WorkStatus::Deleted && !actor.is_admin() {
            return Err(ServiceError::not_found(ENTITY, id));
        }
        Ok(work)
    }

    async fn record(&self, id: i32) -> Result<OeuvreRecord, ServiceError> {
        self.works
            .find_with(&self.db, id, OeuvreInclude::all())
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    async fn transition(&self, id: i32, changes: ActiveModel) -> Result<Model, ServiceError> {
        self.works
            .update(&self.db, id, changes)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    /// Create a draft owned by the actor, with its categories and tags, in
    /// one transaction.
    pub async fn create(
        &self,
        actor_id: i32,
        dto: CreateOeuvreDto,
    ) -> Result<OeuvreRecord, ServiceError> {
        let actor = self.actor(actor_id).await?;
        ServiceError::check(dto.validate())?;
        let data = dto.to_active_model(actor.id())?;

        let works = self.works.clone();
        let CreateOeuvreDto {
            category_ids,
            tag_ids,
            ..
        } = dto;
        let created = with_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let work = works.create(txn, data).await?;
                if !category_ids.is_empty() {
                    works.replace_categories(txn, work.id, &category_ids).await?;
                }
                if !tag_ids.is_empty() {
                    works.replace_tags(txn, work.id, &tag_ids).await?;
                }
                Ok::<Model, ServiceError>(work)
            })
        })
        .await?;

        tracing::info!(oeuvre_id = created.id, owner_id = actor.id(), "work created");
        self.record(created.id).await
    }

    /// Single work with categories, tags and owner, as visible to `viewer_id`
    pub async fn get(&self, id: i32, viewer_id: Option<i32>) -> Result<OeuvreRecord, ServiceError> {
        let viewer = self.viewer(viewer_id).await?;
        let record = self.record(id).await?;
        if !can_view(&record.work, viewer.as_ref()) {
            return Err(ServiceError::not_found(ENTITY, id));
        }
        Ok(record)
    }

    pub async fn list(
        &self,
        viewer_id: Option<i32>,
        options: FindOptions,
    ) -> Result<Paginated<OeuvreRecord>, ServiceError> {
        let viewer = self.viewer(viewer_id).await?;
        let filter = visibility_filter(viewer.as_ref(), None).and(options.filter.clone());
        let page = self.works.find_all(&self.db, options.filtered(filter)).await?;
        Ok(self
            .works
            .include_page(&self.db, page, OeuvreInclude::all())
            .await?)
    }

    pub async fn list_by_type(
        &self,
        work_type: WorkType,
        viewer_id: Option<i32>,
        options: FindOptions,
    ) -> Result<Paginated<Model>, ServiceError> {
        let viewer = self.viewer(viewer_id).await?;
        let filter = visibility_filter(viewer.as_ref(), None).and(options.filter.clone());
        Ok(self
            .works
            .find_by_type(&self.db, work_type, options.filtered(filter))
            .await?)
    }

    /// Works of one owner. The owner sees drafts and rejected works too.
    pub async fn list_by_owner(
        &self,
        owner_id: i32,
        viewer_id: Option<i32>,
        options: FindOptions,
    ) -> Result<Paginated<Model>, ServiceError> {
        let viewer = self.viewer(viewer_id).await?;
        let filter = visibility_filter(viewer.as_ref(), Some(owner_id)).and(options.filter.clone());
        Ok(self
            .works
            .find_by_owner(&self.db, owner_id, options.filtered(filter))
            .await?)
    }

    /// Substring search over titles and descriptions in every language
    pub async fn search(
        &self,
        term: &str,
        viewer_id: Option<i32>,
        options: FindOptions,
    ) -> Result<Paginated<Model>, ServiceError> {
        let viewer = self.viewer(viewer_id).await?;
        let filter = visibility_filter(viewer.as_ref(), None).and(options.filter.clone());
        Ok(self
            .works
            .search(&self.db, term, None, options.filtered(filter))
            .await?)
    }

    /// Works waiting for moderation, oldest submission first
    pub async fn pending_queue(
        &self,
        actor_id: i32,
        page: PageRequest,
    ) -> Result<Paginated<Model>, ServiceError> {
        self.actor(actor_id).await?.require_moderator()?;
        let options = FindOptions {
            page,
            order: vec![OrderBy::asc("submitted_at")],
            ..Default::default()
        };
        Ok(self
            .works
            .find_by_status(&self.db, WorkStatus::Pending, options)
            .await?)
    }

    /// Update fields and replace the category and tag sets atomically.
    ///
    /// Association lists absent from the payload are left alone; an empty
    /// list clears the set.
    pub async fn update(
        &self,
        id: i32,
        actor_id: i32,
        dto: UpdateOeuvreDto,
    ) -> Result<OeuvreRecord, ServiceError> {
        let actor = self.actor(actor_id).await?;
        let work = self.load_for(id, &actor).await?;
        actor.require_owner_or_admin(work.owner_id)?;
        ServiceError::check(dto.validate())?;
        if !dto.has_changes() {
            return self.record(id).await;
        }

        // `updated_at` is stamped even when only associations change
        let changes = dto.to_changes()?;
        let works = self.works.clone();
        let UpdateOeuvreDto {
            category_ids,
            tag_ids,
            ..
        } = dto;
        with_transaction(&self.db, move |txn| {
            Box::pin(async move {
                works
                    .update(txn, id, changes)
                    .await?
                    .ok_or_else(|| ServiceError::not_found(ENTITY, id))?;
                if let Some(ids) = category_ids {
                    works.replace_categories(txn, id, &ids).await?;
                }
                if let Some(ids) = tag_ids {
                    works.replace_tags(txn, id, &ids).await?;
                }
                Ok::<(), ServiceError>(())
            })
        })
        .await?;

        tracing::info!(oeuvre_id = id, actor = actor.id(), "work updated");
        self.record(id).await
    }

    /// `draft -> pending`, by the owner. The primary-language title must be
    /// filled before a work goes to moderation.
    pub async fn submit(&self, id: i32, actor_id: i32) -> Result<Model, ServiceError> {
        let actor = self.actor(actor_id).await?;
        let work = self.load_for(id, &actor).await?;
        if work.owner_id != actor.id() {
            return Err(ServiceError::Forbidden(String::from(
                "only the owner may submit a work",
            )));
        }
        guard_status(&work, &[WorkStatus::Draft], "submit")?;
        if !work.title().has_primary() {
            return Err(ServiceError::invalid(
                "title",
                "must be filled in the primary language before submission",
            ));
        }

        let changes = ActiveModel {
            status: Set(WorkStatus::Pending),
            submitted_at: Set(Some(now())),
            rejection_reason: Set(None),
            ..Default::default()
        };
        let updated = self.transition(id, changes).await?;
        tracing::info!(oeuvre_id = id, owner_id = actor.id(), "work submitted");
        Ok(updated)
    }

    /// `pending -> published`, by a moderator
    pub async fn approve(&self, id: i32, validator_id: i32) -> Result<Model, ServiceError> {
        let actor = self.actor(validator_id).await?;
        let work = self.load_for(id, &actor).await?;
        actor.require_moderator()?;
        guard_status(&work, &[WorkStatus::Pending], "approve")?;

        let changes = ActiveModel {
            status: Set(WorkStatus::Published),
            validator_id: Set(Some(actor.id())),
            validated_at: Set(Some(now())),
            rejection_reason: Set(None),
            ..Default::default()
        };
        let updated = self.transition(id, changes).await?;
        tracing::info!(oeuvre_id = id, validator = actor.id(), "work published");
        Ok(updated)
    }

    /// `pending -> rejected`, by a moderator, with a mandatory reason
    pub async fn reject(
        &self,
        id: i32,
        validator_id: i32,
        reason: &str,
    ) -> Result<Model, ServiceError> {
        let actor = self.actor(validator_id).await?;
        let work = self.load_for(id, &actor).await?;
        actor.require_moderator()?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ServiceError::invalid("reason", "is required to reject a work"));
        }
        guard_status(&work, &[WorkStatus::Pending], "reject")?;

        let changes = ActiveModel {
            status: Set(WorkStatus::Rejected),
            validator_id: Set(Some(actor.id())),
            validated_at: Set(Some(now())),
            rejection_reason: Set(Some(reason.to_string())),
            ..Default::default()
        };
        let updated = self.transition(id, changes).await?;
        tracing::info!(oeuvre_id = id, validator = actor.id(), "work rejected");
        Ok(updated)
    }

    /// `published -> archived`, by the owner or an administrator
    pub async fn archive(&self, id: i32, actor_id: i32) -> Result<Model, ServiceError> {
        let actor = self.actor(actor_id).await?;
        let work = self.load_for(id, &actor).await?;
        actor.require_owner_or_admin(work.owner_id)?;
        guard_status(&work, &[WorkStatus::Published], "archive")?;

        let changes = ActiveModel {
            status: Set(WorkStatus::Archived),
            archived_at: Set(Some(now())),
            ..Default::default()
        };
        let updated = self.transition(id, changes).await?;
        tracing::info!(oeuvre_id = id, actor = actor.id(), "work archived");
        Ok(updated)
    }

    /// Soft delete: the row stays, with status `deleted`
    pub async fn delete(&self, id: i32, actor_id: i32) -> Result<Model, ServiceError> {
        let actor = self.actor(actor_id).await?;
        let work = self.load_for(id, &actor).await?;
        actor.require_owner_or_admin(work.owner_id)?;
        guard_status(
            &work,
            &[
                WorkStatus::Draft,
                WorkStatus::Pending,
                WorkStatus::Published,
                WorkStatus::Rejected,
                WorkStatus::Archived,
            ],
            "delete",
        )?;

        let changes = ActiveModel {
            status: Set(WorkStatus::Deleted),
            deleted_at: Set(Some(now())),
            ..Default::default()
        };
        let updated = self.transition(id, changes).await?;
        tracing::info!(oeuvre_id = id, actor = actor.id(), "work deleted");
        Ok(updated)
    }

    /// Remove a soft-deleted work for good. Join rows go with it.
    pub async fn purge(&self, id: i32, actor_id: i32) -> Result<(), ServiceError> {
        let actor = self.actor(actor_id).await?;
        actor.require_admin()?;
        let work = self.load(id).await?;
        guard_status(&work, &[WorkStatus::Deleted], "purge")?;

        if !self.works.delete(&self.db, id).await? {
            return Err(ServiceError::not_found(ENTITY, id));
        }
        tracing::info!(oeuvre_id = id, actor = actor.id(), "work purged");
        Ok(())
    }

    /// Works per status, every status listed. Unchecked: for startup
    /// reporting and callers that already hold moderator rights.
    pub async fn status_counts(&self) -> Result<Vec<(WorkStatus, u64)>, ServiceError> {
        Ok(self.works.count_by_status(&self.db).await?)
    }

    pub async fn stats(&self, actor_id: i32) -> Result<OeuvreStats, ServiceError> {
        self.actor(actor_id).await?.require_moderator()?;
        let created = self.works.stats(&self.db, "created_at").await?;
        let by_status = self
            .status_counts()
            .await?
            .into_iter()
            .map(|(status, total)| (status.to_string(), total))
            .collect();
        Ok(OeuvreStats { created, by_status })
    }
}

//! User queries on top of the generic repository

use std::ops::Deref;

use sea_orm::{ActiveValue::Set, ConnectionTrait};

use super::base_repository::{FindOptions, Repository};
use crate::domain::{Direction, Filter, PageLimits, PageRequest, Paginated, StorageError};
use crate::models::user::{ActiveModel, Entity as UserEntity, Model};
use crate::models::{UserType, ValidationStatus};

pub type UserStore = Repository<UserEntity, ActiveModel>;

/// Suspension metadata written by an administrator
#[derive(Debug, Clone)]
pub struct Suspension {
    pub suspended_by: i32,
    pub reason: String,
    pub suspended_at: String,
    pub suspended_until: Option<String>,
}

#[derive(Clone)]
pub struct UserRepository {
    base: UserStore,
}

impl Deref for UserRepository {
    type Target = UserStore;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl UserRepository {
    pub fn new(limits: PageLimits, max_search_length: usize) -> Self {
        Self {
            base: Repository::new("user")
                .with_limits(limits, max_search_length)
                .searchable(&["email", "display_name"])
                .translatable(&["display_name", "biography"])
                .default_order("created_at", Direction::Desc),
        }
    }

    pub async fn find_by_email<C: ConnectionTrait>(
        &self,
        db: &C,
        email: &str,
    ) -> Result<Option<Model>, StorageError> {
        let filter = Filter::new().eq("email", email.trim().to_lowercase());
        self.find_one(db, &filter).await
    }

    pub async fn find_by_type<C: ConnectionTrait>(
        &self,
        db: &C,
        user_type: UserType,
        page: PageRequest,
    ) -> Result<Paginated<Model>, StorageError> {
        let options = FindOptions {
            filter: Filter::new().eq("user_type", user_type),
            page,
            ..Default::default()
        };
        self.find_all(db, options).await
    }

    pub async fn find_by_validation_status<C: ConnectionTrait>(
        &self,
        db: &C,
        status: ValidationStatus,
        page: PageRequest,
    ) -> Result<Paginated<Model>, StorageError> {
        let options = FindOptions {
            filter: Filter::new().eq("validation_status", status),
            page,
            ..Default::default()
        };
        self.find_all(db, options).await
    }

    pub async fn find_suspended<C: ConnectionTrait>(
        &self,
        db: &C,
        page: PageRequest,
    ) -> Result<Paginated<Model>, StorageError> {
        let options = FindOptions {
            filter: Filter::new().eq("is_suspended", true),
            page,
            ..Default::default()
        };
        self.find_all(db, options).await
    }

    pub async fn set_validation<C: ConnectionTrait>(
        &self,
        db: &C,
        id: i32,
        status: ValidationStatus,
        validator_id: i32,
        rejection_reason: Option<String>,
    ) -> Result<Option<Model>, StorageError> {
        let changes = ActiveModel {
            validation_status: Set(status),
            validated_by: Set(Some(validator_id)),
            validated_at: Set(Some(chrono::Utc::now().to_rfc3339())),
            rejection_reason: Set(rejection_reason),
            ..Default::default()
        };
        self.update(db, id, changes).await
    }

    pub async fn set_suspension<C: ConnectionTrait>(
        &self,
        db: &C,
        id: i32,
        suspension: Suspension,
    ) -> Result<Option<Model>, StorageError> {
        let changes = ActiveModel {
            is_suspended: Set(true),
            is_active: Set(false),
            suspended_by: Set(Some(suspension.suspended_by)),
            suspension_reason: Set(Some(suspension.reason)),
            suspended_at: Set(Some(suspension.suspended_at)),
            suspended_until: Set(suspension.suspended_until),
            ..Default::default()
        };
        self.update(db, id, changes).await
    }

    /// Clear suspension metadata and mark the account active again
    pub async fn clear_suspension<C: ConnectionTrait>(
        &self,
        db: &C,
        id: i32,
    ) -> Result<Option<Model>, StorageError> {
        let changes = ActiveModel {
            is_suspended: Set(false),
            is_active: Set(true),
            suspended_by: Set(None),
            suspension_reason: Set(None),
            suspended_at: Set(None),
            suspended_until: Set(None),
            ..Default::default()
        };
        self.update(db, id, changes).await
    }
}

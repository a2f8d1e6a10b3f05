//! Account service: registration, profile edits and moderation
//!
//! Validation (`pending -> approved | rejected`) and suspension are
//! independent axes: an approved account can be suspended and reactivated
//! without its validation status changing.

use std::collections::BTreeMap;

use chrono::{Duration, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveEnum, DatabaseConnection};
use serde::Serialize;

use super::actor::{Actor, resolve_actor, suspension_expired};
use super::error::ServiceError;
use crate::auth::hash_password;
use crate::domain::{Filter, PageRequest, Paginated};
use crate::dto::{RegisterUserDto, UpdateUserDto};
use crate::infrastructure::repositories::{EntityStats, FindOptions, Suspension, UserRepository};
use crate::models::user::Model;
use crate::models::{UserType, ValidationStatus};

const ENTITY: &str = "user";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub registered: EntityStats,
    pub pending_validation: u64,
    pub suspended: u64,
    pub by_type: BTreeMap<String, u64>,
}

#[derive(Clone)]
pub struct UserService {
    db: DatabaseConnection,
    users: UserRepository,
}

fn required_reason(reason: &str, action: &str) -> Result<String, ServiceError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(ServiceError::invalid(
            "reason",
            &format!("is required to {action} an account"),
        ));
    }
    Ok(reason.to_string())
}

impl UserService {
    pub fn new(db: DatabaseConnection, users: UserRepository) -> Self {
        Self { db, users }
    }

    async fn actor(&self, actor_id: i32) -> Result<Actor, ServiceError> {
        resolve_actor(&self.users, &self.db, actor_id).await
    }

    async fn load(&self, id: i32) -> Result<Model, ServiceError> {
        self.users
            .find_by_id(&self.db, id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))
    }

    async fn ensure_email_free(&self, email: &str, except: Option<i32>) -> Result<(), ServiceError> {
        if let Some(existing) = self.users.find_by_email(&self.db, email).await?
            && Some(existing.id) != except
        {
            return Err(ServiceError::Conflict(String::from(
                "this email is already registered",
            )));
        }
        Ok(())
    }

    /// Create an account. Professional accounts start `pending`.
    pub async fn register(&self, dto: RegisterUserDto) -> Result<Model, ServiceError> {
        ServiceError::check(dto.validate())?;
        let email = dto.email.clone().unwrap_or_default();
        self.ensure_email_free(&email, None).await?;

        let password = dto.password.as_deref().unwrap_or_default();
        let password_hash = hash_password(password).map_err(ServiceError::Internal)?;
        let user = self
            .users
            .create(&self.db, dto.to_active_model(password_hash)?)
            .await?;

        tracing::info!(user_id = user.id, user_type = ?user.user_type, "account registered");
        Ok(user)
    }

    pub async fn get(&self, id: i32) -> Result<Model, ServiceError> {
        self.load(id).await
    }

    /// All accounts, for moderators
    pub async fn list(
        &self,
        actor_id: i32,
        options: FindOptions,
    ) -> Result<Paginated<Model>, ServiceError> {
        self.actor(actor_id).await?.require_moderator()?;
        Ok(self.users.find_all(&self.db, options).await?)
    }

    /// Approved, active professionals of one type
    pub async fn directory(
        &self,
        user_type: UserType,
        page: PageRequest,
    ) -> Result<Paginated<Model>, ServiceError> {
        let options = FindOptions {
            filter: Filter::new()
                .eq("user_type", user_type)
                .eq("validation_status", ValidationStatus::Approved)
                .eq("is_active", true)
                .eq("is_suspended", false),
            page,
            ..Default::default()
        };
        Ok(self.users.find_all(&self.db, options).await?)
    }

    pub async fn list_by_type(
        &self,
        actor_id: i32,
        user_type: UserType,
        page: PageRequest,
    ) -> Result<Paginated<Model>, ServiceError> {
        self.actor(actor_id).await?.require_moderator()?;
        Ok(self.users.find_by_type(&self.db, user_type, page).await?)
    }

    /// Accounts waiting for validation
    pub async fn pending_validations(
        &self,
        actor_id: i32,
        page: PageRequest,
    ) -> Result<Paginated<Model>, ServiceError> {
        self.actor(actor_id).await?.require_moderator()?;
        Ok(self
            .users
            .find_by_validation_status(&self.db, ValidationStatus::Pending, page)
            .await?)
    }

    pub async fn suspended(
        &self,
        actor_id: i32,
        page: PageRequest,
    ) -> Result<Paginated<Model>, ServiceError> {
        self.actor(actor_id).await?.require_admin()?;
        Ok(self.users.find_suspended(&self.db, page).await?)
    }

    /// Search email and display names in every language
    pub async fn search(
        &self,
        actor_id: i32,
        term: &str,
        options: FindOptions,
    ) -> Result<Paginated<Model>, ServiceError> {
        self.actor(actor_id).await?.require_moderator()?;
        Ok(self.users.search(&self.db, term, None, options).await?)
    }

    /// Edit one's own profile, or anyone's as an administrator.
    ///
    /// A non-admin switching to a professional type goes back to `pending`.
    pub async fn update_profile(
        &self,
        id: i32,
        actor_id: i32,
        dto: UpdateUserDto,
    ) -> Result<Model, ServiceError> {
        let actor = self.actor(actor_id).await?;
        let user = self.load(id).await?;
        actor.require_owner_or_admin(user.id)?;
        ServiceError::check(dto.validate())?;
        if !dto.has_changes() {
            return Ok(user);
        }
        if let Some(email) = &dto.email {
            self.ensure_email_free(email, Some(id)).await?;
        }

        let mut changes = dto.to_changes()?;
        if let Some(user_type) = dto.user_type
            && user_type != user.user_type
            && user_type.is_professional()
            && !actor.is_admin()
        {
            changes.validation_status = Set(ValidationStatus::Pending);
            changes.validated_by = Set(None);
            changes.validated_at = Set(None);
            changes.rejection_reason = Set(None);
        }

        let updated = self
            .users
            .update(&self.db, id, changes)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, id))?;
        tracing::info!(user_id = id, actor = actor.id(), "profile updated");
        Ok(updated)
    }

    /// `pending -> approved`
    pub async fn validate(&self, user_id: i32, validator_id: i32) -> Result<Model, ServiceError> {
        let actor = self.actor(validator_id).await?;
        let user = self.load(user_id).await?;
        actor.require_moderator()?;
        self.guard_pending(&user, "validate")?;

        let updated = self
            .users
            .set_validation(&self.db, user_id, ValidationStatus::Approved, actor.id(), None)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, user_id))?;
        tracing::info!(user_id, validator = actor.id(), "account validated");
        Ok(updated)
    }

    /// `pending -> rejected`, with a mandatory reason
    pub async fn reject(
        &self,
        user_id: i32,
        validator_id: i32,
        reason: &str,
    ) -> Result<Model, ServiceError> {
        let actor = self.actor(validator_id).await?;
        let user = self.load(user_id).await?;
        actor.require_moderator()?;
        let reason = required_reason(reason, "reject")?;
        self.guard_pending(&user, "reject")?;

        let updated = self
            .users
            .set_validation(
                &self.db,
                user_id,
                ValidationStatus::Rejected,
                actor.id(),
                Some(reason),
            )
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, user_id))?;
        tracing::info!(user_id, validator = actor.id(), "account rejected");
        Ok(updated)
    }

    fn guard_pending(&self, user: &Model, action: &str) -> Result<(), ServiceError> {
        if user.validation_status == ValidationStatus::Pending {
            return Ok(());
        }
        tracing::warn!(user_id = user.id, status = ?user.validation_status, action, "transition refused");
        Err(ServiceError::Conflict(format!(
            "cannot {action} an account that is not pending"
        )))
    }

    /// Suspend for `duration_days`, or indefinitely when `None`
    pub async fn suspend(
        &self,
        user_id: i32,
        admin_id: i32,
        duration_days: Option<u32>,
        reason: &str,
    ) -> Result<Model, ServiceError> {
        let actor = self.actor(admin_id).await?;
        let user = self.load(user_id).await?;
        actor.require_admin()?;
        let reason = required_reason(reason, "suspend")?;
        if duration_days == Some(0) {
            return Err(ServiceError::invalid(
                "duration_days",
                "must be at least one day",
            ));
        }
        if user.id == actor.id() {
            return Err(ServiceError::Conflict(String::from(
                "administrators cannot suspend themselves",
            )));
        }
        // A lapsed timed suspension is only lifted when the account next acts
        let now = Utc::now();
        if user.is_suspended && !suspension_expired(&user, now) {
            tracing::warn!(user_id, "already suspended");
            return Err(ServiceError::Conflict(String::from(
                "account is already suspended",
            )));
        }

        let suspension = Suspension {
            suspended_by: actor.id(),
            reason,
            suspended_at: now.to_rfc3339(),
            suspended_until: duration_days
                .map(|days| (now + Duration::days(i64::from(days))).to_rfc3339()),
        };
        let updated = self
            .users
            .set_suspension(&self.db, user_id, suspension)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, user_id))?;
        tracing::info!(user_id, admin = actor.id(), ?duration_days, "account suspended");
        Ok(updated)
    }

    /// Lift a suspension and mark the account active again
    pub async fn reactivate(&self, user_id: i32, admin_id: i32) -> Result<Model, ServiceError> {
        let actor = self.actor(admin_id).await?;
        let user = self.load(user_id).await?;
        actor.require_admin()?;
        if user.can_act() {
            return Err(ServiceError::Conflict(String::from(
                "account is already active",
            )));
        }

        let updated = self
            .users
            .clear_suspension(&self.db, user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(ENTITY, user_id))?;
        tracing::info!(user_id, admin = actor.id(), "account reactivated");
        Ok(updated)
    }

    /// Remove the account row. Owned works go with it.
    pub async fn delete(&self, user_id: i32, admin_id: i32) -> Result<(), ServiceError> {
        let actor = self.actor(admin_id).await?;
        actor.require_admin()?;
        if user_id == actor.id() {
            return Err(ServiceError::Conflict(String::from(
                "administrators cannot delete themselves",
            )));
        }
        if !self.users.delete(&self.db, user_id).await? {
            return Err(ServiceError::not_found(ENTITY, user_id));
        }
        tracing::info!(user_id, admin = actor.id(), "account deleted");
        Ok(())
    }

    pub async fn stats(&self, actor_id: i32) -> Result<UserStats, ServiceError> {
        self.actor(actor_id).await?.require_moderator()?;
        let registered = self.users.stats(&self.db, "created_at").await?;
        let pending_validation = self
            .users
            .count(
                &self.db,
                &Filter::new().eq("validation_status", ValidationStatus::Pending),
            )
            .await?;
        let suspended = self
            .users
            .count(&self.db, &Filter::new().eq("is_suspended", true))
            .await?;

        let mut by_type = BTreeMap::new();
        for user_type in [
            UserType::Visitor,
            UserType::Author,
            UserType::Artist,
            UserType::Artisan,
            UserType::Researcher,
            UserType::Institution,
        ] {
            let total = self
                .users
                .count(&self.db, &Filter::new().eq("user_type", user_type))
                .await?;
            by_type.insert(user_type.to_value(), total);
        }

        Ok(UserStats {
            registered,
            pending_validation,
            suspended,
            by_type,
        })
    }
}

//! Identity behind moderation calls

use chrono::{DateTime, Utc};
use sea_orm::ConnectionTrait;

use super::error::ServiceError;
use crate::infrastructure::repositories::UserRepository;
use crate::models::Role;
use crate::models::user::Model as User;

/// A resolved, allowed-to-act user
#[derive(Debug, Clone)]
pub struct Actor {
    pub user: User,
}

impl Actor {
    pub fn id(&self) -> i32 {
        self.user.id
    }

    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn is_admin(&self) -> bool {
        self.user.role.is_admin()
    }

    pub fn require_admin(&self) -> Result<(), ServiceError> {
        if self.is_admin() {
            return Ok(());
        }
        tracing::warn!(actor = self.id(), "admin operation refused");
        Err(ServiceError::Forbidden(String::from(
            "this operation requires an administrator",
        )))
    }

    pub fn require_moderator(&self) -> Result<(), ServiceError> {
        if self.user.role.can_moderate() {
            return Ok(());
        }
        tracing::warn!(actor = self.id(), "moderation refused");
        Err(ServiceError::Forbidden(String::from(
            "this operation requires a moderator",
        )))
    }

    pub fn require_owner_or_admin(&self, owner_id: i32) -> Result<(), ServiceError> {
        if self.id() == owner_id || self.is_admin() {
            return Ok(());
        }
        tracing::warn!(actor = self.id(), owner_id, "ownership check failed");
        Err(ServiceError::Forbidden(String::from(
            "only the owner or an administrator may do this",
        )))
    }
}

/// `true` when a timed suspension has run out at `now`
pub fn suspension_expired(user: &User, now: DateTime<Utc>) -> bool {
    user.is_suspended
        && user
            .suspended_until
            .as_deref()
            .and_then(|until| DateTime::parse_from_rfc3339(until).ok())
            .is_some_and(|until| until.with_timezone(&Utc) <= now)
}

/// Look up `actor_id` and make sure the account may act.
///
/// Unknown ids are `Unauthorized`; suspended or inactive accounts are
/// `Forbidden`. A timed suspension that has expired is lifted on the way.
pub async fn resolve_actor<C: ConnectionTrait>(
    users: &UserRepository,
    db: &C,
    actor_id: i32,
) -> Result<Actor, ServiceError> {
    let Some(mut user) = users.find_by_id(db, actor_id).await? else {
        tracing::warn!(actor_id, "unknown actor");
        return Err(ServiceError::Unauthorized(String::from("unknown actor")));
    };

    if suspension_expired(&user, Utc::now()) {
        tracing::info!(user_id = user.id, "suspension expired, lifting");
        if let Some(lifted) = users.clear_suspension(db, user.id).await? {
            user = lifted;
        }
    }

    if !user.can_act() {
        tracing::warn!(actor_id, "inactive or suspended actor");
        return Err(ServiceError::Forbidden(String::from(
            "account is suspended or inactive",
        )));
    }
    Ok(Actor { user })
}

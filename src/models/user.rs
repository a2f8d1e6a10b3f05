use sea_orm::Iterable;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::TranslatableText;

/// Visitor account or one of the professional categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    #[sea_orm(string_value = "visitor")]
    Visitor,
    #[sea_orm(string_value = "author")]
    Author,
    #[sea_orm(string_value = "artist")]
    Artist,
    #[sea_orm(string_value = "artisan")]
    Artisan,
    #[sea_orm(string_value = "researcher")]
    Researcher,
    #[sea_orm(string_value = "institution")]
    Institution,
}

impl UserType {
    pub fn parse(raw: &str) -> Option<UserType> {
        let raw = raw.trim().to_ascii_lowercase();
        <UserType as Iterable>::iter().find(|t| t.to_value() == raw)
    }

    pub fn is_professional(self) -> bool {
        self != UserType::Visitor
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "moderator")]
    Moderator,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl Role {
    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }

    pub fn can_moderate(self) -> bool {
        matches!(self, Role::Moderator | Role::Admin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name_fr: Option<String>,
    pub display_name_ar: Option<String>,
    pub display_name_en: Option<String>,
    pub display_name_tz_ltn: Option<String>,
    pub display_name_tz_tfng: Option<String>,
    pub biography_fr: Option<String>,
    pub biography_ar: Option<String>,
    pub biography_en: Option<String>,
    pub biography_tz_ltn: Option<String>,
    pub biography_tz_tfng: Option<String>,
    pub user_type: UserType,
    pub role: Role,
    pub validation_status: ValidationStatus,
    pub validated_by: Option<i32>,
    pub validated_at: Option<String>,
    pub rejection_reason: Option<String>,
    pub is_active: bool,
    pub is_suspended: bool,
    pub suspended_by: Option<i32>,
    pub suspension_reason: Option<String>,
    pub suspended_at: Option<String>,
    /// `None` while suspended means indefinitely
    pub suspended_until: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn display_name(&self) -> TranslatableText {
        TranslatableText::from_columns(
            &self.display_name_fr,
            &self.display_name_ar,
            &self.display_name_en,
            &self.display_name_tz_ltn,
            &self.display_name_tz_tfng,
        )
    }

    pub fn biography(&self) -> TranslatableText {
        TranslatableText::from_columns(
            &self.biography_fr,
            &self.biography_ar,
            &self.biography_en,
            &self.biography_tz_ltn,
            &self.biography_tz_tfng,
        )
    }

    /// Active, not suspended and allowed to act
    pub fn can_act(&self) -> bool {
        self.is_active && !self.is_suspended
    }
}

use sea_orm::Iterable;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::TranslatableText;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum WorkType {
    #[sea_orm(string_value = "book")]
    Book,
    #[sea_orm(string_value = "film")]
    Film,
    #[sea_orm(string_value = "music")]
    Music,
    #[sea_orm(string_value = "theater")]
    Theater,
    #[sea_orm(string_value = "painting")]
    Painting,
    #[sea_orm(string_value = "sculpture")]
    Sculpture,
    #[sea_orm(string_value = "photography")]
    Photography,
    #[sea_orm(string_value = "craft")]
    Craft,
    #[sea_orm(string_value = "other")]
    Other,
}

impl WorkType {
    pub fn parse(raw: &str) -> Option<WorkType> {
        let raw = raw.trim().to_ascii_lowercase();
        <WorkType as Iterable>::iter().find(|t| t.to_value() == raw)
    }
}

/// Publication lifecycle of a work
///
/// `draft -> pending -> published | rejected`, `published -> archived`,
/// and any state except `deleted` may move to `deleted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "published")]
    Published,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "archived")]
    Archived,
    #[sea_orm(string_value = "deleted")]
    Deleted,
}

impl WorkStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkStatus::Draft => "draft",
            WorkStatus::Pending => "pending",
            WorkStatus::Published => "published",
            WorkStatus::Rejected => "rejected",
            WorkStatus::Archived => "archived",
            WorkStatus::Deleted => "deleted",
        }
    }

    pub fn parse(raw: &str) -> Option<WorkStatus> {
        <WorkStatus as Iterable>::iter().find(|s| s.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

impl std::fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "oeuvres")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title_fr: Option<String>,
    pub title_ar: Option<String>,
    pub title_en: Option<String>,
    pub title_tz_ltn: Option<String>,
    pub title_tz_tfng: Option<String>,
    pub description_fr: Option<String>,
    pub description_ar: Option<String>,
    pub description_en: Option<String>,
    pub description_tz_ltn: Option<String>,
    pub description_tz_tfng: Option<String>,
    pub work_type: WorkType,
    pub publication_year: Option<i32>,
    pub original_language: Option<String>,
    pub owner_id: i32,
    pub validator_id: Option<i32>,
    pub status: WorkStatus,
    pub submitted_at: Option<String>,
    pub validated_at: Option<String>,
    pub rejection_reason: Option<String>,
    pub archived_at: Option<String>,
    pub deleted_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        super::oeuvre_categories::Relation::Category.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::oeuvre_categories::Relation::Oeuvre.def().rev())
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::oeuvre_tags::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::oeuvre_tags::Relation::Oeuvre.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn title(&self) -> TranslatableText {
        TranslatableText::from_columns(
            &self.title_fr,
            &self.title_ar,
            &self.title_en,
            &self.title_tz_ltn,
            &self.title_tz_tfng,
        )
    }

    pub fn description(&self) -> TranslatableText {
        TranslatableText::from_columns(
            &self.description_fr,
            &self.description_ar,
            &self.description_en,
            &self.description_tz_ltn,
            &self.description_tz_tfng,
        )
    }
}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::TranslatableText;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub slug: String,
    pub name_fr: Option<String>,
    pub name_ar: Option<String>,
    pub name_en: Option<String>,
    pub name_tz_ltn: Option<String>,
    pub name_tz_tfng: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::oeuvre::Entity> for Entity {
    fn to() -> RelationDef {
        super::oeuvre_tags::Relation::Oeuvre.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::oeuvre_tags::Relation::Tag.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn name(&self) -> TranslatableText {
        TranslatableText::from_columns(
            &self.name_fr,
            &self.name_ar,
            &self.name_en,
            &self.name_tz_ltn,
            &self.name_tz_tfng,
        )
    }
}

use serde::Serialize;
use serde_json::Value;

use super::input::{AliasTable, RawInput};
use super::localized::{LocalizedText, Localization};
use super::validation::{Checks, ValidationResult};
use crate::domain::{Language, TranslatableText};
use crate::models::{category, tag};

const TAXONOMY_FIELDS: AliasTable = &[("name", &["label", "nom"]), ("slug", &["code"])];

/// Payload for a new category or tag
#[derive(Debug, Clone)]
pub struct CreateTaxonomyDto {
    pub name: TranslatableText,
    /// Derived from the name when absent
    pub slug: Option<String>,
}

impl CreateTaxonomyDto {
    pub fn from_request(payload: Value, lang: Language) -> Self {
        let input = RawInput::new(payload, TAXONOMY_FIELDS);
        Self {
            name: input.translatable("name", lang).unwrap_or_default(),
            slug: input.string("slug"),
        }
    }

    pub fn validate(&self) -> ValidationResult {
        let mut checks = Checks::default();
        checks.check(
            !self.name.is_empty(),
            "name",
            "at least one language variant is required",
        );
        if let Some(slug) = &self.slug {
            checks.check(
                slug.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "slug",
                "may only contain lowercase letters, digits and dashes",
            );
        }
        checks.max_len(self.slug.as_deref(), 80, "slug");
        checks.finish()
    }
}

/// Category or tag as embedded in other shapes
#[derive(Debug, Clone, Serialize)]
pub struct TaxonomyDto {
    pub id: i32,
    pub slug: String,
    pub name: LocalizedText,
}

impl TaxonomyDto {
    pub fn from_category(model: &category::Model, loc: Localization) -> Self {
        Self {
            id: model.id,
            slug: model.slug.clone(),
            name: loc.render(&model.name()),
        }
    }

    pub fn from_tag(model: &tag::Model, loc: Localization) -> Self {
        Self {
            id: model.id,
            slug: model.slug.clone(),
            name: loc.render(&model.name()),
        }
    }
}

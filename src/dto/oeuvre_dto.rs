//! Work transfer objects

use sea_orm::ActiveValue::Set;
use serde::Serialize;
use serde_json::Value;

use super::input::{AliasTable, RawInput};
use super::localized::{LocalizedText, Localization};
use super::taxonomy_dto::TaxonomyDto;
use super::user_dto::OwnerSummaryDto;
use super::validation::{Checks, FieldError, ValidationResult};
use crate::domain::{Language, StorageError, TranslatableText};
use crate::infrastructure::repositories::{AssignMode, OeuvreRecord, assign_translatable};
use crate::models::oeuvre::{ActiveModel, Model};
use crate::models::{WorkStatus, WorkType};

const TITLE_MAX: usize = 255;
const DESCRIPTION_MAX: usize = 10_000;
const MIN_YEAR: i32 = -3000;

const OEUVRE_FIELDS: AliasTable = &[
    ("title", &["titre", "name"]),
    ("description", &["desc", "resume"]),
    ("work_type", &["workType", "type", "type_oeuvre"]),
    ("publication_year", &["publicationYear", "year", "annee"]),
    ("original_language", &["originalLanguage", "langue_originale"]),
    ("category_ids", &["categoryIds", "categories"]),
    ("tag_ids", &["tagIds", "tags"]),
];

fn latest_year() -> i32 {
    use chrono::Datelike;
    chrono::Utc::now().year() + 1
}

fn check_common(
    checks: &mut Checks,
    title: Option<&TranslatableText>,
    description: Option<&TranslatableText>,
    publication_year: Option<i32>,
    original_language: Option<&str>,
) {
    if let Some(title) = title {
        for (lang, text) in title.populated() {
            checks.max_len(Some(text), TITLE_MAX, &format!("title.{}", lang.code()));
        }
    }
    if let Some(description) = description {
        for (lang, text) in description.populated() {
            checks.max_len(
                Some(text),
                DESCRIPTION_MAX,
                &format!("description.{}", lang.code()),
            );
        }
    }
    if let Some(year) = publication_year {
        checks.check(
            (MIN_YEAR..=latest_year()).contains(&year),
            "publication_year",
            "is out of range",
        );
    }
    checks.max_len(original_language, 16, "original_language");
}

fn parse_work_type(input: &RawInput) -> (Option<WorkType>, Option<String>) {
    let raw = input.string("work_type");
    let parsed = raw.as_deref().and_then(WorkType::parse);
    (parsed, raw)
}

/// Payload for creating a work
#[derive(Debug, Clone)]
pub struct CreateOeuvreDto {
    pub title: TranslatableText,
    pub description: TranslatableText,
    pub work_type: Option<WorkType>,
    pub publication_year: Option<i32>,
    pub original_language: Option<String>,
    pub category_ids: Vec<i32>,
    pub tag_ids: Vec<i32>,
    work_type_raw: Option<String>,
    coercion: Vec<FieldError>,
}

impl CreateOeuvreDto {
    /// Plain strings in translatable fields are taken as `lang`.
    pub fn from_request(payload: Value, lang: Language) -> Self {
        let input = RawInput::new(payload, OEUVRE_FIELDS);
        let (work_type, work_type_raw) = parse_work_type(&input);
        let dto = Self {
            title: input.translatable("title", lang).unwrap_or_default(),
            description: input.translatable("description", lang).unwrap_or_default(),
            work_type,
            publication_year: input.integer("publication_year"),
            original_language: input.string("original_language"),
            category_ids: input.id_list("category_ids").unwrap_or_default(),
            tag_ids: input.id_list("tag_ids").unwrap_or_default(),
            work_type_raw,
            coercion: Vec::new(),
        };
        Self {
            coercion: input.coercion_errors(),
            ..dto
        }
    }

    pub fn validate(&self) -> ValidationResult {
        let mut checks = Checks::starting_with(self.coercion.clone());
        checks.check(
            !self.title.is_empty(),
            "title",
            "at least one language variant is required",
        );
        match (&self.work_type, &self.work_type_raw) {
            (Some(_), _) => {}
            (None, Some(_)) => checks.check(false, "work_type", "is not a known work type"),
            (None, None) => checks.check(false, "work_type", "is required"),
        }
        check_common(
            &mut checks,
            Some(&self.title),
            Some(&self.description),
            self.publication_year,
            self.original_language.as_deref(),
        );
        checks.finish()
    }

    /// Draft row owned by `owner_id`. Call after a successful `validate()`.
    pub fn to_active_model(&self, owner_id: i32) -> Result<ActiveModel, StorageError> {
        let mut active = ActiveModel {
            work_type: Set(self.work_type.unwrap_or(WorkType::Other)),
            publication_year: Set(self.publication_year),
            original_language: Set(self.original_language.clone()),
            owner_id: Set(owner_id),
            validator_id: Set(None),
            status: Set(WorkStatus::Draft),
            submitted_at: Set(None),
            validated_at: Set(None),
            rejection_reason: Set(None),
            archived_at: Set(None),
            deleted_at: Set(None),
            ..Default::default()
        };
        assign_translatable(&mut active, "title", &self.title, AssignMode::Replace)?;
        assign_translatable(&mut active, "description", &self.description, AssignMode::Replace)?;
        Ok(active)
    }
}

/// Partial update of a work. Only fields present in the payload are set;
/// `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default)]
pub struct UpdateOeuvreDto {
    pub title: Option<TranslatableText>,
    pub description: Option<TranslatableText>,
    pub work_type: Option<WorkType>,
    pub publication_year: Option<Option<i32>>,
    pub original_language: Option<Option<String>>,
    pub category_ids: Option<Vec<i32>>,
    pub tag_ids: Option<Vec<i32>>,
    work_type_raw: Option<String>,
    coercion: Vec<FieldError>,
}

impl UpdateOeuvreDto {
    pub fn from_request(payload: Value, lang: Language) -> Self {
        let input = RawInput::new(payload, OEUVRE_FIELDS);
        let (work_type, work_type_raw) = parse_work_type(&input);
        let dto = Self {
            title: input.translatable("title", lang),
            description: input.translatable("description", lang),
            work_type,
            publication_year: input.nullable_integer("publication_year"),
            original_language: input.nullable_string("original_language"),
            category_ids: input.id_list("category_ids"),
            tag_ids: input.id_list("tag_ids"),
            work_type_raw,
            coercion: Vec::new(),
        };
        Self {
            coercion: input.coercion_errors(),
            ..dto
        }
    }

    pub fn has_changes(&self) -> bool {
        self.has_field_changes() || self.category_ids.is_some() || self.tag_ids.is_some()
    }

    /// Whether any column of the work row itself changes
    fn has_field_changes(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.work_type.is_some()
            || self.publication_year.is_some()
            || self.original_language.is_some()
    }

    pub fn validate(&self) -> ValidationResult {
        let mut checks = Checks::starting_with(self.coercion.clone());
        if let Some(title) = &self.title {
            checks.check(
                !title.is_empty(),
                "title",
                "at least one language variant is required",
            );
        }
        checks.check(
            self.work_type.is_some() || self.work_type_raw.is_none(),
            "work_type",
            "is not a known work type",
        );
        check_common(
            &mut checks,
            self.title.as_ref(),
            self.description.as_ref(),
            self.publication_year.flatten(),
            self.original_language.as_ref().and_then(|l| l.as_deref()),
        );
        checks.finish()
    }

    /// Column changes for the repository's partial update. Translatable
    /// fields are merged: languages missing from the payload keep their
    /// stored value.
    pub fn to_changes(&self) -> Result<ActiveModel, StorageError> {
        let mut active = ActiveModel::default();
        if let Some(title) = &self.title {
            assign_translatable(&mut active, "title", title, AssignMode::Merge)?;
        }
        if let Some(description) = &self.description {
            assign_translatable(&mut active, "description", description, AssignMode::Merge)?;
        }
        if let Some(work_type) = self.work_type {
            active.work_type = Set(work_type);
        }
        if let Some(year) = self.publication_year {
            active.publication_year = Set(year);
        }
        if let Some(language) = &self.original_language {
            active.original_language = Set(language.clone());
        }
        Ok(active)
    }
}

/// Work as shown to anyone
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OeuvrePublicDto {
    pub id: i32,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub work_type: WorkType,
    pub publication_year: Option<i32>,
    pub original_language: Option<String>,
    pub published_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerSummaryDto>,
    pub categories: Vec<TaxonomyDto>,
    pub tags: Vec<TaxonomyDto>,
}

impl OeuvrePublicDto {
    pub fn from_record(record: &OeuvreRecord, loc: Localization) -> Self {
        let work = &record.work;
        Self {
            id: work.id,
            title: loc.render(&work.title()),
            description: loc.render(&work.description()),
            work_type: work.work_type,
            publication_year: work.publication_year,
            original_language: work.original_language.clone(),
            published_at: (work.status == WorkStatus::Published)
                .then(|| work.validated_at.clone())
                .flatten(),
            owner: record
                .owner
                .as_ref()
                .map(|owner| OwnerSummaryDto::from_model(owner, loc)),
            categories: record
                .categories
                .iter()
                .map(|c| TaxonomyDto::from_category(c, loc))
                .collect(),
            tags: record
                .tags
                .iter()
                .map(|t| TaxonomyDto::from_tag(t, loc))
                .collect(),
        }
    }
}

/// Work with its moderation and audit fields
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OeuvreAdminDto {
    #[serde(flatten)]
    pub public: OeuvrePublicDto,
    pub status: WorkStatus,
    pub owner_id: i32,
    pub validator_id: Option<i32>,
    pub submitted_at: Option<String>,
    pub validated_at: Option<String>,
    pub rejection_reason: Option<String>,
    pub archived_at: Option<String>,
    pub deleted_at: Option<String>,
    pub category_ids: Vec<i32>,
    pub tag_ids: Vec<i32>,
    pub created_at: String,
    pub updated_at: String,
}

impl OeuvreAdminDto {
    pub fn from_record(record: &OeuvreRecord, loc: Localization) -> Self {
        let work = &record.work;
        Self {
            public: OeuvrePublicDto::from_record(record, loc),
            status: work.status,
            owner_id: work.owner_id,
            validator_id: work.validator_id,
            submitted_at: work.submitted_at.clone(),
            validated_at: work.validated_at.clone(),
            rejection_reason: work.rejection_reason.clone(),
            archived_at: work.archived_at.clone(),
            deleted_at: work.deleted_at.clone(),
            category_ids: record.category_ids(),
            tag_ids: record.tag_ids(),
            created_at: work.created_at.clone(),
            updated_at: work.updated_at.clone(),
        }
    }
}

/// Minimal row for collection views
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OeuvreListItemDto {
    pub id: i32,
    pub title: LocalizedText,
    pub work_type: WorkType,
    pub status: WorkStatus,
    pub publication_year: Option<i32>,
    pub owner_id: i32,
    pub created_at: String,
}

impl OeuvreListItemDto {
    pub fn from_model(work: &Model, loc: Localization) -> Self {
        Self {
            id: work.id,
            title: loc.render(&work.title()),
            work_type: work.work_type,
            status: work.status,
            publication_year: work.publication_year,
            owner_id: work.owner_id,
            created_at: work.created_at.clone(),
        }
    }
}

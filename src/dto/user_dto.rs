//! User transfer objects

use sea_orm::ActiveValue::Set;
use serde::Serialize;
use serde_json::Value;
use validator::ValidateEmail;

use super::input::{AliasTable, RawInput};
use super::localized::{LocalizedText, Localization};
use super::validation::{Checks, FieldError, ValidationResult};
use crate::domain::{Language, StorageError, TranslatableText};
use crate::infrastructure::repositories::{AssignMode, assign_translatable};
use crate::models::user::{ActiveModel, Model};
use crate::models::{Role, UserType, ValidationStatus};

pub const MIN_PASSWORD_LENGTH: usize = 8;
const NAME_MAX: usize = 120;
const BIOGRAPHY_MAX: usize = 5_000;

const USER_FIELDS: AliasTable = &[
    ("email", &["mail", "emailAddress", "email_address"]),
    ("password", &["pwd", "mot_de_passe"]),
    ("display_name", &["displayName", "name", "nom"]),
    ("biography", &["bio", "biographie"]),
    ("user_type", &["userType", "type"]),
];

fn check_profile(
    checks: &mut Checks,
    display_name: Option<&TranslatableText>,
    biography: Option<&TranslatableText>,
) {
    if let Some(name) = display_name {
        checks.check(
            !name.is_empty(),
            "display_name",
            "at least one language variant is required",
        );
        for (lang, text) in name.populated() {
            checks.max_len(Some(text), NAME_MAX, &format!("display_name.{}", lang.code()));
        }
    }
    if let Some(bio) = biography {
        for (lang, text) in bio.populated() {
            checks.max_len(Some(text), BIOGRAPHY_MAX, &format!("biography.{}", lang.code()));
        }
    }
}

fn check_email(checks: &mut Checks, email: Option<&String>, required: bool) {
    match email {
        Some(email) => checks.check(email.clone().validate_email(), "email", "is not a valid email"),
        None => checks.check(!required, "email", "is required"),
    }
}

/// Self-service registration payload
#[derive(Debug, Clone)]
pub struct RegisterUserDto {
    pub email: Option<String>,
    pub password: Option<String>,
    pub display_name: TranslatableText,
    pub biography: TranslatableText,
    pub user_type: UserType,
    user_type_raw: Option<String>,
    coercion: Vec<FieldError>,
}

impl RegisterUserDto {
    pub fn from_request(payload: Value, lang: Language) -> Self {
        let input = RawInput::new(payload, USER_FIELDS);
        let user_type_raw = input.string("user_type");
        let dto = Self {
            email: input.string("email").map(|e| e.to_lowercase()),
            // Passwords are taken verbatim, surrounding spaces included
            password: input
                .get("password")
                .and_then(Value::as_str)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            display_name: input.translatable("display_name", lang).unwrap_or_default(),
            biography: input.translatable("biography", lang).unwrap_or_default(),
            user_type: user_type_raw
                .as_deref()
                .and_then(UserType::parse)
                .unwrap_or(UserType::Visitor),
            user_type_raw,
            coercion: Vec::new(),
        };
        Self {
            coercion: input.coercion_errors(),
            ..dto
        }
    }

    pub fn validate(&self) -> ValidationResult {
        let mut checks = Checks::starting_with(self.coercion.clone());
        check_email(&mut checks, self.email.as_ref(), true);
        match &self.password {
            Some(password) => checks.check(
                password.chars().count() >= MIN_PASSWORD_LENGTH,
                "password",
                "must be at least 8 characters",
            ),
            None => checks.check(false, "password", "is required"),
        }
        check_profile(&mut checks, Some(&self.display_name), Some(&self.biography));
        checks.check(
            self.user_type_raw
                .as_deref()
                .is_none_or(|raw| UserType::parse(raw).is_some()),
            "user_type",
            "is not a known user type",
        );
        checks.finish()
    }

    /// New account row. Visitors are approved immediately, professional
    /// accounts wait for validation.
    pub fn to_active_model(&self, password_hash: String) -> Result<ActiveModel, StorageError> {
        let validation_status = if self.user_type.is_professional() {
            ValidationStatus::Pending
        } else {
            ValidationStatus::Approved
        };
        let mut active = ActiveModel {
            email: Set(self.email.clone().unwrap_or_default()),
            password_hash: Set(password_hash),
            user_type: Set(self.user_type),
            role: Set(Role::User),
            validation_status: Set(validation_status),
            validated_by: Set(None),
            validated_at: Set(None),
            rejection_reason: Set(None),
            is_active: Set(true),
            is_suspended: Set(false),
            suspended_by: Set(None),
            suspension_reason: Set(None),
            suspended_at: Set(None),
            suspended_until: Set(None),
            ..Default::default()
        };
        assign_translatable(&mut active, "display_name", &self.display_name, AssignMode::Replace)?;
        assign_translatable(&mut active, "biography", &self.biography, AssignMode::Replace)?;
        Ok(active)
    }
}

/// Partial profile update
#[derive(Debug, Clone, Default)]
pub struct UpdateUserDto {
    pub email: Option<String>,
    pub display_name: Option<TranslatableText>,
    pub biography: Option<TranslatableText>,
    pub user_type: Option<UserType>,
    user_type_raw: Option<String>,
    coercion: Vec<FieldError>,
}

impl UpdateUserDto {
    pub fn from_request(payload: Value, lang: Language) -> Self {
        let input = RawInput::new(payload, USER_FIELDS);
        let user_type_raw = input.string("user_type");
        let dto = Self {
            email: input.string("email").map(|e| e.to_lowercase()),
            display_name: input.translatable("display_name", lang),
            biography: input.translatable("biography", lang),
            user_type: user_type_raw.as_deref().and_then(UserType::parse),
            user_type_raw,
            coercion: Vec::new(),
        };
        Self {
            coercion: input.coercion_errors(),
            ..dto
        }
    }

    pub fn has_changes(&self) -> bool {
        self.email.is_some()
            || self.display_name.is_some()
            || self.biography.is_some()
            || self.user_type.is_some()
    }

    pub fn validate(&self) -> ValidationResult {
        let mut checks = Checks::starting_with(self.coercion.clone());
        check_email(&mut checks, self.email.as_ref(), false);
        check_profile(&mut checks, self.display_name.as_ref(), self.biography.as_ref());
        checks.check(
            self.user_type.is_some() || self.user_type_raw.is_none(),
            "user_type",
            "is not a known user type",
        );
        checks.finish()
    }

    pub fn to_changes(&self) -> Result<ActiveModel, StorageError> {
        let mut active = ActiveModel::default();
        if let Some(email) = &self.email {
            active.email = Set(email.clone());
        }
        if let Some(name) = &self.display_name {
            assign_translatable(&mut active, "display_name", name, AssignMode::Merge)?;
        }
        if let Some(bio) = &self.biography {
            assign_translatable(&mut active, "biography", bio, AssignMode::Merge)?;
        }
        if let Some(user_type) = self.user_type {
            active.user_type = Set(user_type);
        }
        Ok(active)
    }
}

/// Owner shown next to a work
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummaryDto {
    pub id: i32,
    pub display_name: LocalizedText,
    pub user_type: UserType,
}

impl OwnerSummaryDto {
    pub fn from_model(user: &Model, loc: Localization) -> Self {
        Self {
            id: user.id,
            display_name: loc.render(&user.display_name()),
            user_type: user.user_type,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPublicDto {
    pub id: i32,
    pub display_name: LocalizedText,
    pub biography: LocalizedText,
    pub user_type: UserType,
    pub created_at: String,
}

impl UserPublicDto {
    pub fn from_model(user: &Model, loc: Localization) -> Self {
        Self {
            id: user.id,
            display_name: loc.render(&user.display_name()),
            biography: loc.render(&user.biography()),
            user_type: user.user_type,
            created_at: user.created_at.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuspensionDto {
    pub suspended_by: Option<i32>,
    pub reason: Option<String>,
    pub suspended_at: Option<String>,
    pub suspended_until: Option<String>,
}

/// Account with moderation fields. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAdminDto {
    #[serde(flatten)]
    pub public: UserPublicDto,
    pub email: String,
    pub role: Role,
    pub validation_status: ValidationStatus,
    pub validated_by: Option<i32>,
    pub validated_at: Option<String>,
    pub rejection_reason: Option<String>,
    pub is_active: bool,
    pub is_suspended: bool,
    pub suspension: Option<SuspensionDto>,
    pub updated_at: String,
}

impl UserAdminDto {
    pub fn from_model(user: &Model, loc: Localization) -> Self {
        Self {
            public: UserPublicDto::from_model(user, loc),
            email: user.email.clone(),
            role: user.role,
            validation_status: user.validation_status,
            validated_by: user.validated_by,
            validated_at: user.validated_at.clone(),
            rejection_reason: user.rejection_reason.clone(),
            is_active: user.is_active,
            is_suspended: user.is_suspended,
            suspension: user.is_suspended.then(|| SuspensionDto {
                suspended_by: user.suspended_by,
                reason: user.suspension_reason.clone(),
                suspended_at: user.suspended_at.clone(),
                suspended_until: user.suspended_until.clone(),
            }),
            updated_at: user.updated_at.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListItemDto {
    pub id: i32,
    pub display_name: LocalizedText,
    pub user_type: UserType,
    pub validation_status: ValidationStatus,
    pub is_suspended: bool,
}

impl UserListItemDto {
    pub fn from_model(user: &Model, loc: Localization) -> Self {
        Self {
            id: user.id,
            display_name: loc.render(&user.display_name()),
            user_type: user.user_type,
            validation_status: user.validation_status,
            is_suspended: user.is_suspended,
        }
    }
}

//! Service error taxonomy
//!
//! Every service operation fails with one of these kinds. Storage failures
//! are translated here so callers never inspect storage messages.

use axum::http::StatusCode;
use sea_orm::DbErr;

use crate::domain::StorageError;
use crate::dto::{FieldError, ValidationResult};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<FieldError>,
    },

    /// Uniqueness violation or an illegal state transition
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        ServiceError::NotFound { entity, id }
    }

    /// Single-field validation failure
    pub fn invalid(field: &str, message: &str) -> Self {
        ServiceError::Validation {
            message: format!("{field} {message}"),
            details: vec![FieldError::new(field, message)],
        }
    }

    /// `Err` carrying every field error of a failed validation
    pub fn check(result: ValidationResult) -> Result<(), ServiceError> {
        if result.valid {
            return Ok(());
        }
        Err(ServiceError::Validation {
            message: String::from("validation failed"),
            details: result.errors,
        })
    }

    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::NotFound { .. } => "NOT_FOUND",
            ServiceError::Validation { .. } => "VALIDATION_ERROR",
            ServiceError::Conflict(_) => "CONFLICT",
            ServiceError::Unauthorized(_) => "UNAUTHORIZED",
            ServiceError::Forbidden(_) => "FORBIDDEN",
            ServiceError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::Validation { .. } => StatusCode::BAD_REQUEST,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn details(&self) -> Option<&[FieldError]> {
        match self {
            ServiceError::Validation { details, .. } if !details.is_empty() => Some(details),
            _ => None,
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::UniqueViolation(detail) => {
                tracing::debug!(%detail, "unique constraint rejected write");
                ServiceError::Conflict(String::from("a record with the same value already exists"))
            }
            StorageError::ForeignKeyViolation { field, message } => ServiceError::Validation {
                message: format!("invalid reference in {field}"),
                details: vec![FieldError::new(field, message)],
            },
            StorageError::InvalidField { entity, field } => ServiceError::Validation {
                message: format!("unknown field `{field}` on {entity}"),
                details: vec![FieldError::new(field, "is not a known field")],
            },
            StorageError::Validation { field, message } => ServiceError::Validation {
                message: format!("{field} {message}"),
                details: vec![FieldError::new(field, message)],
            },
            StorageError::Database(message) => ServiceError::Internal(message),
        }
    }
}

impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self {
        StorageError::from(e).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_kinds_map_to_taxonomy() {
        let conflict: ServiceError = StorageError::UniqueViolation("users.email".into()).into();
        assert_eq!(conflict.code(), "CONFLICT");
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let fk: ServiceError = StorageError::ForeignKeyViolation {
            field: "tag_ids".into(),
            message: "one or more tags do not exist".into(),
        }
        .into();
        assert_eq!(fk.code(), "VALIDATION_ERROR");
        assert_eq!(fk.details().unwrap()[0].field, "tag_ids");

        let db: ServiceError = StorageError::Database("disk I/O error".into()).into();
        assert_eq!(db.code(), "INTERNAL_ERROR");
        assert_eq!(db.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn failed_validation_keeps_every_field() {
        let result = ValidationResult::from_errors(vec![
            FieldError::new("title", "is required"),
            FieldError::new("work_type", "is required"),
        ]);
        let err = ServiceError::check(result).unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.details().map(|d| d.len()), Some(2));
        assert!(ServiceError::check(ValidationResult::ok()).is_ok());
    }
}

//! Storage-level error kinds
//!
//! Repositories report failures by kind and leave their interpretation to
//! the service layer.

use sea_orm::{DbErr, SqlErr};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A unique index rejected the write
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A referenced row does not exist
    #[error("foreign key constraint violated on {field}: {message}")]
    ForeignKeyViolation { field: String, message: String },

    /// A filter, order or field name does not exist on the entity
    #[error("unknown field `{field}` on {entity}")]
    InvalidField { entity: String, field: String },

    /// A value was rejected before reaching the database
    #[error("invalid value for {field}: {message}")]
    Validation { field: String, message: String },

    /// Anything else raised by the storage engine
    #[error("database error: {0}")]
    Database(String),
}

impl From<DbErr> for StorageError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                StorageError::UniqueViolation(detail)
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                StorageError::ForeignKeyViolation {
                    field: String::from("reference"),
                    message: detail,
                }
            }
            _ => StorageError::Database(e.to_string()),
        }
    }
}

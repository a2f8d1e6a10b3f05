//! Writes a [`TranslatableText`] into its per-language columns

use std::str::FromStr;

use sea_orm::{ActiveModelTrait, EntityTrait, Value};

use crate::domain::{Language, StorageError, TranslatableText};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignMode {
    /// Every language column is written; missing variants become NULL
    Replace,
    /// Only populated variants are written, other columns are left untouched
    Merge,
}

/// Set the `<field>_<lang>` columns of `active` from `text`.
pub fn assign_translatable<A>(
    active: &mut A,
    field: &str,
    text: &TranslatableText,
    mode: AssignMode,
) -> Result<(), StorageError>
where
    A: ActiveModelTrait,
{
    for lang in Language::ALL {
        let value = text.get(lang).map(str::to_string);
        if mode == AssignMode::Merge && value.is_none() {
            continue;
        }
        let name = lang.column_name(field);
        let column = <<A::Entity as EntityTrait>::Column as FromStr>::from_str(&name).map_err(
            |_| StorageError::InvalidField {
                entity: std::any::type_name::<A::Entity>().to_string(),
                field: name.clone(),
            },
        )?;
        active.set(column, Value::from(value));
    }
    Ok(())
}

//! Loosely-typed request payloads
//!
//! A [`RawInput`] is built once per request from a JSON body and an alias
//! table. Every accepted field is stored under its canonical name; unknown
//! keys are dropped. Accessors coerce values leniently and remember the
//! fields that could not be coerced so `validate()` can report them.

use std::cell::RefCell;

use serde_json::{Map, Value};

use super::validation::FieldError;
use crate::domain::{Language, TranslatableText};

/// `(canonical, aliases)` pairs accepted by a DTO
pub type AliasTable = &'static [(&'static str, &'static [&'static str])];

#[derive(Debug, Default)]
pub struct RawInput {
    fields: Map<String, Value>,
    invalid: RefCell<Vec<FieldError>>,
}

impl RawInput {
    /// Reconcile `payload` against `aliases`. The canonical key wins over
    /// aliases, earlier aliases win over later ones.
    pub fn new(payload: Value, aliases: AliasTable) -> Self {
        let mut source = match payload {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let mut fields = Map::new();
        for (canonical, alternates) in aliases {
            let found = source
                .remove(*canonical)
                .or_else(|| alternates.iter().find_map(|alias| source.remove(*alias)));
            if let Some(value) = found {
                fields.insert(canonical.to_string(), value);
            }
        }
        Self {
            fields,
            invalid: RefCell::new(Vec::new()),
        }
    }

    /// `true` when the key was sent, even with a `null` value
    pub fn is_present(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    fn reject(&self, field: &str, message: &str) {
        self.invalid.borrow_mut().push(FieldError::new(field, message));
    }

    /// Coercion failures collected so far
    pub fn coercion_errors(&self) -> Vec<FieldError> {
        self.invalid.borrow().clone()
    }

    /// Trimmed string, `None` when absent, null or blank
    pub fn string(&self, field: &str) -> Option<String> {
        self.get(field).and_then(trim_to_option)
    }

    /// Absent: `None`. Present but null or blank: `Some(None)`.
    pub fn nullable_string(&self, field: &str) -> Option<Option<String>> {
        self.get(field).map(trim_to_option)
    }

    pub fn integer(&self, field: &str) -> Option<i32> {
        self.nullable_integer(field).flatten()
    }

    /// Absent: `None`. Present but null or blank: `Some(None)`.
    pub fn nullable_integer(&self, field: &str) -> Option<Option<i32>> {
        let value = self.get(field)?;
        if value.is_null() || value.as_str().is_some_and(|s| s.trim().is_empty()) {
            return Some(None);
        }
        match parse_int(value) {
            Some(n) => Some(Some(n)),
            None => {
                self.reject(field, "must be an integer");
                Some(None)
            }
        }
    }

    /// A list of ids given as an array, a single id or a comma separated
    /// string. Absent: `None`; null: an empty list.
    pub fn id_list(&self, field: &str) -> Option<Vec<i32>> {
        let value = self.get(field)?;
        match parse_id_list(value) {
            Some(ids) => Some(ids),
            None => {
                self.reject(field, "must be a list of ids");
                Some(Vec::new())
            }
        }
    }

    /// Translatable input normalised to its per-language form. A plain
    /// string is assigned to `lang`.
    pub fn translatable(&self, field: &str, lang: Language) -> Option<TranslatableText> {
        self.get(field).map(|value| TranslatableText::normalize(value, lang))
    }
}

pub fn trim_to_option(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn parse_int(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn parse_id_list(value: &Value) -> Option<Vec<i32>> {
    let mut ids = match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Object(obj) => obj.get("id").and_then(parse_int),
                other => parse_int(other),
            })
            .collect::<Option<Vec<i32>>>()?,
        Value::String(s) if s.trim().is_empty() => Vec::new(),
        Value::String(s) => s
            .split(',')
            .map(|part| part.trim().parse().ok())
            .collect::<Option<Vec<i32>>>()?,
        Value::Number(_) => vec![parse_int(value)?],
        _ => return None,
    };
    ids.sort_unstable();
    ids.dedup();
    Some(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ALIASES: AliasTable = &[
        ("publication_year", &["publicationYear", "year"]),
        ("tag_ids", &["tagIds"]),
    ];

    #[test]
    fn aliases_resolve_to_canonical_names() {
        let input = RawInput::new(json!({"publicationYear": "1998", "unknown": 1}), ALIASES);
        assert_eq!(input.integer("publication_year"), Some(1998));
        assert!(!input.is_present("unknown"));
    }

    #[test]
    fn canonical_key_wins_over_alias() {
        let input = RawInput::new(json!({"year": 1, "publication_year": 2}), ALIASES);
        assert_eq!(input.integer("publication_year"), Some(2));
    }

    #[test]
    fn null_and_absent_are_distinct() {
        let input = RawInput::new(json!({"publication_year": null}), ALIASES);
        assert_eq!(input.nullable_integer("publication_year"), Some(None));
        assert_eq!(input.nullable_integer("tag_ids"), None);
    }

    #[test]
    fn lenient_coercion_records_failures() {
        let input = RawInput::new(json!({"tagIds": ["x"], "year": "soon"}), ALIASES);
        assert_eq!(input.id_list("tag_ids"), Some(vec![]));
        assert_eq!(input.integer("publication_year"), None);
        let fields: Vec<String> = input.coercion_errors().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["tag_ids", "publication_year"]);
    }

    #[test]
    fn id_lists_accept_several_shapes() {
        assert_eq!(parse_id_list(&json!([3, "1", 3])), Some(vec![1, 3]));
        assert_eq!(parse_id_list(&json!("2, 5")), Some(vec![2, 5]));
        assert_eq!(parse_id_list(&json!([{"id": 4}])), Some(vec![4]));
        assert_eq!(parse_id_list(&json!(null)), Some(vec![]));
        assert_eq!(parse_id_list(&json!(["x"])), None);
    }

    #[test]
    fn strings_are_trimmed_and_nullified() {
        assert_eq!(trim_to_option(&json!("  hi ")), Some("hi".to_string()));
        assert_eq!(trim_to_option(&json!("   ")), None);
        assert_eq!(trim_to_option(&json!(null)), None);
    }
}

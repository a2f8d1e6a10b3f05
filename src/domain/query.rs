//! Entity-agnostic filter and ordering descriptors
//!
//! Field names are resolved against an entity's columns by the repository;
//! an unknown name surfaces as [`StorageError::InvalidField`](super::StorageError).

use sea_orm::Value;

/// Comparison applied to one field
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    Eq(Value),
    Ne(Value),
    In(Vec<Value>),
    Gte(Value),
    Lte(Value),
    IsNull,
    IsNotNull,
}

/// A conjunction of field comparisons
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub clauses: Vec<(String, FilterOp)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    fn push(mut self, field: &str, op: FilterOp) -> Self {
        self.clauses.push((field.to_string(), op));
        self
    }

    pub fn eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.push(field, FilterOp::Eq(value.into()))
    }

    pub fn ne(self, field: &str, value: impl Into<Value>) -> Self {
        self.push(field, FilterOp::Ne(value.into()))
    }

    pub fn is_in<V: Into<Value>>(self, field: &str, values: impl IntoIterator<Item = V>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.push(field, FilterOp::In(values))
    }

    pub fn gte(self, field: &str, value: impl Into<Value>) -> Self {
        self.push(field, FilterOp::Gte(value.into()))
    }

    pub fn lte(self, field: &str, value: impl Into<Value>) -> Self {
        self.push(field, FilterOp::Lte(value.into()))
    }

    pub fn is_null(self, field: &str) -> Self {
        self.push(field, FilterOp::IsNull)
    }

    pub fn is_not_null(self, field: &str) -> Self {
        self.push(field, FilterOp::IsNotNull)
    }

    /// Append every clause of `other`
    pub fn and(mut self, other: Filter) -> Self {
        self.clauses.extend(other.clauses);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            direction: Direction::Desc,
        }
    }

    /// Parse `field`, `-field` (descending), `field:asc` or `field:desc`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Some(field) = raw.strip_prefix('-') {
            return Some(Self::desc(field.trim()));
        }
        match raw.split_once(':') {
            Some((field, dir)) if dir.eq_ignore_ascii_case("desc") => Some(Self::desc(field.trim())),
            Some((field, dir)) if dir.eq_ignore_ascii_case("asc") => Some(Self::asc(field.trim())),
            Some(_) => None,
            None => Some(Self::asc(raw)),
        }
    }
}

use serde::Serialize;

/// A problem with one input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Outcome of `validate()` on an inbound DTO. Never an error by itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<FieldError>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<FieldError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn ok() -> Self {
        Self::from_errors(Vec::new())
    }
}

/// Accumulates field errors while a DTO checks itself
#[derive(Debug, Default)]
pub(crate) struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    pub fn starting_with(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.errors.push(FieldError::new(field, message));
        }
    }

    pub fn max_len(&mut self, value: Option<&str>, max: usize, field: &str) {
        if let Some(value) = value
            && value.chars().count() > max
        {
            self.errors
                .push(FieldError::new(field, format!("must be at most {max} characters")));
        }
    }

    pub fn finish(self) -> ValidationResult {
        ValidationResult::from_errors(self.errors)
    }
}

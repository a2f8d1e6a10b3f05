//! Rendering of translatable values in outbound shapes

use serde::Serialize;

use crate::domain::{Language, TranslatableText};

/// Requested output language, or the full per-language map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Localization {
    pub lang: Language,
    pub full: bool,
}

impl Localization {
    pub fn new(lang: Language) -> Self {
        Self { lang, full: false }
    }

    pub fn full() -> Self {
        Self {
            lang: Language::PRIMARY,
            full: true,
        }
    }

    /// Parse the `lang` and `full` request parameters
    pub fn from_params(lang: Option<&str>, full: bool, default: Language) -> Self {
        Self {
            lang: lang.and_then(Language::from_code).unwrap_or(default),
            full,
        }
    }

    pub fn render(&self, text: &TranslatableText) -> LocalizedText {
        if self.full {
            LocalizedText::Full(text.clone())
        } else {
            LocalizedText::Resolved(text.extract(self.lang))
        }
    }
}

/// A translatable field as sent to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LocalizedText {
    Resolved(String),
    Full(TranslatableText),
}

impl LocalizedText {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LocalizedText::Resolved(text) => Some(text),
            LocalizedText::Full(_) => None,
        }
    }
}

//! Multilingual text values
//!
//! A [`TranslatableText`] holds one optional string per supported language.
//! Reading a value never fails: [`TranslatableText::extract`] walks a fixed
//! fallback chain and ends on the empty string.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Languages supported by the catalog, in fallback order.
///
/// Tamazight is carried in two scripts (Latin and Tifinagh).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "fr")]
    Fr,
    #[serde(rename = "ar")]
    Ar,
    #[serde(rename = "en")]
    En,
    #[serde(rename = "tz-ltn")]
    TzLatn,
    #[serde(rename = "tz-tfng")]
    TzTfng,
}

impl Language {
    pub const PRIMARY: Language = Language::Fr;

    pub const ALL: [Language; 5] = [
        Language::Fr,
        Language::Ar,
        Language::En,
        Language::TzLatn,
        Language::TzTfng,
    ];

    /// Wire code, as used in `lang` parameters and map keys
    pub fn code(self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::Ar => "ar",
            Language::En => "en",
            Language::TzLatn => "tz-ltn",
            Language::TzTfng => "tz-tfng",
        }
    }

    /// Suffix of the storage column holding this language variant
    pub fn column_suffix(self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::Ar => "ar",
            Language::En => "en",
            Language::TzLatn => "tz_ltn",
            Language::TzTfng => "tz_tfng",
        }
    }

    /// Parse a language code. Accepts both `tz-ltn` and `tz_ltn` spellings and
    /// ignores case and surrounding whitespace.
    pub fn from_code(code: &str) -> Option<Language> {
        let normalized = code.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "fr" => Some(Language::Fr),
            "ar" => Some(Language::Ar),
            "en" => Some(Language::En),
            "tz-ltn" | "tz-latn" => Some(Language::TzLatn),
            "tz-tfng" => Some(Language::TzTfng),
            _ => None,
        }
    }

    /// Name of the column storing this language for a translatable field.
    pub fn column_name(self, field: &str) -> String {
        format!("{}_{}", field, self.column_suffix())
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::PRIMARY
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// A field holding parallel text in every supported language.
///
/// Serializes as a map with all five language keys present (absent
/// variants as `null`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatableText {
    #[serde(default)]
    pub fr: Option<String>,
    #[serde(default)]
    pub ar: Option<String>,
    #[serde(default)]
    pub en: Option<String>,
    #[serde(default, rename = "tz-ltn", alias = "tz_ltn")]
    pub tz_ltn: Option<String>,
    #[serde(default, rename = "tz-tfng", alias = "tz_tfng")]
    pub tz_tfng: Option<String>,
}

impl TranslatableText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a value holding a single language variant.
    pub fn single(lang: Language, text: impl Into<String>) -> Self {
        let mut value = Self::default();
        value.set(lang, Some(text.into()));
        value
    }

    /// Build from per-language column values, in [`Language::ALL`] order.
    pub fn from_columns(
        fr: &Option<String>,
        ar: &Option<String>,
        en: &Option<String>,
        tz_ltn: &Option<String>,
        tz_tfng: &Option<String>,
    ) -> Self {
        Self {
            fr: fr.clone(),
            ar: ar.clone(),
            en: en.clone(),
            tz_ltn: tz_ltn.clone(),
            tz_tfng: tz_tfng.clone(),
        }
    }

    /// Raw variant for `lang`; empty strings count as absent.
    pub fn get(&self, lang: Language) -> Option<&str> {
        let slot = match lang {
            Language::Fr => &self.fr,
            Language::Ar => &self.ar,
            Language::En => &self.en,
            Language::TzLatn => &self.tz_ltn,
            Language::TzTfng => &self.tz_tfng,
        };
        slot.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn set(&mut self, lang: Language, text: Option<String>) {
        let slot = match lang {
            Language::Fr => &mut self.fr,
            Language::Ar => &mut self.ar,
            Language::En => &mut self.en,
            Language::TzLatn => &mut self.tz_ltn,
            Language::TzTfng => &mut self.tz_tfng,
        };
        *slot = text;
    }

    pub fn is_empty(&self) -> bool {
        Language::ALL.iter().all(|lang| self.get(*lang).is_none())
    }

    pub fn has_primary(&self) -> bool {
        self.get(Language::PRIMARY).is_some()
    }

    /// Populated variants in fallback order
    pub fn populated(&self) -> impl Iterator<Item = (Language, &str)> {
        Language::ALL
            .into_iter()
            .filter_map(move |lang| self.get(lang).map(|text| (lang, text)))
    }

    /// Resolve to a single string: `lang`, then the primary language, then the
    /// first populated variant, then `""`.
    pub fn extract(&self, lang: Language) -> String {
        self.extract_with(lang, &[])
    }

    /// Like [`extract`](Self::extract) with extra languages tried after `lang`
    /// and before the primary language.
    pub fn extract_with(&self, lang: Language, chain: &[Language]) -> String {
        std::iter::once(lang)
            .chain(chain.iter().copied())
            .chain(std::iter::once(Language::PRIMARY))
            .find_map(|candidate| self.get(candidate))
            .or_else(|| self.populated().next().map(|(_, text)| text))
            .unwrap_or_default()
            .to_string()
    }

    /// Canonical form of a loosely-typed input.
    ///
    /// - `null` or missing: empty value
    /// - a string holding a serialized map: decoded as a map
    /// - any other string: assigned to `lang`
    /// - an object: known language keys are kept, others dropped
    pub fn normalize(input: &Value, lang: Language) -> Self {
        match input {
            Value::Null => Self::default(),
            Value::String(text) => {
                let trimmed = text.trim();
                if trimmed.starts_with('{')
                    && let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed)
                {
                    return Self::from_map(&map);
                }
                if trimmed.is_empty() {
                    Self::default()
                } else {
                    Self::single(lang, trimmed)
                }
            }
            Value::Object(map) => Self::from_map(map),
            Value::Number(n) => Self::single(lang, n.to_string()),
            Value::Bool(b) => Self::single(lang, b.to_string()),
            Value::Array(_) => Self::default(),
        }
    }

    fn from_map(map: &serde_json::Map<String, Value>) -> Self {
        let mut value = Self::default();
        for (key, raw) in map {
            let Some(lang) = Language::from_code(key) else {
                continue;
            };
            let text = match raw {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            };
            value.set(lang, text);
        }
        value
    }

    /// Overlay `updates` onto `self`: a language is overwritten only when the
    /// update carries a non-empty value for it.
    pub fn merge(&self, updates: &TranslatableText) -> Self {
        let mut merged = self.clone();
        for (lang, text) in updates.populated() {
            merged.set(lang, Some(text.to_string()));
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_prefers_requested_language() {
        let mut text = TranslatableText::single(Language::Fr, "Le Prophète");
        text.set(Language::En, Some("The Prophet".into()));
        assert_eq!(text.extract(Language::En), "The Prophet");
        assert_eq!(text.extract(Language::Fr), "Le Prophète");
    }

    #[test]
    fn extract_falls_back_to_primary_then_any() {
        let mut text = TranslatableText::single(Language::Fr, "Titre");
        text.set(Language::Ar, Some("عنوان".into()));
        assert_eq!(text.extract(Language::En), "Titre");

        let only_arabic = TranslatableText::single(Language::Ar, "عنوان");
        assert_eq!(only_arabic.extract(Language::TzTfng), "عنوان");

        assert_eq!(TranslatableText::default().extract(Language::En), "");
    }

    #[test]
    fn extract_treats_blank_as_absent() {
        let mut text = TranslatableText::single(Language::En, "Hello");
        text.set(Language::Fr, Some("   ".into()));
        assert_eq!(text.extract(Language::Fr), "Hello");
    }

    #[test]
    fn extract_with_honours_chain_before_primary() {
        let mut text = TranslatableText::single(Language::Fr, "fr");
        text.set(Language::TzLatn, Some("latin".into()));
        assert_eq!(
            text.extract_with(Language::TzTfng, &[Language::TzLatn]),
            "latin"
        );
    }

    #[test]
    fn normalize_plain_string_uses_given_language() {
        let text = TranslatableText::normalize(&json!("  Ighil  "), Language::TzLatn);
        assert_eq!(text.tz_ltn.as_deref(), Some("Ighil"));
        assert!(text.fr.is_none());
    }

    #[test]
    fn normalize_decodes_serialized_map() {
        let text = TranslatableText::normalize(&json!(r#"{"fr":"Oui","en":"Yes"}"#), Language::Ar);
        assert_eq!(text.fr.as_deref(), Some("Oui"));
        assert_eq!(text.en.as_deref(), Some("Yes"));
        assert!(text.ar.is_none());
    }

    #[test]
    fn normalize_broken_map_string_is_plain_text() {
        let text = TranslatableText::normalize(&json!("{not json"), Language::Fr);
        assert_eq!(text.fr.as_deref(), Some("{not json"));
    }

    #[test]
    fn normalize_null_is_empty() {
        assert!(TranslatableText::normalize(&Value::Null, Language::Fr).is_empty());
    }

    #[test]
    fn normalized_map_serializes_every_language_key() {
        let text = TranslatableText::normalize(&json!({"en": "x", "de": "y"}), Language::Fr);
        let out = serde_json::to_value(&text).unwrap();
        let keys: Vec<_> = out.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 5);
        assert!(out.get("tz-tfng").unwrap().is_null());
        assert_eq!(out["en"], "x");
    }

    #[test]
    fn merge_keeps_untouched_languages() {
        let mut existing = TranslatableText::single(Language::Fr, "Ancien");
        existing.set(Language::Ar, Some("قديم".into()));
        let mut updates = TranslatableText::single(Language::Fr, "Nouveau");
        updates.set(Language::Ar, Some(String::new()));

        let merged = existing.merge(&updates);
        assert_eq!(merged.fr.as_deref(), Some("Nouveau"));
        assert_eq!(merged.ar.as_deref(), Some("قديم"));
        assert!(merged.en.is_none());
    }

    #[test]
    fn language_codes_round_trip_with_aliases() {
        assert_eq!(Language::from_code("TZ_LTN"), Some(Language::TzLatn));
        assert_eq!(Language::from_code("tz-tfng"), Some(Language::TzTfng));
        assert_eq!(Language::from_code("de"), None);
        assert_eq!(Language::TzTfng.column_name("title"), "title_tz_tfng");
    }
}

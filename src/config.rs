use std::env;

use crate::domain::{Language, PageLimits};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a positive integer, got `{value}`")]
    NotANumber { key: &'static str, value: String },

    #[error("{key} must be at least 1")]
    Zero { key: &'static str },

    #[error("DEFAULT_PAGE_SIZE ({default}) exceeds MAX_PAGE_SIZE ({max})")]
    PageSizeAboveMax { default: u64, max: u64 },

    #[error("unsupported DEFAULT_LANGUAGE `{0}`")]
    UnknownLanguage(String),
}

/// Settings read once at startup and handed to [`AppState`](crate::infrastructure::AppState)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub default_page_size: u64,
    pub max_page_size: u64,
    pub max_search_length: usize,
    pub default_language: Language,
    pub seed_demo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://heritage_catalog.db?mode=rwc".to_string(),
            default_page_size: 20,
            max_page_size: 100,
            max_search_length: 200,
            default_language: Language::PRIMARY,
            seed_demo: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let number = |key: &'static str, default: u64| -> Result<u64, ConfigError> {
            match lookup(key) {
                None => Ok(default),
                Some(raw) => {
                    let value: u64 = raw.trim().parse().map_err(|_| ConfigError::NotANumber {
                        key,
                        value: raw.clone(),
                    })?;
                    if value == 0 {
                        return Err(ConfigError::Zero { key });
                    }
                    Ok(value)
                }
            }
        };

        let default_page_size = number("DEFAULT_PAGE_SIZE", defaults.default_page_size)?;
        let max_page_size = number("MAX_PAGE_SIZE", defaults.max_page_size)?;
        if default_page_size > max_page_size {
            return Err(ConfigError::PageSizeAboveMax {
                default: default_page_size,
                max: max_page_size,
            });
        }
        let max_search_length =
            number("MAX_SEARCH_LENGTH", defaults.max_search_length as u64)? as usize;

        let default_language = match lookup("DEFAULT_LANGUAGE") {
            None => defaults.default_language,
            Some(code) => Language::from_code(&code).ok_or(ConfigError::UnknownLanguage(code))?,
        };

        let seed_demo = lookup("SEED_DEMO")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "" | "0" | "false" | "no"))
            .unwrap_or(false);

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            default_page_size,
            max_page_size,
            max_search_length,
            default_language,
            seed_demo,
        })
    }

    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            default_limit: self.default_page_size,
            max_limit: self.max_page_size,
        }
    }
}

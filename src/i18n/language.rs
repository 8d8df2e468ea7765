//! Language type: Flexible, validated language representation.
//!
//! This module provides the `Language` type, which replaces a hardcoded
//! language enum with a flexible struct that validates against the registry.

use crate::i18n::strings::{ENGLISH_STRINGS, GERMAN_STRINGS};
use crate::i18n::{LanguageConfig, LanguageRegistry, UiStrings};
use anyhow::{bail, Result};

/// A validated language.
///
/// This type represents a language that has been validated against the registry.
/// It ensures that only supported, enabled languages can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// ISO 639-1 language code (e.g., "en", "de")
    code: &'static str,
}

impl Language {
    /// Constant for English, the canonical UI language.
    pub const ENGLISH: Language = Language { code: "en" };

    /// Constant for German.
    pub const GERMAN: Language = Language { code: "de" };

    /// Create a Language from a language code string.
    ///
    /// # Arguments
    /// * `code` - The ISO 639-1 language code (e.g., "en", "de")
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is valid and the language is enabled
    /// * `Err` if the code is not found or the language is disabled
    ///
    /// # Example
    /// ```ignore
    /// let german = Language::from_code("de")?;
    /// ```
    pub fn from_code(code: &str) -> Result<Language> {
        let registry = LanguageRegistry::get();

        match registry.get_by_code(code) {
            Some(config) if config.enabled => Ok(Language {
                code: config.code, // Use the static str from the registry
            }),
            Some(_) => bail!("Language '{}' is not enabled", code),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// Get the canonical (default) language.
    ///
    /// This is the language the UI starts in when nothing else is
    /// configured.
    pub fn canonical() -> Language {
        let config = LanguageRegistry::get().canonical();
        Language { code: config.code }
    }

    /// Get the ISO 639-1 language code.
    ///
    /// # Returns
    /// The language code as a static string (e.g., "en", "de").
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full language configuration from the registry.
    ///
    /// # Panics
    /// Panics if the language code is not found in the registry. This should
    /// never happen if the Language was constructed properly (via `from_code`
    /// or constants).
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    /// Get the localized UI string table for this language.
    pub fn strings(&self) -> &'static UiStrings {
        match self.code {
            "de" => &GERMAN_STRINGS,
            _ => &ENGLISH_STRINGS,
        }
    }

    /// Get the English name of the language.
    ///
    /// # Returns
    /// The language name in English (e.g., "English", "German").
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// Get the native name of the language.
    ///
    /// # Returns
    /// The language name in its native form (e.g., "English", "Deutsch").
    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    /// Check if this is the canonical language.
    pub fn is_canonical(&self) -> bool {
        self.config().is_canonical
    }
}

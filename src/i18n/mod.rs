//! Internationalization (i18n) module for multi-language support.
//!
//! This module provides a centralized, extensible architecture for managing
//! multiple languages. All language-related logic and localized UI strings
//! are contained here.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for all supported languages and their metadata
//! - `language`: Type-safe Language type that replaces hardcoded enums
//! - `strings`: Centralized localized UI strings
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::i18n::{Language, LanguageRegistry};
//!
//! // Get canonical language (English)
//! let canonical = Language::canonical();
//!
//! // Create language from code
//! let german = Language::from_code("de")?;
//!
//! // Look up the title in the active language
//! let title = german.strings().app_title;
//! ```

mod language;
mod registry;
mod strings;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
pub use strings::UiStrings;

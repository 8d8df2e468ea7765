use anyhow::{bail, Result};

use crate::i18n::LanguageRegistry;

/// Default public endpoint for the character dataset.
pub const DEFAULT_API_URL: &str = "https://rickandmortyapi.com/graphql";

#[derive(Debug, Clone)]
pub struct Config {
    /// GraphQL endpoint serving the character dataset.
    pub api_url: String,

    /// Pause before a "load more" request fires, in milliseconds. Purely
    /// cosmetic (keeps the spinner visible); zero disables it. The first
    /// page of a filter session is always fetched without it.
    pub load_more_delay_ms: u64,

    /// Client-wide request timeout in seconds. Bounds how long the
    /// in-flight flag can stay set on a hung connection.
    pub request_timeout_secs: u64,

    /// Initial UI language code ("en" or "de").
    pub language: String,

    /// Directory for rolling log files. Logging is disabled when unset,
    /// since stdout belongs to the UI.
    pub log_dir: Option<String>,

    /// Spinner/redraw tick in milliseconds.
    pub tick_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let language = std::env::var("RM_LANG").unwrap_or_else(|_| "en".to_string());
        if !LanguageRegistry::get().is_enabled(&language) {
            bail!("RM_LANG '{}' is not a supported language code", language);
        }

        Ok(Self {
            api_url: std::env::var("RM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),

            load_more_delay_ms: std::env::var("RM_LOAD_MORE_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),

            request_timeout_secs: std::env::var("RM_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),

            language,

            log_dir: std::env::var("RM_LOG_DIR").ok(),

            tick_ms: std::env::var("RM_TICK_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
        })
    }
}

use crate::fields::FieldToggles;
use crate::i18n::LanguageFilter;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Process configuration, loaded once from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_api_url: String,
    pub openai_timeout_secs: u64,
    pub database_path: String,
    pub port: u16,
    pub summary_max_chars: usize,
    pub keyword_max_chars: usize,
    pub summary_max_tokens: u32,
    pub keyword_max_tokens: u32,
    pub description_max_tokens: u32,
    pub length_tolerance: usize,
    pub validation_enabled: bool,
    pub validation_timeout_ms: u64,
    pub language_filter_enabled: bool,
    pub language_include: Vec<String>,
    pub language_exclude: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            openai_api_key: std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY not set")?,
            openai_model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            openai_api_url: std::env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".to_string()),
            openai_timeout_secs: std::env::var("OPENAI_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "translations.db".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            summary_max_chars: std::env::var("SUMMARY_MAX_CHARS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            keyword_max_chars: std::env::var("KEYWORD_MAX_CHARS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(40),
            summary_max_tokens: std::env::var("SUMMARY_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(200),
            keyword_max_tokens: std::env::var("KEYWORD_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            description_max_tokens: std::env::var("DESCRIPTION_MAX_TOKENS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            length_tolerance: std::env::var("LENGTH_TOLERANCE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            validation_enabled: std::env::var("VALIDATION_ENABLED")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true),
            validation_timeout_ms: std::env::var("VALIDATION_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30_000),
            language_filter_enabled: std::env::var("LANGUAGE_FILTER_ENABLED")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            language_include: std::env::var("LANGUAGE_INCLUDE")
                .map(|raw| parse_code_list(&raw))
                .unwrap_or_default(),
            language_exclude: std::env::var("LANGUAGE_EXCLUDE")
                .map(|raw| parse_code_list(&raw))
                .unwrap_or_default(),
        })
    }
}

/// Comma-separated language codes, whitespace-tolerant.
fn parse_code_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Validation pass knobs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSettings {
    pub enabled: bool,
    pub timeout_ms: u64,
}

/// Runtime-adjustable run settings.
///
/// One instance lives in the server state behind a lock: HTTP handlers
/// mutate it, and each run clones a snapshot up front so toggles flipped
/// mid-run never affect languages still in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSettings {
    pub fields: FieldToggles,
    pub language_filter: LanguageFilter,
    pub validation: ValidationSettings,
    pub length_tolerance: usize,
}

impl RunSettings {
    /// Initial settings derived from process configuration.
    pub fn from_config(config: &Config) -> Self {
        RunSettings {
            fields: FieldToggles::default(),
            language_filter: LanguageFilter {
                enabled: config.language_filter_enabled,
                include: config.language_include.clone(),
                exclude: config.language_exclude.clone(),
            },
            validation: ValidationSettings {
                enabled: config.validation_enabled,
                timeout_ms: config.validation_timeout_ms,
            },
            length_tolerance: config.length_tolerance,
        }
    }
}

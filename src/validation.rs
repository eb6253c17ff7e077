//! Post-apply validation against the listing console.
//!
//! Expected values come exclusively from the translation cache. Each
//! language is checked sequentially; failures get one retry pass at the
//! end, except a missing cache entry, which cannot heal on its own.

use crate::cache::TranslationCache;
use crate::console::ListingConsole;
use crate::error::PipelineError;
use crate::i18n::Language;
use anyhow::Result;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

/// Outcome of validating one language.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRecord {
    pub language_code: String,
    pub success: bool,
    pub summary_valid: bool,
    pub description_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_summary_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_summary_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_description_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_description_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationRecord {
    fn failure(language_code: &str, error: String) -> Self {
        ValidationRecord {
            language_code: language_code.to_string(),
            success: false,
            summary_valid: false,
            description_valid: false,
            current_summary_length: None,
            expected_summary_length: None,
            current_description_length: None,
            expected_description_length: None,
            error: Some(error),
        }
    }
}

/// Validate the listed languages against their cached translations.
///
/// Languages are checked one at a time in input order. Failed languages
/// are retried once at the end, and a successful retry replaces the
/// original result. The cache is read-only throughout.
pub async fn run_validation(
    console: &dyn ListingConsole,
    cache: &TranslationCache,
    tolerance: usize,
    timeout_ms: u64,
    codes: &[String],
) -> Vec<ValidationRecord> {
    let mut records = Vec::with_capacity(codes.len());
    for code in codes {
        records.push(validate_language(console, cache, tolerance, timeout_ms, code).await);
    }

    // A failure without a cache entry would fail again identically, so
    // only failures that still have an entry get the retry.
    let retry_indexes: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| !record.success && cache.has(&record.language_code))
        .map(|(index, _)| index)
        .collect();

    if !retry_indexes.is_empty() {
        info!("Retrying validation for {} language(s)", retry_indexes.len());
    }
    for index in retry_indexes {
        let code = records[index].language_code.clone();
        let retried = validate_language(console, cache, tolerance, timeout_ms, &code).await;
        if retried.success {
            info!("Validation passed for {} on retry", code);
            records[index] = retried;
        } else {
            warn!("Validation still failing for {} after retry", code);
        }
    }

    records
}

async fn validate_language(
    console: &dyn ListingConsole,
    cache: &TranslationCache,
    tolerance: usize,
    timeout_ms: u64,
    code: &str,
) -> ValidationRecord {
    match check_language(console, cache, tolerance, timeout_ms, code).await {
        Ok(record) => record,
        Err(e) => {
            warn!("Validation failed for {}: {:#}", code, e);
            ValidationRecord::failure(code, format!("{:#}", e))
        }
    }
}

async fn check_language(
    console: &dyn ListingConsole,
    cache: &TranslationCache,
    tolerance: usize,
    timeout_ms: u64,
    code: &str,
) -> Result<ValidationRecord> {
    let expected = cache
        .get(code)
        .ok_or_else(|| PipelineError::MissingCacheEntry(code.to_string()))?;
    let language = Language::from_code(code)?;

    info!("Validating {} ({})", language.name(), code);

    if !console.select_language(language.name()).await? {
        return Err(PipelineError::LanguageNotFound(language.name().to_string()).into());
    }

    let current = match tokio::time::timeout(
        Duration::from_millis(timeout_ms),
        console.read_current_fields(),
    )
    .await
    {
        Ok(result) => result?,
        Err(_) => {
            return Err(PipelineError::Timeout {
                operation: format!("Field read for {}", language.name()),
                millis: timeout_ms,
            }
            .into())
        }
    };

    let current_summary = trimmed_len(&current.summary);
    let expected_summary = trimmed_len(&expected.summary);
    let current_description = trimmed_len(&current.description);
    let expected_description = trimmed_len(&expected.description);

    let summary_valid = within_tolerance(current_summary, expected_summary, tolerance);
    let description_valid = within_tolerance(current_description, expected_description, tolerance);

    let mut mismatches = Vec::new();
    if !summary_valid {
        mismatches.push(format!(
            "Summary length mismatch for {} ({} vs {})",
            language.name(),
            current_summary,
            expected_summary
        ));
    }
    if !description_valid {
        mismatches.push(format!(
            "Description length mismatch for {} ({} vs {})",
            language.name(),
            current_description,
            expected_description
        ));
    }

    Ok(ValidationRecord {
        language_code: code.to_string(),
        success: summary_valid && description_valid,
        summary_valid,
        description_valid,
        current_summary_length: Some(current_summary),
        expected_summary_length: Some(expected_summary),
        current_description_length: Some(current_description),
        expected_description_length: Some(expected_description),
        error: if mismatches.is_empty() {
            None
        } else {
            Some(mismatches.join(" and "))
        },
    })
}

/// Lengths are compared in characters after trimming, so whitespace
/// differences from the console never trip the check.
fn trimmed_len(text: &str) -> usize {
    text.trim().chars().count()
}

fn within_tolerance(current: usize, expected: usize, tolerance: usize) -> bool {
    current.abs_diff(expected) <= tolerance
}

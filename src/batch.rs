//! Batch translation across languages.
//!
//! Languages are processed in input order and never abort the batch: each
//! one ends as a success or a failure item. Fields within one language
//! are translated concurrently, and a record is stored only once every
//! field came back, so the cache never holds a partial translation.

use crate::cache::TranslationCache;
use crate::config::{Config, RunSettings};
use crate::db::{SourceContent, TranslationRecord};
use crate::error::PipelineError;
use crate::fields::ContentField;
use crate::i18n::{Language, TranslationMetrics};
use crate::translator::translate_field;
use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

/// Outcome of one language in a batch run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItem {
    pub language_code: String,
    pub success: bool,
    /// Whether the result came from the cache without any model call.
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<TranslationRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchItem {
    fn success(language_code: &str, cached: bool, record: TranslationRecord) -> Self {
        BatchItem {
            language_code: language_code.to_string(),
            success: true,
            cached,
            record: Some(record),
            error: None,
        }
    }

    fn failure(language_code: &str, error: impl ToString) -> Self {
        BatchItem {
            language_code: language_code.to_string(),
            success: false,
            cached: false,
            record: None,
            error: Some(error.to_string()),
        }
    }
}

/// Translate the source content into every requested language.
///
/// Results come back in input order, one item per requested code. With
/// `force` set, cached languages are retranslated instead of short-circuiting;
/// their previous cache entry survives if the new translation fails.
pub async fn run_batch(
    client: &reqwest::Client,
    config: &Config,
    settings: &RunSettings,
    cache: &TranslationCache,
    content: &SourceContent,
    codes: &[String],
    force: bool,
) -> Vec<BatchItem> {
    let metrics = TranslationMetrics::get();
    let mut items = Vec::with_capacity(codes.len());

    for code in codes {
        let language = match Language::from_code(code) {
            Ok(language) => language,
            Err(e) => {
                warn!("Skipping unknown language code {}: {}", code, e);
                metrics.record_language_failure();
                items.push(BatchItem::failure(code, e));
                continue;
            }
        };

        // The canonical record mirrors the source and is refreshed on every
        // run, so a content edit takes effect without a cache clear.
        if language.is_canonical() {
            let record = canonical_record(content, code);
            match cache.put(&record) {
                Ok(()) => {
                    metrics.record_language_success();
                    items.push(BatchItem::success(code, false, record));
                }
                Err(e) => {
                    metrics.record_language_failure();
                    items.push(BatchItem::failure(code, format!("{:#}", e)));
                }
            }
            continue;
        }

        if !force {
            if let Some(record) = cache.get(code) {
                metrics.record_cache_hit();
                info!("Using cached translation for {} ({})", language.name(), code);
                metrics.record_language_success();
                items.push(BatchItem::success(code, true, record));
                continue;
            }
            metrics.record_cache_miss();
        }

        info!("Translating {} ({})", language.name(), code);
        let item = match translate_language(client, config, settings, content, language).await {
            Ok(record) => match cache.put(&record) {
                Ok(()) => {
                    metrics.record_language_success();
                    BatchItem::success(code, false, record)
                }
                Err(e) => {
                    metrics.record_language_failure();
                    BatchItem::failure(code, format!("{:#}", e))
                }
            },
            Err(e) => {
                metrics.record_language_failure();
                warn!(
                    "Translation failed for {} ({}): {:#}",
                    language.name(),
                    code,
                    e
                );
                BatchItem::failure(code, format!("{:#}", e))
            }
        };
        items.push(item);
    }

    items
}

/// Translate every field for one language and assemble the full record.
async fn translate_language(
    client: &reqwest::Client,
    config: &Config,
    settings: &RunSettings,
    content: &SourceContent,
    language: Language,
) -> Result<TranslationRecord> {
    let (summary, description, keyword1, keyword2, keyword3) = futures::try_join!(
        field_value(client, config, settings, content, language, ContentField::Summary),
        field_value(client, config, settings, content, language, ContentField::Description),
        field_value(client, config, settings, content, language, ContentField::Keyword1),
        field_value(client, config, settings, content, language, ContentField::Keyword2),
        field_value(client, config, settings, content, language, ContentField::Keyword3),
    )?;

    Ok(TranslationRecord {
        language_code: language.code().to_string(),
        summary,
        description,
        keyword1,
        keyword2,
        keyword3,
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// The stored value for one field: translated when toggled on, the source
/// text as-is when toggled off, and empty without a model call when the
/// source itself is empty.
async fn field_value(
    client: &reqwest::Client,
    config: &Config,
    settings: &RunSettings,
    content: &SourceContent,
    language: Language,
    field: ContentField,
) -> Result<String> {
    let source = source_text(content, field);

    if !settings.fields.should_translate(field) {
        return Ok(source.to_string());
    }
    if source.trim().is_empty() {
        return Ok(String::new());
    }

    translate_field(client, config, source, language, field.kind())
        .await
        .map_err(|e| {
            PipelineError::Translation {
                language: language.code().to_string(),
                field: field.kind(),
                source: e,
            }
            .into()
        })
}

fn source_text<'a>(content: &'a SourceContent, field: ContentField) -> &'a str {
    match field {
        ContentField::Summary => &content.summary,
        ContentField::Description => &content.description,
        ContentField::Keyword1 => &content.keyword1,
        ContentField::Keyword2 => &content.keyword2,
        ContentField::Keyword3 => &content.keyword3,
    }
}

fn canonical_record(content: &SourceContent, code: &str) -> TranslationRecord {
    TranslationRecord {
        language_code: code.to_string(),
        summary: content.summary.clone(),
        description: content.description.clone(),
        keyword1: content.keyword1.clone(),
        keyword2: content.keyword2.clone(),
        keyword3: content.keyword3.clone(),
        timestamp: Utc::now().to_rfc3339(),
    }
}

//! End-to-end run orchestration.
//!
//! An update run translates the active languages, applies each finished
//! record to the listing console, and finishes with a validation pass
//! over everything that was applied. Settings are snapshotted by the
//! caller before the run starts.

use crate::batch::{run_batch, BatchItem};
use crate::cache::TranslationCache;
use crate::config::{Config, RunSettings};
use crate::console::{AppliedFields, ListingConsole};
use crate::db::{Database, TranslationRecord};
use crate::error::PipelineError;
use crate::fields::FieldToggles;
use crate::i18n::{Language, TranslationMetrics};
use crate::validation::{run_validation, ValidationRecord};
use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

/// How one language fared in the apply pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ApplyStatus {
    Applied,
    Skipped,
    Failed,
}

/// Outcome of pushing one translated record to the listing console.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyOutcome {
    pub language_code: String,
    pub status: ApplyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything a finished update run produced.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub batch: Vec<BatchItem>,
    pub applied: Vec<ApplyOutcome>,
    pub validation: Vec<ValidationRecord>,
}

/// Translate, apply, and validate the active languages.
///
/// Languages the filter removed are never touched. Validation only covers
/// languages that were actually applied in this run, and only when it is
/// enabled in the settings snapshot.
pub async fn run_update(
    client: &reqwest::Client,
    config: &Config,
    settings: &RunSettings,
    db: &Database,
    cache: &TranslationCache,
    console: &dyn ListingConsole,
) -> Result<RunReport> {
    let content = db
        .get_product_content()?
        .ok_or(PipelineError::MissingContent)?;

    let codes = settings.language_filter.active_codes();
    if codes.is_empty() {
        info!("Language filter left nothing to process");
        return Ok(RunReport::default());
    }

    info!(
        "Starting update run for '{}' across {} language(s)",
        content.name,
        codes.len()
    );

    let batch = run_batch(client, config, settings, cache, &content, &codes, false).await;
    let applied = apply_batch(console, settings.fields, &batch).await;

    let applied_codes: Vec<String> = applied
        .iter()
        .filter(|outcome| outcome.status == ApplyStatus::Applied)
        .map(|outcome| outcome.language_code.clone())
        .collect();

    let validation = if settings.validation.enabled && !applied_codes.is_empty() {
        run_validation(
            console,
            cache,
            settings.length_tolerance,
            settings.validation.timeout_ms,
            &applied_codes,
        )
        .await
    } else {
        Vec::new()
    };

    let translated = batch.iter().filter(|item| item.success).count();
    let cached = batch.iter().filter(|item| item.cached).count();
    let valid = validation.iter().filter(|record| record.success).count();
    info!(
        "Run finished: {}/{} translated ({} cached), {} applied, {}/{} validated",
        translated,
        batch.len(),
        cached,
        applied_codes.len(),
        valid,
        validation.len()
    );

    let metrics = TranslationMetrics::get().report();
    info!(
        "Session metrics: {} API call(s) at {:.1}% success, cache hit rate {:.1}%",
        metrics.api_calls, metrics.api_success_rate, metrics.cache_hit_rate
    );

    Ok(RunReport {
        batch,
        applied,
        validation,
    })
}

/// Validate every cached language against the listing console without
/// translating anything first.
pub async fn run_validation_only(
    console: &dyn ListingConsole,
    cache: &TranslationCache,
    settings: &RunSettings,
) -> Vec<ValidationRecord> {
    let codes = cache.keys();
    if codes.is_empty() {
        info!("Translation cache is empty, nothing to validate");
        return Vec::new();
    }

    info!("Validating {} cached language(s)", codes.len());
    run_validation(
        console,
        cache,
        settings.length_tolerance,
        settings.validation.timeout_ms,
        &codes,
    )
    .await
}

/// Console field values for one record. Toggled-off groups stay `None`
/// so whatever the listing currently shows survives untouched.
pub fn applied_fields(record: &TranslationRecord, toggles: FieldToggles) -> AppliedFields {
    AppliedFields {
        summary: toggles.summary.then(|| record.summary.clone()),
        description: toggles.description.then(|| record.description.clone()),
        keyword1: toggles.keywords.then(|| record.keyword1.clone()),
        keyword2: toggles.keywords.then(|| record.keyword2.clone()),
        keyword3: toggles.keywords.then(|| record.keyword3.clone()),
    }
}

async fn apply_batch(
    console: &dyn ListingConsole,
    toggles: FieldToggles,
    batch: &[BatchItem],
) -> Vec<ApplyOutcome> {
    let mut outcomes = Vec::new();

    for item in batch {
        let record = match (&item.record, item.success) {
            (Some(record), true) => record,
            _ => continue,
        };

        let outcome = match apply_language(console, toggles, record).await {
            Ok(status) => ApplyOutcome {
                language_code: item.language_code.clone(),
                status,
                error: None,
            },
            Err(e) => {
                warn!("Apply failed for {}: {:#}", item.language_code, e);
                // Best effort return to the listing so later languages start clean
                if let Err(nav_err) = console.navigate_back().await {
                    warn!("Could not return to the listing page: {:#}", nav_err);
                }
                ApplyOutcome {
                    language_code: item.language_code.clone(),
                    status: ApplyStatus::Failed,
                    error: Some(format!("{:#}", e)),
                }
            }
        };
        outcomes.push(outcome);
    }

    outcomes
}

async fn apply_language(
    console: &dyn ListingConsole,
    toggles: FieldToggles,
    record: &TranslationRecord,
) -> Result<ApplyStatus> {
    let language = Language::from_code(&record.language_code)?;

    if !console.select_language(language.name()).await? {
        warn!(
            "Language '{}' not found on the listing page, skipping",
            language.name()
        );
        return Ok(ApplyStatus::Skipped);
    }

    console.apply_fields(&applied_fields(record, toggles)).await?;
    let confirmation = console.save().await?;
    info!(
        "Saved {} ({}): {}",
        language.name(),
        record.language_code,
        confirmation
    );
    console.navigate_back().await?;

    Ok(ApplyStatus::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::DryRunConsole;
    use crate::db::SourceContent;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // ==================== Helper Functions ====================

    fn create_test_config(api_url: &str) -> Config {
        Config {
            openai_api_key: "test-openai-key".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            openai_api_url: api_url.to_string(),
            openai_timeout_secs: 60,
            database_path: ":memory:".to_string(),
            port: 3000,
            summary_max_chars: 100,
            keyword_max_chars: 40,
            summary_max_tokens: 200,
            keyword_max_tokens: 100,
            description_max_tokens: 10_000,
            length_tolerance: 5,
            validation_enabled: true,
            validation_timeout_ms: 30_000,
            language_filter_enabled: false,
            language_include: vec![],
            language_exclude: vec![],
        }
    }

    fn create_seeded_db() -> (Database, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db = Database::new(db_path.to_str().unwrap()).expect("Failed to create database");
        db.update_product_content(&sample_content())
            .expect("Failed to seed content");
        (db, temp_dir)
    }

    fn sample_content() -> SourceContent {
        SourceContent {
            name: "TaskFlow".to_string(),
            summary: "A simple task manager for busy teams".to_string(),
            description: "<p>Organize your work with <b>lists</b>.</p>".to_string(),
            keyword1: "task manager".to_string(),
            keyword2: "productivity".to_string(),
            keyword3: "todo list".to_string(),
        }
    }

    fn settings_for(include: &[&str], config: &Config) -> RunSettings {
        let mut settings = RunSettings::from_config(config);
        settings.language_filter.enabled = true;
        settings.language_filter.include = include.iter().map(|s| s.to_string()).collect();
        settings
    }

    fn create_openai_response(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [
                {
                    "index": 0,
                    "message": {
                        "role": "assistant",
                        "content": content
                    },
                    "finish_reason": "stop"
                }
            ]
        })
    }

    // ==================== Full Run Tests ====================

    #[tokio::test]
    async fn test_missing_content_aborts_run() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Database::new(db_path.to_str().unwrap()).unwrap();
        let cache = TranslationCache::new(db.clone()).unwrap();

        let config = create_test_config("http://invalid-url-should-not-be-called.test");
        let client = reqwest::Client::new();
        let console = DryRunConsole::new();

        let result = run_update(
            &client,
            &config,
            &RunSettings::from_config(&config),
            &db,
            &cache,
            &console,
        )
        .await;

        let err = result.expect_err("run should fail without content");
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::MissingContent)
        ));
        assert!(err
            .to_string()
            .contains("No product content found in database"));
    }

    #[tokio::test]
    async fn test_full_run_translates_applies_and_validates() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(create_openai_response("Un gestionnaire de tâches")),
            )
            .mount(&mock_server)
            .await;

        let config = create_test_config(&format!("{}/v1/chat/completions", mock_server.uri()));
        let client = reqwest::Client::new();
        let (db, _temp) = create_seeded_db();
        let cache = TranslationCache::new(db.clone()).unwrap();
        let console = DryRunConsole::new();
        let settings = settings_for(&["en-US", "fr-FR"], &config);

        let report = run_update(&client, &config, &settings, &db, &cache, &console)
            .await
            .expect("run should succeed");

        assert_eq!(report.batch.len(), 2);
        assert!(report.batch.iter().all(|item| item.success));
        assert_eq!(report.applied.len(), 2);
        assert!(report
            .applied
            .iter()
            .all(|outcome| outcome.status == ApplyStatus::Applied));
        assert_eq!(report.validation.len(), 2);
        assert!(report.validation.iter().all(|record| record.success));

        // The console now holds what the run pushed
        assert!(console.select_language("French").await.unwrap());
        let fields = console.read_current_fields().await.unwrap();
        assert_eq!(fields.summary, "Un gestionnaire de tâches");
    }

    #[tokio::test]
    async fn test_canonical_language_applies_source_text() {
        let config = create_test_config("http://invalid-url-should-not-be-called.test");
        let client = reqwest::Client::new();
        let (db, _temp) = create_seeded_db();
        let cache = TranslationCache::new(db.clone()).unwrap();
        let console = DryRunConsole::new();
        let settings = settings_for(&["en-US"], &config);

        let report = run_update(&client, &config, &settings, &db, &cache, &console)
            .await
            .expect("run should succeed");

        assert_eq!(report.applied.len(), 1);
        assert_eq!(report.applied[0].status, ApplyStatus::Applied);
        assert!(report.validation[0].success);

        assert!(console.select_language("English").await.unwrap());
        let fields = console.read_current_fields().await.unwrap();
        assert_eq!(fields.summary, sample_content().summary);
        assert_eq!(fields.description, sample_content().description);
    }

    #[tokio::test]
    async fn test_empty_filter_result_is_noop() {
        let config = create_test_config("http://invalid-url-should-not-be-called.test");
        let client = reqwest::Client::new();
        let (db, _temp) = create_seeded_db();
        let cache = TranslationCache::new(db.clone()).unwrap();
        let console = DryRunConsole::new();

        let mut settings = settings_for(&["fr-FR"], &config);
        settings.language_filter.exclude = vec!["fr-FR".to_string()];

        let report = run_update(&client, &config, &settings, &db, &cache, &console)
            .await
            .expect("run should succeed");

        assert!(report.batch.is_empty());
        assert!(report.applied.is_empty());
        assert!(report.validation.is_empty());
    }

    #[tokio::test]
    async fn test_missing_listing_language_is_skipped() {
        let config = create_test_config("http://invalid-url-should-not-be-called.test");
        let client = reqwest::Client::new();
        let (db, _temp) = create_seeded_db();
        let cache = TranslationCache::new(db.clone()).unwrap();
        let console = DryRunConsole::with_missing_languages(["English"]);
        let settings = settings_for(&["en-US"], &config);

        let report = run_update(&client, &config, &settings, &db, &cache, &console)
            .await
            .expect("run should succeed");

        assert_eq!(report.applied[0].status, ApplyStatus::Skipped);
        // Nothing was applied, so there is nothing to validate
        assert!(report.validation.is_empty());
    }

    #[tokio::test]
    async fn test_validation_disabled_skips_validation_pass() {
        let config = create_test_config("http://invalid-url-should-not-be-called.test");
        let client = reqwest::Client::new();
        let (db, _temp) = create_seeded_db();
        let cache = TranslationCache::new(db.clone()).unwrap();
        let console = DryRunConsole::new();

        let mut settings = settings_for(&["en-US"], &config);
        settings.validation.enabled = false;

        let report = run_update(&client, &config, &settings, &db, &cache, &console)
            .await
            .expect("run should succeed");

        assert_eq!(report.applied[0].status, ApplyStatus::Applied);
        assert!(report.validation.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_summary_leaves_console_value() {
        let config = create_test_config("http://invalid-url-should-not-be-called.test");
        let client = reqwest::Client::new();
        let (db, _temp) = create_seeded_db();
        let cache = TranslationCache::new(db.clone()).unwrap();

        // The listing already shows a hand-written summary
        let console = DryRunConsole::new();
        console.select_language("English").await.unwrap();
        console
            .apply_fields(&AppliedFields {
                summary: Some("Hand-tuned summary".to_string()),
                ..AppliedFields::default()
            })
            .await
            .unwrap();
        console.save().await.unwrap();
        console.navigate_back().await.unwrap();

        let mut settings = settings_for(&["en-US"], &config);
        settings.fields.summary = false;
        settings.validation.enabled = false;

        run_update(&client, &config, &settings, &db, &cache, &console)
            .await
            .expect("run should succeed");

        console.select_language("English").await.unwrap();
        let fields = console.read_current_fields().await.unwrap();
        assert_eq!(fields.summary, "Hand-tuned summary");
        assert_eq!(fields.description, sample_content().description);
    }

    // ==================== Validation-Only Tests ====================

    #[tokio::test]
    async fn test_validation_only_covers_whole_cache() {
        let config = create_test_config("http://invalid-url-should-not-be-called.test");
        let client = reqwest::Client::new();
        let (db, _temp) = create_seeded_db();
        let cache = TranslationCache::new(db.clone()).unwrap();
        let console = DryRunConsole::new();
        let settings = settings_for(&["en-US"], &config);

        // Seed the cache and the console through a normal run
        run_update(&client, &config, &settings, &db, &cache, &console)
            .await
            .expect("run should succeed");

        let records = run_validation_only(&console, &cache, &settings).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].language_code, "en-US");
        assert!(records[0].success);
    }

    #[tokio::test]
    async fn test_validation_only_with_empty_cache() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Database::new(db_path.to_str().unwrap()).unwrap();
        let cache = TranslationCache::new(db).unwrap();

        let config = create_test_config("http://unused.test");
        let records = run_validation_only(
            &DryRunConsole::new(),
            &cache,
            &RunSettings::from_config(&config),
        )
        .await;

        assert!(records.is_empty());
    }

    // ==================== Field Mapping Tests ====================

    #[test]
    fn test_applied_fields_all_toggles_on() {
        let record = TranslationRecord {
            language_code: "fr-FR".to_string(),
            summary: "résumé".to_string(),
            description: "description".to_string(),
            keyword1: "un".to_string(),
            keyword2: "deux".to_string(),
            keyword3: "trois".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let fields = applied_fields(&record, FieldToggles::default());
        assert_eq!(fields.summary.as_deref(), Some("résumé"));
        assert_eq!(fields.description.as_deref(), Some("description"));
        assert_eq!(fields.keyword1.as_deref(), Some("un"));
    }

    #[test]
    fn test_applied_fields_keywords_off() {
        let record = TranslationRecord {
            language_code: "fr-FR".to_string(),
            summary: "résumé".to_string(),
            description: "description".to_string(),
            keyword1: "un".to_string(),
            keyword2: "deux".to_string(),
            keyword3: "trois".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let toggles = FieldToggles {
            summary: true,
            description: true,
            keywords: false,
        };
        let fields = applied_fields(&record, toggles);
        assert!(fields.summary.is_some());
        assert!(fields.keyword1.is_none());
        assert!(fields.keyword2.is_none());
        assert!(fields.keyword3.is_none());
    }

    #[test]
    fn test_apply_status_serializes_camel_case() {
        assert_eq!(
            serde_json::to_string(&ApplyStatus::Applied).unwrap(),
            r#""applied""#
        );
        assert_eq!(
            serde_json::to_string(&ApplyStatus::Skipped).unwrap(),
            r#""skipped""#
        );
    }
}

//! HTTP control surface for the localization pipeline.
//!
//! JSON in and out, camelCase on the wire. Long-running work (the full
//! update run and validation-only runs) is spawned in the background and
//! reported through logs and `/api/metrics`; everything else responds
//! inline.

use crate::batch::{run_batch, BatchItem};
use crate::cache::TranslationCache;
use crate::config::{Config, RunSettings};
use crate::console::ListingConsole;
use crate::db::{Database, SourceContent};
use crate::i18n::TranslationMetrics;
use crate::runner::{run_update, run_validation_only};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{delete, get, post};
use axum::Router;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared state behind every handler.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub cache: TranslationCache,
    pub settings: RwLock<RunSettings>,
    pub client: reqwest::Client,
    pub console: Arc<dyn ListingConsole>,
}

impl AppState {
    pub fn new(
        config: Config,
        db: Database,
        cache: TranslationCache,
        client: reqwest::Client,
        console: Arc<dyn ListingConsole>,
    ) -> Self {
        let settings = RunSettings::from_config(&config);
        AppState {
            config,
            db,
            cache,
            settings: RwLock::new(settings),
            client,
            console,
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/content", get(get_content).post(update_content))
        .route("/api/languages", get(list_languages))
        .route("/api/translation/:code", get(get_translation))
        .route("/api/translate/batch", post(translate_batch))
        .route("/api/translate/:code", post(translate_single))
        .route("/api/cache/status", get(cache_status))
        .route("/api/cache", delete(clear_cache))
        .route(
            "/api/config/fields",
            get(get_field_toggles).post(set_field_toggles),
        )
        .route("/api/metrics", get(get_metrics))
        .route("/api/execute/update", post(execute_update))
        .route("/api/execute/validate", post(execute_validate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn get_content(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SourceContent>, (StatusCode, Json<serde_json::Value>)> {
    match state.db.get_product_content() {
        Ok(Some(content)) => Ok(Json(content)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "No product content found in database. \
                          Please add content through the web interface."
            })),
        )),
        Err(e) => {
            error!("Content lookup failed: {:#}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("{:#}", e) })),
            ))
        }
    }
}

async fn update_content(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let text_field = |key: &str| -> String {
        body.get(key)
            .and_then(|value| value.as_str())
            .unwrap_or("")
            .to_string()
    };

    let content = SourceContent {
        name: text_field("name"),
        summary: text_field("summary"),
        description: text_field("description"),
        keyword1: text_field("keyword1"),
        keyword2: text_field("keyword2"),
        keyword3: text_field("keyword3"),
    };

    if content.name.trim().is_empty()
        || content.summary.trim().is_empty()
        || content.description.trim().is_empty()
    {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Name, summary, and description are required" })),
        ));
    }

    match state.db.update_product_content(&content) {
        Ok((id, updated_at)) => {
            info!("Product content updated (revision {})", id);
            Ok(Json(json!({
                "success": true,
                "id": id,
                "updatedAt": updated_at
            })))
        }
        Err(e) => {
            error!("Content update failed: {:#}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("{:#}", e) })),
            ))
        }
    }
}

/// The language list a run would currently process, after filtering.
async fn list_languages(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let settings = state.settings.read().await;
    let languages: Vec<serde_json::Value> = settings
        .language_filter
        .apply(crate::i18n::LanguageRegistry::get().list_enabled())
        .into_iter()
        .map(|lang| {
            json!({
                "code": lang.code,
                "name": lang.name,
                "nativeName": lang.native_name,
                "isCanonical": lang.is_canonical
            })
        })
        .collect();

    Json(json!({
        "total": languages.len(),
        "languages": languages
    }))
}

async fn get_translation(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Json<serde_json::Value> {
    match state.cache.get(&code) {
        Some(record) => Json(json!({ "cached": true, "translation": record })),
        None => Json(json!({ "cached": false })),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchRequest {
    #[serde(default)]
    language_codes: Vec<String>,
}

async fn translate_batch(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let content = load_content(&state)?;
    let settings = state.settings.read().await.clone();

    let codes = if request.language_codes.is_empty() {
        settings.language_filter.active_codes()
    } else {
        request.language_codes
    };

    let items = run_batch(
        &state.client,
        &state.config,
        &settings,
        &state.cache,
        &content,
        &codes,
        false,
    )
    .await;

    let succeeded = items.iter().filter(|item| item.success).count();
    let failed = items.len() - succeeded;
    Ok(Json(json!({
        "results": items,
        "succeeded": succeeded,
        "failed": failed
    })))
}

async fn translate_single(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<BatchItem>, (StatusCode, Json<serde_json::Value>)> {
    let content = load_content(&state)?;
    let settings = state.settings.read().await.clone();

    let mut items = run_batch(
        &state.client,
        &state.config,
        &settings,
        &state.cache,
        &content,
        &[code],
        true,
    )
    .await;

    // One code in, one item out
    Ok(Json(items.remove(0)))
}

async fn cache_status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let entries = state.cache.status();
    Json(json!({
        "totalCached": entries.len(),
        "languages": state.cache.keys(),
        "cacheEntries": entries
    }))
}

async fn clear_cache(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    match state.cache.clear() {
        Ok(deleted) => {
            info!("Cleared {} cached translation(s)", deleted);
            Ok(Json(json!({ "deleted": deleted })))
        }
        Err(e) => {
            error!("Cache clear failed: {:#}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("{:#}", e) })),
            ))
        }
    }
}

async fn get_field_toggles(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let settings = state.settings.read().await;
    Json(json!({
        "summary": settings.fields.summary,
        "description": settings.fields.description,
        "keywords": settings.fields.keywords
    }))
}

async fn set_field_toggles(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let flags = ["summary", "description", "keywords"]
        .map(|key| body.get(key).and_then(|value| value.as_bool()));

    let (summary, description, keywords) = match flags {
        [Some(summary), Some(description), Some(keywords)] => (summary, description, keywords),
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Summary, description, and keywords must be boolean values"
                })),
            ))
        }
    };

    let mut settings = state.settings.write().await;
    settings.fields.summary = summary;
    settings.fields.description = description;
    settings.fields.keywords = keywords;
    info!(
        "Field toggles updated: summary={} description={} keywords={}",
        summary, description, keywords
    );

    Ok(Json(json!({
        "success": true,
        "fields": {
            "summary": summary,
            "description": description,
            "keywords": keywords
        }
    })))
}

async fn get_metrics(State(_state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let report = TranslationMetrics::get().report();
    Json(serde_json::to_value(report).unwrap_or_else(|_| json!({})))
}

async fn execute_update(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    info!("Update run requested");
    tokio::spawn(async move {
        // Snapshot the settings so mid-run toggle changes wait for the next run
        let settings = state.settings.read().await.clone();
        let result = run_update(
            &state.client,
            &state.config,
            &settings,
            &state.db,
            &state.cache,
            state.console.as_ref(),
        )
        .await;
        if let Err(e) = result {
            error!("Update run failed: {:#}", e);
        }
    });

    Json(json!({ "started": true }))
}

async fn execute_validate(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    info!("Validation-only run requested");
    tokio::spawn(async move {
        let settings = state.settings.read().await.clone();
        let records = run_validation_only(state.console.as_ref(), &state.cache, &settings).await;
        let valid = records.iter().filter(|record| record.success).count();
        info!("Validation-only run finished: {}/{} valid", valid, records.len());
    });

    Json(json!({ "started": true }))
}

fn load_content(
    state: &AppState,
) -> Result<SourceContent, (StatusCode, Json<serde_json::Value>)> {
    match state.db.get_product_content() {
        Ok(Some(content)) => Ok(content),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "No product content found in database. \
                          Please add content through the web interface."
            })),
        )),
        Err(e) => {
            error!("Content lookup failed: {:#}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("{:#}", e) })),
            ))
        }
    }
}

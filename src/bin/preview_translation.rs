//! Preview translation binary - translates the stored listing content into
//! one language and displays it without touching the cache, the listing
//! console, or the server.
//!
//! Usage:
//!   cargo run --bin preview -- fr-FR               # Translate fresh via the API
//!   cargo run --bin preview -- fr-FR --from-cache  # Render the cached record
//!
//! Required environment variables:
//! - OPENAI_API_KEY
//!
//! Optional:
//! - OPENAI_MODEL (defaults to gpt-4o-mini)
//! - DATABASE_PATH (defaults to translations.db)

use anyhow::{Context, Result};
use chrono::Utc;
use listing_localizer::config::Config;
use listing_localizer::db::{Database, SourceContent, TranslationRecord};
use listing_localizer::error::PipelineError;
use listing_localizer::fields::FieldKind;
use listing_localizer::i18n::Language;
use listing_localizer::translator::translate_field;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("listing_localizer=info".parse().unwrap()),
        )
        .init();

    // Load environment from .env file
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args: Vec<String> = std::env::args().collect();
    let from_cache = args.iter().any(|arg| arg == "--from-cache");
    let code = match args.iter().skip(1).find(|arg| !arg.starts_with("--")) {
        Some(code) => code.clone(),
        None => {
            eprintln!("Usage: preview <language-code> [--from-cache]");
            eprintln!("Example: preview fr-FR");
            std::process::exit(2);
        }
    };

    info!("Loading configuration...");
    let config = Config::from_env()?;
    let language = Language::from_code(&code)?;

    let db = Database::new(&config.database_path)?;
    let content = db
        .get_product_content()?
        .ok_or(PipelineError::MissingContent)?;

    let record = if from_cache {
        info!("Using cached translation for {}...", language.name());
        db.get_translation(&code)?
            .ok_or_else(|| PipelineError::MissingCacheEntry(code.clone()))?
    } else {
        info!(
            "Translating '{}' into {}...",
            content.name,
            language.name()
        );
        translate_preview(&config, &content, language).await?
    };

    let source_label = if from_cache {
        "cached record"
    } else {
        "fresh translation"
    };

    // Print the preview
    println!();
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║                      TRANSLATION PREVIEW                          ║");
    println!("╠══════════════════════════════════════════════════════════════════╣");
    println!(
        "║ Language: {:<54} ║",
        format!("{} ({})", language.name(), language.code())
    );
    println!("║ Model: {:<57} ║", config.openai_model);
    println!("║ Source: {:<56} ║", source_label);
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();
    for (label, value, cap) in field_rows(&config, &record) {
        println!("--- {} ---", length_line(label, value, cap));
        println!("{}", value);
        println!();
    }

    // Save to run-history/
    let filepath = write_history(&config, &record, language, source_label)?;
    println!("💾 Saved to: {}", filepath.display());
    println!();

    Ok(())
}

/// Translate every field for the preview without storing anything.
async fn translate_preview(
    config: &Config,
    content: &SourceContent,
    language: Language,
) -> Result<TranslationRecord> {
    let client = reqwest::Client::new();

    let summary = translate_field(
        &client,
        config,
        &content.summary,
        language,
        FieldKind::Summary,
    )
    .await?;
    let description = translate_field(
        &client,
        config,
        &content.description,
        language,
        FieldKind::Description,
    )
    .await?;
    let keyword1 = preview_keyword(&client, config, &content.keyword1, language).await?;
    let keyword2 = preview_keyword(&client, config, &content.keyword2, language).await?;
    let keyword3 = preview_keyword(&client, config, &content.keyword3, language).await?;

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

/// Empty keyword slots stay empty instead of being sent to the model.
async fn preview_keyword(
    client: &reqwest::Client,
    config: &Config,
    text: &str,
    language: Language,
) -> Result<String> {
    if text.trim().is_empty() {
        return Ok(String::new());
    }
    translate_field(client, config, text, language, FieldKind::Keyword).await
}

fn field_rows<'a>(
    config: &Config,
    record: &'a TranslationRecord,
) -> Vec<(&'static str, &'a str, Option<usize>)> {
    vec![
        ("summary", record.summary.as_str(), Some(config.summary_max_chars)),
        ("description", record.description.as_str(), None),
        ("keyword1", record.keyword1.as_str(), Some(config.keyword_max_chars)),
        ("keyword2", record.keyword2.as_str(), Some(config.keyword_max_chars)),
        ("keyword3", record.keyword3.as_str(), Some(config.keyword_max_chars)),
    ]
}

/// Field header with the character count against its ceiling.
fn length_line(label: &str, value: &str, cap: Option<usize>) -> String {
    let length = value.chars().count();
    match cap {
        Some(cap) if length > cap => {
            format!("{}: {} chars (limit {}, OVER)", label, length, cap)
        }
        Some(cap) => format!("{}: {} chars (limit {})", label, length, cap),
        None => format!("{}: {} chars", label, length),
    }
}

/// Write the preview as markdown under run-history/.
fn write_history(
    config: &Config,
    record: &TranslationRecord,
    language: Language,
    source_label: &str,
) -> Result<PathBuf> {
    let history_dir = Path::new("run-history");
    fs::create_dir_all(history_dir).context("Failed to create run-history directory")?;

    let filename = format!(
        "{}_{}.md",
        language.code(),
        Utc::now().format("%Y-%m-%d_%H-%M-%S")
    );
    let filepath = history_dir.join(&filename);

    let mut sections = String::new();
    for (label, value, cap) in field_rows(config, record) {
        sections.push_str(&format!(
            "## {}\n\n{}\n\n",
            length_line(label, value, cap),
            value
        ));
    }

    let file_content = format!(
        "# Translation Preview - {} ({})\n\n\
         **Generated:** {}\n\
         **Model:** {}\n\
         **Source:** {}\n\n\
         ---\n\n\
         {}",
        language.name(),
        language.code(),
        Utc::now().format("%Y-%m-%d %H:%M UTC"),
        config.openai_model,
        source_label,
        sections
    );

    fs::write(&filepath, &file_content).context("Failed to write preview to run-history")?;
    Ok(filepath)
}

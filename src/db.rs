//! SQLite persistence for the source listing content and its translations.
//!
//! The source table is append-only so earlier revisions stay around; the
//! latest row is the one the engine translates. Translations are keyed by
//! language code and overwritten in place.

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// The canonical listing content, in English.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceContent {
    pub name: String,
    pub summary: String,
    pub description: String,
    #[serde(default)]
    pub keyword1: String,
    #[serde(default)]
    pub keyword2: String,
    #[serde(default)]
    pub keyword3: String,
}

/// One stored translation, keyed by language code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRecord {
    pub language_code: String,
    pub summary: String,
    pub description: String,
    pub keyword1: String,
    pub keyword2: String,
    pub keyword3: String,
    /// RFC3339 time the record was assembled.
    pub timestamp: String,
}

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(database_path: &str) -> Result<Self> {
        let conn = Connection::open(database_path)
            .context(format!("Failed to open database at {}", database_path))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS product_content (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                summary TEXT NOT NULL,
                description TEXT NOT NULL,
                keyword1 TEXT NOT NULL DEFAULT '',
                keyword2 TEXT NOT NULL DEFAULT '',
                keyword3 TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create product_content table")?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS translations (
                language_code TEXT PRIMARY KEY,
                summary TEXT NOT NULL,
                description TEXT NOT NULL,
                keyword1 TEXT NOT NULL DEFAULT '',
                keyword2 TEXT NOT NULL DEFAULT '',
                keyword3 TEXT NOT NULL DEFAULT '',
                timestamp TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create translations table")?;

        Ok(Database {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Latest saved source content, or None when nothing was entered yet.
    pub fn get_product_content(&self) -> Result<Option<SourceContent>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT name, summary, description, keyword1, keyword2, keyword3
             FROM product_content
             ORDER BY updated_at DESC, id DESC
             LIMIT 1",
            [],
            |row| {
                Ok(SourceContent {
                    name: row.get(0)?,
                    summary: row.get(1)?,
                    description: row.get(2)?,
                    keyword1: row.get(3)?,
                    keyword2: row.get(4)?,
                    keyword3: row.get(5)?,
                })
            },
        )
        .optional()
        .context("Failed to read product content")
    }

    /// Save a new source content revision. Returns its row id and timestamp.
    pub fn update_product_content(&self, content: &SourceContent) -> Result<(i64, String)> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO product_content
             (name, summary, description, keyword1, keyword2, keyword3, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                content.name,
                content.summary,
                content.description,
                content.keyword1,
                content.keyword2,
                content.keyword3,
                now
            ],
        )
        .context("Failed to update product content")?;
        Ok((conn.last_insert_rowid(), now))
    }

    pub fn store_translation(&self, record: &TranslationRecord) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO translations
             (language_code, summary, description, keyword1, keyword2, keyword3, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.language_code,
                record.summary,
                record.description,
                record.keyword1,
                record.keyword2,
                record.keyword3,
                record.timestamp
            ],
        )
        .context(format!(
            "Failed to store translation for {}",
            record.language_code
        ))?;
        Ok(())
    }

    pub fn get_translation(&self, language_code: &str) -> Result<Option<TranslationRecord>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT language_code, summary, description, keyword1, keyword2, keyword3, timestamp
             FROM translations WHERE language_code = ?1",
            params![language_code],
            |row| {
                Ok(TranslationRecord {
                    language_code: row.get(0)?,
                    summary: row.get(1)?,
                    description: row.get(2)?,
                    keyword1: row.get(3)?,
                    keyword2: row.get(4)?,
                    keyword3: row.get(5)?,
                    timestamp: row.get(6)?,
                })
            },
        )
        .optional()
        .context(format!("Failed to read translation for {}", language_code))
    }

    pub fn all_translations(&self) -> Result<Vec<TranslationRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT language_code, summary, description, keyword1, keyword2, keyword3, timestamp
             FROM translations ORDER BY language_code",
        )?;
        let records = stmt
            .query_map([], |row| {
                Ok(TranslationRecord {
                    language_code: row.get(0)?,
                    summary: row.get(1)?,
                    description: row.get(2)?,
                    keyword1: row.get(3)?,
                    keyword2: row.get(4)?,
                    keyword3: row.get(5)?,
                    timestamp: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("Failed to read translations")?;
        Ok(records)
    }

    /// Remove one stored translation. Returns whether a row existed.
    pub fn delete_translation(&self, language_code: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap();
        let changes = conn
            .execute(
                "DELETE FROM translations WHERE language_code = ?1",
                params![language_code],
            )
            .context(format!(
                "Failed to delete translation for {}",
                language_code
            ))?;
        Ok(changes > 0)
    }

    /// Remove every stored translation. Returns how many rows were dropped.
    pub fn clear_translations(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count = conn
            .execute("DELETE FROM translations", [])
            .context("Failed to clear translations")?;
        Ok(count)
    }
}

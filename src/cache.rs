//! In-memory translation cache backed by the database.
//!
//! The map holds fully assembled records only: a language either has a
//! complete cached translation or none at all. Writes hit the database
//! first, so memory never claims a translation disk does not have.

use crate::db::{Database, TranslationRecord};
use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub struct TranslationCache {
    entries: Arc<Mutex<HashMap<String, TranslationRecord>>>,
    db: Database,
}

/// Per-language summary for the cache status endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatusEntry {
    pub language_code: String,
    pub timestamp: String,
    pub summary_length: usize,
    pub description_length: usize,
}

impl TranslationCache {
    /// Load every stored translation into memory.
    pub fn new(db: Database) -> Result<Self> {
        let records = db.all_translations()?;
        let mut entries = HashMap::new();
        for record in records {
            entries.insert(record.language_code.clone(), record);
        }
        info!("Loaded {} cached translations from database", entries.len());
        Ok(TranslationCache {
            entries: Arc::new(Mutex::new(entries)),
            db,
        })
    }

    pub fn has(&self, language_code: &str) -> bool {
        self.entries.lock().unwrap().contains_key(language_code)
    }

    pub fn get(&self, language_code: &str) -> Option<TranslationRecord> {
        self.entries.lock().unwrap().get(language_code).cloned()
    }

    /// Store a complete record, database first. A failed database write
    /// leaves the map untouched.
    pub fn put(&self, record: &TranslationRecord) -> Result<()> {
        self.db.store_translation(record)?;
        self.entries
            .lock()
            .unwrap()
            .insert(record.language_code.clone(), record.clone());
        Ok(())
    }

    /// Cached language codes in lexicographic order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    /// Drop everything, database first. Returns how many rows went away.
    pub fn clear(&self) -> Result<usize> {
        let count = self.db.clear_translations()?;
        self.entries.lock().unwrap().clear();
        Ok(count)
    }

    pub fn status(&self) -> Vec<CacheStatusEntry> {
        let entries = self.entries.lock().unwrap();
        let mut status: Vec<CacheStatusEntry> = entries
            .values()
            .map(|record| CacheStatusEntry {
                language_code: record.language_code.clone(),
                timestamp: record.timestamp.clone(),
                summary_length: record.summary.chars().count(),
                description_length: record.description.chars().count(),
            })
            .collect();
        status.sort_by(|a, b| a.language_code.cmp(&b.language_code));
        status
    }
}

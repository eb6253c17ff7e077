//! Listing console abstraction.
//!
//! The marketplace console is an interactive page; runs only need the five
//! operations below, so they sit behind a trait. The default implementation
//! keeps applied fields in memory, which makes full runs observable without
//! touching a real listing.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Field values pushed to the listing page for one language.
///
/// A `None` leaves the page's current value untouched, which is how field
/// toggles keep disabled fields out of the apply pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppliedFields {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub keyword1: Option<String>,
    pub keyword2: Option<String>,
    pub keyword3: Option<String>,
}

/// Field values read back from the listing page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SavedFields {
    pub summary: String,
    pub description: String,
}

/// Operations a translation run needs from the listing console.
#[async_trait]
pub trait ListingConsole: Send + Sync {
    /// Switch the page to a language by display name. Returns false when
    /// the listing does not offer that language.
    async fn select_language(&self, name: &str) -> Result<bool>;

    /// Fill the selected language's fields. Requires a selected language.
    async fn apply_fields(&self, fields: &AppliedFields) -> Result<()>;

    /// Save the selected language and return the confirmation message.
    async fn save(&self) -> Result<String>;

    /// Read the selected language's saved field values.
    async fn read_current_fields(&self) -> Result<SavedFields>;

    /// Return to the listing overview.
    async fn navigate_back(&self) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
struct StoredFields {
    summary: String,
    description: String,
    keyword1: String,
    keyword2: String,
    keyword3: String,
}

#[derive(Debug, Default)]
struct ConsoleState {
    current: Option<String>,
    saved: HashMap<String, StoredFields>,
}

/// In-memory console that mimics the listing page: languages can be marked
/// missing, applied fields persist per language, and saves always confirm.
pub struct DryRunConsole {
    missing: HashSet<String>,
    state: Mutex<ConsoleState>,
}

impl DryRunConsole {
    pub fn new() -> Self {
        DryRunConsole {
            missing: HashSet::new(),
            state: Mutex::new(ConsoleState::default()),
        }
    }

    /// Console whose listing page lacks the given language display names.
    pub fn with_missing_languages<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DryRunConsole {
            missing: names.into_iter().map(Into::into).collect(),
            state: Mutex::new(ConsoleState::default()),
        }
    }
}

impl Default for DryRunConsole {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ListingConsole for DryRunConsole {
    async fn select_language(&self, name: &str) -> Result<bool> {
        if self.missing.contains(name) {
            return Ok(false);
        }
        let mut state = self.state.lock().unwrap();
        state.current = Some(name.to_string());
        Ok(true)
    }

    async fn apply_fields(&self, fields: &AppliedFields) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let current = match &state.current {
            Some(name) => name.clone(),
            None => bail!("No language selected on the listing page"),
        };

        let entry = state.saved.entry(current).or_default();
        if let Some(summary) = &fields.summary {
            entry.summary = summary.clone();
        }
        if let Some(description) = &fields.description {
            entry.description = description.clone();
        }
        if let Some(keyword1) = &fields.keyword1 {
            entry.keyword1 = keyword1.clone();
        }
        if let Some(keyword2) = &fields.keyword2 {
            entry.keyword2 = keyword2.clone();
        }
        if let Some(keyword3) = &fields.keyword3 {
            entry.keyword3 = keyword3.clone();
        }
        Ok(())
    }

    async fn save(&self) -> Result<String> {
        let state = self.state.lock().unwrap();
        if state.current.is_none() {
            bail!("No language selected on the listing page");
        }
        Ok("Your changes were saved.".to_string())
    }

    async fn read_current_fields(&self) -> Result<SavedFields> {
        let state = self.state.lock().unwrap();
        let current = match &state.current {
            Some(name) => name,
            None => bail!("No language selected on the listing page"),
        };

        let entry = state.saved.get(current).cloned().unwrap_or_default();
        Ok(SavedFields {
            summary: entry.summary,
            description: entry.description,
        })
    }

    async fn navigate_back(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.current = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    // ==================== Selection Tests ====================

    #[test]
    fn test_select_known_language() {
        let console = DryRunConsole::new();
        assert!(block_on(console.select_language("French")).unwrap());
    }

    #[test]
    fn test_select_missing_language_returns_false() {
        let console = DryRunConsole::with_missing_languages(["Serbian (Latin)"]);
        assert!(!block_on(console.select_language("Serbian (Latin)")).unwrap());
        assert!(block_on(console.select_language("French")).unwrap());
    }

    // ==================== Apply/Read Tests ====================

    #[test]
    fn test_apply_without_selection_fails() {
        let console = DryRunConsole::new();
        let result = block_on(console.apply_fields(&AppliedFields::default()));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("No language selected"));
    }

    #[test]
    fn test_apply_and_read_back() {
        let console = DryRunConsole::new();
        block_on(console.select_language("German")).unwrap();

        let fields = AppliedFields {
            summary: Some("Ein einfacher Aufgabenmanager".to_string()),
            description: Some("<p>Beschreibung</p>".to_string()),
            keyword1: Some("Aufgaben".to_string()),
            keyword2: None,
            keyword3: None,
        };
        block_on(console.apply_fields(&fields)).unwrap();

        let saved = block_on(console.read_current_fields()).unwrap();
        assert_eq!(saved.summary, "Ein einfacher Aufgabenmanager");
        assert_eq!(saved.description, "<p>Beschreibung</p>");
    }

    #[test]
    fn test_none_fields_leave_existing_values() {
        let console = DryRunConsole::new();
        block_on(console.select_language("German")).unwrap();

        block_on(console.apply_fields(&AppliedFields {
            summary: Some("erste Fassung".to_string()),
            description: Some("<p>alt</p>".to_string()),
            ..Default::default()
        }))
        .unwrap();

        // Second apply touches only the description
        block_on(console.apply_fields(&AppliedFields {
            description: Some("<p>neu</p>".to_string()),
            ..Default::default()
        }))
        .unwrap();

        let saved = block_on(console.read_current_fields()).unwrap();
        assert_eq!(saved.summary, "erste Fassung");
        assert_eq!(saved.description, "<p>neu</p>");
    }

    #[test]
    fn test_fields_are_kept_per_language() {
        let console = DryRunConsole::new();

        block_on(console.select_language("French")).unwrap();
        block_on(console.apply_fields(&AppliedFields {
            summary: Some("résumé français".to_string()),
            ..Default::default()
        }))
        .unwrap();

        block_on(console.select_language("Italian")).unwrap();
        block_on(console.apply_fields(&AppliedFields {
            summary: Some("riassunto italiano".to_string()),
            ..Default::default()
        }))
        .unwrap();

        block_on(console.select_language("French")).unwrap();
        let saved = block_on(console.read_current_fields()).unwrap();
        assert_eq!(saved.summary, "résumé français");
    }

    #[test]
    fn test_read_unwritten_language_is_empty() {
        let console = DryRunConsole::new();
        block_on(console.select_language("Polish")).unwrap();

        let saved = block_on(console.read_current_fields()).unwrap();
        assert_eq!(saved, SavedFields::default());
    }

    // ==================== Save/Navigation Tests ====================

    #[test]
    fn test_save_returns_confirmation() {
        let console = DryRunConsole::new();
        block_on(console.select_language("Spanish")).unwrap();

        let message = block_on(console.save()).unwrap();
        assert_eq!(message, "Your changes were saved.");
    }

    #[test]
    fn test_save_without_selection_fails() {
        let console = DryRunConsole::new();
        assert!(block_on(console.save()).is_err());
    }

    #[test]
    fn test_navigate_back_clears_selection() {
        let console = DryRunConsole::new();
        block_on(console.select_language("Dutch")).unwrap();
        block_on(console.navigate_back()).unwrap();

        assert!(block_on(console.read_current_fields()).is_err());
    }

    #[test]
    fn test_saved_fields_survive_navigation() {
        let console = DryRunConsole::new();
        block_on(console.select_language("Dutch")).unwrap();
        block_on(console.apply_fields(&AppliedFields {
            summary: Some("eenvoudig takenbeheer".to_string()),
            ..Default::default()
        }))
        .unwrap();
        block_on(console.save()).unwrap();
        block_on(console.navigate_back()).unwrap();

        block_on(console.select_language("Dutch")).unwrap();
        let saved = block_on(console.read_current_fields()).unwrap();
        assert_eq!(saved.summary, "eenvoudig takenbeheer");
    }
}

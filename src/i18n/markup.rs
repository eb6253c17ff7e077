//! Markup preservation checks for translated descriptions.
//!
//! The description prompt instructs the model to keep tags, templating
//! placeholders, entities, and URLs exactly as they appear in the source.
//! This module spot-checks that contract after the fact. Findings are
//! advisory: they are logged so an operator can audit a language, they
//! never fail a translation.

use regex::Regex;
use std::sync::OnceLock;

/// Outcome of comparing a translated description against its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupReport {
    /// Structural problems (tag sequence broken) that usually mean the
    /// rendered page will differ
    pub errors: Vec<String>,

    /// Softer drift (placeholders, entities, URLs) worth a look
    pub warnings: Vec<String>,
}

impl MarkupReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for MarkupReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Comparator for markup-bearing translations.
pub struct MarkupCheck;

// Compiled once per process
static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();
static ENTITY_REGEX: OnceLock<Regex> = OnceLock::new();
static URL_REGEX: OnceLock<Regex> = OnceLock::new();

impl MarkupCheck {
    /// Compare a source description with its translation.
    pub fn check(original: &str, translated: &str) -> MarkupReport {
        let mut report = MarkupReport::new();

        let orig_tags = Self::extract_tags(original);
        let trans_tags = Self::extract_tags(translated);
        if orig_tags.len() != trans_tags.len() {
            report.errors.push(format!(
                "Tag count mismatch: original has {} tags, translation has {}",
                orig_tags.len(),
                trans_tags.len()
            ));
        } else if orig_tags != trans_tags {
            report
                .errors
                .push("Tag order mismatch: same tag count but different sequence".to_string());
        }

        let orig_placeholders = Self::extract_placeholders(original);
        let trans_placeholders = Self::extract_placeholders(translated);
        if orig_placeholders != trans_placeholders {
            report.warnings.push(format!(
                "Placeholder mismatch: original has {:?}, translation has {:?}",
                orig_placeholders, trans_placeholders
            ));
        }

        let orig_entities = Self::extract_entities(original);
        let trans_entities = Self::extract_entities(translated);
        if orig_entities.len() != trans_entities.len() {
            report.warnings.push(format!(
                "Entity count mismatch: original has {}, translation has {}",
                orig_entities.len(),
                trans_entities.len()
            ));
        }

        let orig_urls = Self::extract_urls(original);
        let trans_urls = Self::extract_urls(translated);
        if orig_urls != trans_urls {
            report.warnings.push(format!(
                "URL mismatch: original has {} URLs, translation has {}",
                orig_urls.len(),
                trans_urls.len()
            ));
        }

        report
    }

    /// Opening and closing tag tokens, in document order (`<p`, `</p`, ...).
    fn extract_tags(text: &str) -> Vec<String> {
        let regex = TAG_REGEX.get_or_init(|| Regex::new(r"</?[a-zA-Z][a-zA-Z0-9-]*").unwrap());

        regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Templating placeholders: `{{var}}`, `#{var}`, `<%= var %>`, `%{var}`.
    fn extract_placeholders(text: &str) -> Vec<String> {
        let regex = PLACEHOLDER_REGEX.get_or_init(|| {
            Regex::new(r"\{\{[^{}]*\}\}|#\{[^{}]*\}|<%=?[^%]*%>|%\{[^{}]*\}").unwrap()
        });

        regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// HTML entities, named or numeric.
    fn extract_entities(text: &str) -> Vec<String> {
        let regex =
            ENTITY_REGEX.get_or_init(|| Regex::new(r"&[a-zA-Z]+;|&#[0-9]+;").unwrap());

        regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    fn extract_urls(text: &str) -> Vec<String> {
        let regex =
            URL_REGEX.get_or_init(|| Regex::new(r#"https?://[^\s"'<>]+"#).unwrap());

        regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

//! Error taxonomy for translation runs and validation passes.
//!
//! Most functions return `anyhow::Result`; these variants are attached
//! where a caller needs to tell failure classes apart. A translation
//! failure marks one language failed and the batch moves on, while a
//! missing source record aborts the whole run.

use crate::fields::FieldKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// One (language, field) translation failed. The owning language is
    /// recorded as failed and the rest of the batch continues.
    #[error("translation failed for {language} {field}: {source}")]
    Translation {
        language: String,
        field: FieldKind,
        #[source]
        source: anyhow::Error,
    },

    /// No source content exists, so there is nothing to translate.
    #[error("No product content found in database. Please add content through the web interface.")]
    MissingContent,

    /// The listing page does not offer this language. The apply pass
    /// skips it; this is not a translation failure.
    #[error("Language '{0}' not found on the listing page")]
    LanguageNotFound(String),

    /// Validation was asked about a language the cache has no record
    /// for. The language's validation is aborted and never retried.
    #[error("No cached translation for '{0}'")]
    MissingCacheEntry(String),

    /// A field the validator expected to read was absent from the page.
    #[error("Field {field} not found for {language}")]
    FieldNotFound { language: String, field: FieldKind },

    /// An operation exceeded its deadline.
    #[error("{operation} timed out after {millis}ms")]
    Timeout { operation: String, millis: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    // ==================== Display Tests ====================

    #[test]
    fn test_translation_error_message() {
        let err = PipelineError::Translation {
            language: "fr-FR".to_string(),
            field: FieldKind::Summary,
            source: anyhow!("connection refused"),
        };
        assert_eq!(
            err.to_string(),
            "translation failed for fr-FR summary: connection refused"
        );
    }

    #[test]
    fn test_missing_content_message() {
        assert_eq!(
            PipelineError::MissingContent.to_string(),
            "No product content found in database. Please add content through the web interface."
        );
    }

    #[test]
    fn test_language_not_found_message() {
        let err = PipelineError::LanguageNotFound("Klingon".to_string());
        assert_eq!(
            err.to_string(),
            "Language 'Klingon' not found on the listing page"
        );
    }

    #[test]
    fn test_missing_cache_entry_message() {
        let err = PipelineError::MissingCacheEntry("de-DE".to_string());
        assert_eq!(err.to_string(), "No cached translation for 'de-DE'");
    }

    #[test]
    fn test_field_not_found_message() {
        let err = PipelineError::FieldNotFound {
            language: "French".to_string(),
            field: FieldKind::Description,
        };
        assert_eq!(err.to_string(), "Field description not found for French");
    }

    #[test]
    fn test_timeout_message() {
        let err = PipelineError::Timeout {
            operation: "read fields".to_string(),
            millis: 30_000,
        };
        assert_eq!(err.to_string(), "read fields timed out after 30000ms");
    }

    // ==================== Downcast Tests ====================

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error = PipelineError::MissingCacheEntry("ja-JP".to_string()).into();
        match err.downcast_ref::<PipelineError>() {
            Some(PipelineError::MissingCacheEntry(code)) => assert_eq!(code, "ja-JP"),
            other => panic!("unexpected downcast: {:?}", other),
        }
    }

    #[test]
    fn test_translation_source_preserved() {
        let err: anyhow::Error = PipelineError::Translation {
            language: "it-IT".to_string(),
            field: FieldKind::Keyword,
            source: anyhow!("OpenAI API error during translation (429): too fast"),
        }
        .into();
        let chain = format!("{:#}", err);
        assert!(chain.contains("(429)"));
        assert!(chain.contains("it-IT"));
    }
}

//! Field policy: which listing fields exist, how each is prompted and
//! bounded, and which ones a run is allowed to touch.

use crate::config::Config;
use serde::{Deserialize, Serialize};
use std::fmt;

const SUMMARY_PERSONA: &str =
    "You are a professional translator specializing in concise product summaries and marketing copy.";
const KEYWORD_PERSONA: &str =
    "You are a professional translator specializing in search keywords and SEO terms.";
const DESCRIPTION_PERSONA: &str =
    "You are a professional translator specializing in software and technology content.";

/// Policy class of a listing field. The three keyword slots share one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Summary,
    Description,
    Keyword,
}

/// Prompting and length policy for one field kind.
#[derive(Debug, Clone, Copy)]
pub struct FieldProfile {
    /// System persona sent with every chat completion for this kind.
    pub persona: &'static str,
    /// Completion token ceiling passed to the model.
    pub max_tokens: u32,
    /// Hard character cap enforced after translation, if any.
    pub max_chars: Option<usize>,
    /// Whether markup is stripped and whitespace collapsed in the output.
    pub plain_text_only: bool,
}

impl FieldKind {
    /// Policy for this kind, with ceilings taken from configuration.
    pub fn profile(&self, config: &Config) -> FieldProfile {
        match self {
            FieldKind::Summary => FieldProfile {
                persona: SUMMARY_PERSONA,
                max_tokens: config.summary_max_tokens,
                max_chars: Some(config.summary_max_chars),
                plain_text_only: true,
            },
            FieldKind::Keyword => FieldProfile {
                persona: KEYWORD_PERSONA,
                max_tokens: config.keyword_max_tokens,
                max_chars: Some(config.keyword_max_chars),
                plain_text_only: true,
            },
            FieldKind::Description => FieldProfile {
                persona: DESCRIPTION_PERSONA,
                max_tokens: config.description_max_tokens,
                max_chars: None,
                plain_text_only: false,
            },
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Summary => "summary",
            FieldKind::Description => "description",
            FieldKind::Keyword => "keyword",
        };
        write!(f, "{}", name)
    }
}

/// One concrete translatable field on the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentField {
    Summary,
    Description,
    Keyword1,
    Keyword2,
    Keyword3,
}

impl ContentField {
    /// Every field, in the order runs process them.
    pub const ALL: [ContentField; 5] = [
        ContentField::Summary,
        ContentField::Description,
        ContentField::Keyword1,
        ContentField::Keyword2,
        ContentField::Keyword3,
    ];

    pub fn kind(&self) -> FieldKind {
        match self {
            ContentField::Summary => FieldKind::Summary,
            ContentField::Description => FieldKind::Description,
            ContentField::Keyword1 | ContentField::Keyword2 | ContentField::Keyword3 => {
                FieldKind::Keyword
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentField::Summary => "summary",
            ContentField::Description => "description",
            ContentField::Keyword1 => "keyword1",
            ContentField::Keyword2 => "keyword2",
            ContentField::Keyword3 => "keyword3",
        }
    }
}

impl fmt::Display for ContentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which field groups a run translates and applies.
///
/// A toggled-off field is passed through from the source rather than
/// skipped, so every stored translation record stays complete.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FieldToggles {
    pub summary: bool,
    pub description: bool,
    pub keywords: bool,
}

impl Default for FieldToggles {
    fn default() -> Self {
        FieldToggles {
            summary: true,
            description: true,
            keywords: true,
        }
    }
}

impl FieldToggles {
    pub fn should_translate(&self, field: ContentField) -> bool {
        match field.kind() {
            FieldKind::Summary => self.summary,
            FieldKind::Description => self.description,
            FieldKind::Keyword => self.keywords,
        }
    }
}

use super::registry::{LanguageConfig, LanguageRegistry};
use anyhow::{bail, Result};

/// A validated handle onto one registry language.
///
/// `Language` is cheap to copy and can only be constructed through the
/// registry, so holding one guarantees the code is known and enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    code: &'static str,
}

impl Language {
    /// The canonical source language of every listing.
    pub const ENGLISH: Language = Language { code: "en-US" };

    /// Resolve a language code against the registry.
    pub fn from_code(code: &str) -> Result<Self> {
        let registry = LanguageRegistry::get();
        match registry.get_by_code(code) {
            Some(config) if config.enabled => Ok(Language { code: config.code }),
            Some(config) => bail!("Language '{}' is not enabled", config.code),
            None => bail!("Unknown language code: {}", code),
        }
    }

    /// The canonical language (the one source content is authored in).
    pub fn canonical() -> Self {
        Language {
            code: LanguageRegistry::get().canonical().code,
        }
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Full registry entry backing this language.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language is only constructed from registry codes")
    }

    /// English display name, used in console menus and prompts.
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    pub fn is_canonical(&self) -> bool {
        self.config().is_canonical
    }
}

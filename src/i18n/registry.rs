//! Central registry of supported listing languages.
//!
//! The registry is the single source of truth for which languages exist,
//! how they are displayed, and which one is canonical (the language the
//! source content is authored in). It is loaded once per process and
//! shared via a `OnceLock` singleton.

use std::sync::OnceLock;

/// Static configuration for a single language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// BCP 47 code used as the identity everywhere (cache keys, API paths)
    pub code: &'static str,

    /// English display name, as shown in the listing console's language menu
    pub name: &'static str,

    /// Name of the language in the language itself
    pub native_name: &'static str,

    /// Whether this is the canonical (source) language
    pub is_canonical: bool,

    /// Whether the language participates in translation runs
    pub enabled: bool,
}

/// Registry of all known languages.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the process-wide registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: supported_languages(),
        })
    }

    /// Look up a language by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// All enabled languages, in registry order.
    pub fn list_enabled(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().filter(|lang| lang.enabled).collect()
    }

    /// Every known language, enabled or not.
    pub fn list_all(&self) -> &[LanguageConfig] {
        &self.languages
    }

    /// The canonical language the source content is authored in.
    ///
    /// Panics if the table does not contain exactly one canonical entry;
    /// that is a programming error in the static table, not a runtime
    /// condition.
    pub fn canonical(&self) -> &LanguageConfig {
        let mut canonical = self.languages.iter().filter(|lang| lang.is_canonical);
        let first = canonical
            .next()
            .expect("language registry must contain a canonical language");
        assert!(
            canonical.next().is_none(),
            "language registry must contain exactly one canonical language"
        );
        first
    }

    pub fn is_enabled(&self, code: &str) -> bool {
        self.get_by_code(code).map(|lang| lang.enabled).unwrap_or(false)
    }
}

/// The full language table of the listing marketplace.
///
/// Order matters: the canonical language comes first, the rest follow the
/// console's menu order (alphabetical by English name). Filtering preserves
/// this order; only cache listings sort by code.
fn supported_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en-US",
            name: "English",
            native_name: "English",
            is_canonical: true,
            enabled: true,
        },
        LanguageConfig {
            code: "ar-SA",
            name: "Arabic",
            native_name: "العربية",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "bg-BG",
            name: "Bulgarian",
            native_name: "Български",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "zh-CN",
            name: "Chinese (Simplified)",
            native_name: "简体中文",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "zh-TW",
            name: "Chinese (Traditional)",
            native_name: "繁體中文",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "hr-HR",
            name: "Croatian",
            native_name: "Hrvatski",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "cs-CZ",
            name: "Czech",
            native_name: "Čeština",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "da-DK",
            name: "Danish",
            native_name: "Dansk",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "nl-NL",
            name: "Dutch",
            native_name: "Nederlands",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "et-EE",
            name: "Estonian",
            native_name: "Eesti",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "fi-FI",
            name: "Finnish",
            native_name: "Suomi",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "fr-FR",
            name: "French",
            native_name: "Français",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "de-DE",
            name: "German",
            native_name: "Deutsch",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "el-GR",
            name: "Greek",
            native_name: "Ελληνικά",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "he-IL",
            name: "Hebrew",
            native_name: "עברית",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "hu-HU",
            name: "Hungarian",
            native_name: "Magyar",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "id-ID",
            name: "Indonesian",
            native_name: "Bahasa Indonesia",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "it-IT",
            name: "Italian",
            native_name: "Italiano",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "ja-JP",
            name: "Japanese",
            native_name: "日本語",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "ko-KR",
            name: "Korean",
            native_name: "한국어",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "lv-LV",
            name: "Latvian",
            native_name: "Latviešu",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "lt-LT",
            name: "Lithuanian",
            native_name: "Lietuvių",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "nb-NO",
            name: "Norwegian (Bokmål)",
            native_name: "Norsk Bokmål",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "pl-PL",
            name: "Polish",
            native_name: "Polski",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "pt-BR",
            name: "Portuguese (Brazil)",
            native_name: "Português (Brasil)",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "pt-PT",
            name: "Portuguese (Portugal)",
            native_name: "Português (Portugal)",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "ro-RO",
            name: "Romanian",
            native_name: "Română",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "ru-RU",
            name: "Russian",
            native_name: "Русский",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "sr-Latn-RS",
            name: "Serbian (Latin)",
            native_name: "Srpski (latinica)",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "sk-SK",
            name: "Slovak",
            native_name: "Slovenčina",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "sl-SI",
            name: "Slovenian",
            native_name: "Slovenščina",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "es-ES",
            name: "Spanish",
            native_name: "Español",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "sv-SE",
            name: "Swedish",
            native_name: "Svenska",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "th-TH",
            name: "Thai",
            native_name: "ไทย",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "tr-TR",
            name: "Turkish",
            native_name: "Türkçe",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "uk-UA",
            name: "Ukrainian",
            native_name: "Українська",
            is_canonical: false,
            enabled: true,
        },
        LanguageConfig {
            code: "vi-VN",
            name: "Vietnamese",
            native_name: "Tiếng Việt",
            is_canonical: false,
            enabled: true,
        },
    ]
}

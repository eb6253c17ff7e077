//! Include/exclude narrowing of the supported-language list.

use super::registry::{LanguageConfig, LanguageRegistry};
use serde::{Deserialize, Serialize};

/// Narrows the full language table down to the set a run should touch.
///
/// Useful for smoke-testing a batch against two or three languages before
/// paying for all 37.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageFilter {
    pub enabled: bool,

    /// When non-empty, only these codes survive
    #[serde(default)]
    pub include: Vec<String>,

    /// Codes dropped from the result, applied after `include`
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl LanguageFilter {
    /// Apply the filter to a language list.
    ///
    /// A disabled filter returns the input unchanged. An enabled filter
    /// first keeps only codes listed in `include` (when non-empty), then
    /// drops any code listed in `exclude`. Input order survives. An empty
    /// result is legitimate; it means the run has nothing to process.
    pub fn apply<'a>(&self, languages: Vec<&'a LanguageConfig>) -> Vec<&'a LanguageConfig> {
        if !self.enabled {
            return languages;
        }

        let mut filtered = languages;
        if !self.include.is_empty() {
            filtered.retain(|lang| self.include.iter().any(|code| code == lang.code));
        }
        if !self.exclude.is_empty() {
            filtered.retain(|lang| !self.exclude.iter().any(|code| code == lang.code));
        }
        filtered
    }

    /// The active language codes after filtering the registry, in registry
    /// order.
    pub fn active_codes(&self) -> Vec<String> {
        self.apply(LanguageRegistry::get().list_enabled())
            .into_iter()
            .map(|lang| lang.code.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn all_codes() -> Vec<String> {
        LanguageRegistry::get()
            .list_enabled()
            .into_iter()
            .map(|lang| lang.code.to_string())
            .collect()
    }

    // ==================== Disabled Filter Tests ====================

    #[test]
    fn test_disabled_filter_is_identity() {
        let filter = LanguageFilter {
            enabled: false,
            include: vec!["fr-FR".to_string()],
            exclude: vec!["de-DE".to_string()],
        };

        let all = LanguageRegistry::get().list_enabled();
        let result = filter.apply(all.clone());

        assert_eq!(result.len(), all.len());
        for (got, expected) in result.iter().zip(all.iter()) {
            assert_eq!(got.code, expected.code, "order must be preserved");
        }
    }

    #[test]
    fn test_default_filter_is_disabled() {
        let filter = LanguageFilter::default();
        assert!(!filter.enabled);
        assert_eq!(filter.active_codes().len(), 37);
    }

    // ==================== Include Tests ====================

    #[test]
    fn test_include_keeps_only_listed_codes() {
        let filter = LanguageFilter {
            enabled: true,
            include: vec!["fr-FR".to_string(), "ja-JP".to_string()],
            exclude: vec![],
        };

        let codes = filter.active_codes();
        assert_eq!(codes, vec!["fr-FR", "ja-JP"]);
    }

    #[test]
    fn test_include_preserves_registry_order() {
        // Listed out of registry order on purpose
        let filter = LanguageFilter {
            enabled: true,
            include: vec![
                "vi-VN".to_string(),
                "ar-SA".to_string(),
                "en-US".to_string(),
            ],
            exclude: vec![],
        };

        let codes = filter.active_codes();
        assert_eq!(codes, vec!["en-US", "ar-SA", "vi-VN"]);
    }

    #[test]
    fn test_include_with_unknown_code() {
        let filter = LanguageFilter {
            enabled: true,
            include: vec!["fr-FR".to_string(), "xx-XX".to_string()],
            exclude: vec![],
        };

        // Unknown codes simply never match anything
        assert_eq!(filter.active_codes(), vec!["fr-FR"]);
    }

    #[test]
    fn test_empty_include_keeps_everything() {
        let filter = LanguageFilter {
            enabled: true,
            include: vec![],
            exclude: vec![],
        };

        assert_eq!(filter.active_codes().len(), 37);
    }

    // ==================== Exclude Tests ====================

    #[test]
    fn test_exclude_removes_codes() {
        let filter = LanguageFilter {
            enabled: true,
            include: vec![],
            exclude: vec!["ar-SA".to_string(), "he-IL".to_string()],
        };

        let codes = filter.active_codes();
        assert_eq!(codes.len(), 35);
        assert!(!codes.contains(&"ar-SA".to_string()));
        assert!(!codes.contains(&"he-IL".to_string()));
    }

    #[test]
    fn test_exclude_applies_after_include() {
        let filter = LanguageFilter {
            enabled: true,
            include: vec!["fr-FR".to_string(), "de-DE".to_string()],
            exclude: vec!["de-DE".to_string()],
        };

        assert_eq!(filter.active_codes(), vec!["fr-FR"]);
    }

    #[test]
    fn test_filter_may_yield_empty_set() {
        let filter = LanguageFilter {
            enabled: true,
            include: vec!["fr-FR".to_string()],
            exclude: vec!["fr-FR".to_string()],
        };

        assert!(filter.active_codes().is_empty());
    }

    // ==================== Property Tests ====================

    proptest! {
        #[test]
        fn prop_result_subset_of_include(
            include in proptest::sample::subsequence(all_codes(), 1..10),
            exclude in proptest::sample::subsequence(all_codes(), 0..10),
        ) {
            let filter = LanguageFilter {
                enabled: true,
                include: include.clone(),
                exclude,
            };

            for code in filter.active_codes() {
                prop_assert!(include.contains(&code));
            }
        }

        #[test]
        fn prop_result_disjoint_from_exclude(
            include in proptest::sample::subsequence(all_codes(), 0..10),
            exclude in proptest::sample::subsequence(all_codes(), 0..10),
        ) {
            let filter = LanguageFilter {
                enabled: true,
                include,
                exclude: exclude.clone(),
            };

            for code in filter.active_codes() {
                prop_assert!(!exclude.contains(&code));
            }
        }
    }
}

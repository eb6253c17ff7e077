//! Language support for the localization pipeline.
//!
//! # Architecture
//!
//! - `registry`: static table of the 37 supported languages (singleton)
//! - `language`: validated, copyable handle onto a registry entry
//! - `filter`: include/exclude narrowing of the language list per run
//! - `markup`: advisory markup-preservation checks for translated HTML
//! - `metrics`: process-wide counters for cache and API activity

mod filter;
mod language;
mod markup;
mod metrics;
mod registry;

pub use filter::LanguageFilter;
pub use language::Language;
pub use markup::{MarkupCheck, MarkupReport};
pub use metrics::{MetricsReport, TranslationMetrics};
pub use registry::{LanguageConfig, LanguageRegistry};

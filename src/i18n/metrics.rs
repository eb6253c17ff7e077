//! Process-wide translation run counters.
//!
//! Counters are cheap relaxed atomics; they exist for operator visibility
//! (the `/api/metrics` route and end-of-run log lines), not for billing.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Singleton counter set for translation activity.
pub struct TranslationMetrics {
    cache_hits: AtomicUsize,
    cache_misses: AtomicUsize,
    api_calls: AtomicUsize,
    api_failures: AtomicUsize,
    languages_succeeded: AtomicUsize,
    languages_failed: AtomicUsize,
}

static METRICS: OnceLock<TranslationMetrics> = OnceLock::new();

impl TranslationMetrics {
    pub fn get() -> &'static TranslationMetrics {
        METRICS.get_or_init(|| TranslationMetrics {
            cache_hits: AtomicUsize::new(0),
            cache_misses: AtomicUsize::new(0),
            api_calls: AtomicUsize::new(0),
            api_failures: AtomicUsize::new(0),
            languages_succeeded: AtomicUsize::new(0),
            languages_failed: AtomicUsize::new(0),
        })
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// One outbound LLM HTTP request (retries count individually).
    pub fn record_api_call(&self) {
        self.api_calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_api_failure(&self) {
        self.api_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_language_success(&self) {
        self.languages_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_language_failure(&self) {
        self.languages_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> usize {
        self.cache_misses.load(Ordering::Relaxed)
    }

    pub fn api_calls(&self) -> usize {
        self.api_calls.load(Ordering::Relaxed)
    }

    pub fn api_failures(&self) -> usize {
        self.api_failures.load(Ordering::Relaxed)
    }

    /// Snapshot of all counters plus derived rates.
    pub fn report(&self) -> MetricsReport {
        let cache_hits = self.cache_hits();
        let cache_misses = self.cache_misses();
        let api_calls = self.api_calls();
        let api_failures = self.api_failures();

        let cache_lookups = cache_hits + cache_misses;
        let cache_hit_rate = if cache_lookups > 0 {
            (cache_hits as f64 / cache_lookups as f64) * 100.0
        } else {
            0.0
        };
        let api_success_rate = if api_calls > 0 {
            ((api_calls - api_failures) as f64 / api_calls as f64) * 100.0
        } else {
            100.0
        };

        MetricsReport {
            cache_hits,
            cache_misses,
            cache_hit_rate,
            api_calls,
            api_failures,
            api_success_rate,
            languages_succeeded: self.languages_succeeded.load(Ordering::Relaxed),
            languages_failed: self.languages_failed.load(Ordering::Relaxed),
        }
    }

    /// Zero all counters. Test-only; production counters live for the
    /// process lifetime.
    #[cfg(test)]
    pub fn reset(&self) {
        self.cache_hits.store(0, Ordering::Relaxed);
        self.cache_misses.store(0, Ordering::Relaxed);
        self.api_calls.store(0, Ordering::Relaxed);
        self.api_failures.store(0, Ordering::Relaxed);
        self.languages_succeeded.store(0, Ordering::Relaxed);
        self.languages_failed.store(0, Ordering::Relaxed);
    }
}

/// Serializable counter snapshot, rates in percent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReport {
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub cache_hit_rate: f64,
    pub api_calls: usize,
    pub api_failures: usize,
    pub api_success_rate: f64,
    pub languages_succeeded: usize,
    pub languages_failed: usize,
}

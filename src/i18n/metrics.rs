//! Lookup metrics.
//!
//! Counts how lookups were answered: directly in the requested language,
//! through the default-language fallback, or not at all. Each resolver owns
//! its own counters.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Lookup counters for one resolver.
#[derive(Debug, Default)]
pub struct LookupMetrics {
    /// Lookups answered in the requested language
    exact_hits: AtomicUsize,

    /// Lookups answered in the default language
    default_fallbacks: AtomicUsize,

    /// Lookups that failed (missing key, value or language)
    misses: AtomicUsize,
}

impl LookupMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a lookup answered in the requested language.
    pub fn record_exact_hit(&self) {
        self.exact_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a lookup answered in the default language.
    pub fn record_default_fallback(&self) {
        self.default_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed lookup.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn exact_hits(&self) -> usize {
        self.exact_hits.load(Ordering::Relaxed)
    }

    pub fn default_fallbacks(&self) -> usize {
        self.default_fallbacks.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let exact_hits = self.exact_hits();
        let default_fallbacks = self.default_fallbacks();
        let misses = self.misses();
        let lookups = exact_hits + default_fallbacks + misses;

        let fallback_rate = if lookups > 0 {
            (default_fallbacks as f64 / lookups as f64) * 100.0
        } else {
            0.0
        };
        let miss_rate = if lookups > 0 {
            (misses as f64 / lookups as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            lookups,
            exact_hits,
            default_fallbacks,
            misses,
            fallback_rate,
            miss_rate,
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.exact_hits.store(0, Ordering::Relaxed);
        self.default_fallbacks.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of lookup statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    /// Total lookups recorded
    pub lookups: usize,

    pub exact_hits: usize,

    pub default_fallbacks: usize,

    pub misses: usize,

    /// Share of lookups answered by the default language, as a percentage (0-100)
    pub fallback_rate: f64,

    /// Share of failed lookups, as a percentage (0-100)
    pub miss_rate: f64,
}

//! Feed Engine Metrics
//!
//! Prometheus metrics for source fetches and page assembly

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};
use std::time::Duration;

static SOURCE_FETCH_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "feed_source_fetch_total",
        "Source fetch attempts by outcome (ok/error/timeout/debounced/exhausted)",
        &["source", "outcome"]
    )
    .expect("Failed to register feed source fetch metric")
});

static ITEMS_ASSEMBLED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "feed_items_assembled_total",
        "Feed items emitted by the assembler",
        &["kind"]
    )
    .expect("Failed to register feed items assembled metric")
});

static ADS_INJECTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "feed_ads_injected_total",
        "Sponsored items inserted into assembled pages"
    )
    .expect("Failed to register feed ads injected metric")
});

static ASSEMBLY_DURATION_SECONDS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "feed_assembly_duration_seconds",
        "Duration of merge, rank and ad injection for one page",
        vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]
    )
    .expect("Failed to register feed assembly duration metric")
});

/// Record the outcome of one source fetch
pub fn record_source_fetch(source: &str, outcome: &str) {
    SOURCE_FETCH_TOTAL
        .with_label_values(&[source, outcome])
        .inc();
}

/// Record one emitted feed item by kind
pub fn record_item_assembled(kind: &str) {
    ITEMS_ASSEMBLED_TOTAL.with_label_values(&[kind]).inc();
}

pub fn record_ads_injected(count: u64) {
    ADS_INJECTED_TOTAL.inc_by(count);
}

pub fn record_assembly_duration(duration: Duration) {
    ASSEMBLY_DURATION_SECONDS.observe(duration.as_secs_f64());
}

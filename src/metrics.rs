//! Metrics for the Anymailfinder node.
//!
//! Recorded through the `metrics` facade; the host decides which exporter
//! (if any) to install.
//!
//! ## Metrics
//!
//! ### Counters
//! - `amf_requests_total` - API requests by resource and status
//! - `amf_items_processed_total` - Input items by outcome
//!
//! ### Histograms
//! - `amf_request_duration_seconds` - API request duration by resource

use std::time::Duration;

use metrics::{counter, histogram};

/// Outcome label for a processed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    Success,
    Recovered,
    Failed,
}

impl ItemOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemOutcome::Success => "success",
            ItemOutcome::Recovered => "recovered",
            ItemOutcome::Failed => "failed",
        }
    }
}

/// Record an API request. `status` is `"error"` when no HTTP status was received.
pub fn record_request(resource: &str, status: &str) {
    counter!(
        "amf_requests_total",
        "resource" => resource.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record API request duration.
pub fn record_request_duration(duration: Duration, resource: &str) {
    histogram!(
        "amf_request_duration_seconds",
        "resource" => resource.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Record the outcome of one input item.
pub fn record_item(outcome: ItemOutcome) {
    counter!(
        "amf_items_processed_total",
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

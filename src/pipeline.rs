//! Normalize-then-track glue for a single tailer.
use normalize::{Document, Input, Normalizer, report_failure};
use tailtrack::{PositionStore, TailTracker, TrackedValue, TrackingError};
use tracing::{Level, debug, warn};

use crate::MetricsSpan;
use crate::config::{ConfigLoadError, DoctailConfig};

/// One tailer: a normalizer plus the bookmark it advances.
///
/// Dropped items (inputs that do not normalize) are invisible to the caller
/// apart from the normalizer's log record. Documents whose increasing field is
/// missing or out of order are still handed out; they just leave the bookmark
/// where it was.
#[derive(Debug, Clone)]
pub struct TailPipeline {
    normalizer: Normalizer,
    tracker: TailTracker,
}

impl TailPipeline {
    pub fn new(normalizer: Normalizer, tracker: TailTracker) -> Self {
        Self {
            normalizer,
            tracker,
        }
    }

    /// Builds a pipeline from a loaded configuration file.
    pub fn from_config(config: &DoctailConfig) -> Result<Self, ConfigLoadError> {
        let tracking = config.tail_tracking_config()?;
        Ok(Self::new(config.normalizer(), TailTracker::new(tracking)))
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn tracker(&self) -> &TailTracker {
        &self.tracker
    }

    /// Normalizes one inbound item and advances the bookmark past it.
    pub fn process(&mut self, input: Input<'_>) -> Option<Document> {
        let kind = input.kind();
        let span = tracing::span!(Level::DEBUG, "doctail.process", input = kind);
        let _guard = span.enter();

        let mut normalize_metrics = MetricsSpan::start();
        let document = match self.normalizer.convert(input) {
            Ok(document) => {
                if let Some(metrics) = normalize_metrics.take() {
                    metrics.record_normalize(Ok(()));
                }
                document
            }
            Err(err) => {
                if let Some(metrics) = normalize_metrics.take() {
                    metrics.record_normalize(Err(err.category()));
                }
                report_failure(kind, &err);
                return None;
            }
        };

        let mut tracking_metrics = MetricsSpan::start();
        let outcome = {
            let entries = document.read();
            self.tracker.observe(&entries)
        };
        if let Some(metrics) = tracking_metrics.take() {
            metrics.record_tracking(outcome.clone());
        }

        match outcome {
            Ok(true) => debug!(
                value = ?self.tracker.last_value().map(TrackedValue::as_value),
                "bookmark_advanced"
            ),
            Ok(false) => debug!("bookmark_unchanged"),
            Err(err) => warn!(
                increasing_field = %self.tracker.config().increasing_field(),
                error = %err,
                "tail_tracking_skipped"
            ),
        }

        Some(document)
    }

    /// Persists the bookmark if it moved and the tailer is persistent.
    pub fn checkpoint(&mut self, store: &dyn PositionStore) -> Result<bool, TrackingError> {
        self.tracker.persist(store)
    }

    /// Loads the persisted bookmark before polling starts.
    pub fn resume(
        &mut self,
        store: &dyn PositionStore,
    ) -> Result<Option<TrackedValue>, TrackingError> {
        self.tracker.recover(store).map(|value| value.cloned())
    }
}

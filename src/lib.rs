//! Workspace umbrella crate for doctail.
//!
//! This crate stitches the document normalizer and the tail tracker together
//! so a poller can go from "item of unknown shape" to "canonical document with
//! an advanced bookmark" through a single [`TailPipeline`].

pub use normalize::{
    FailureCategory, Input, MappableObject, MapperCapability, MapperError, NormalizeError,
    Normalizer, ObjectMapper, SharedMap, disable_object_mapper, install_object_mapper, normalize,
    object_mapper, report_failure, shared_map,
};
pub use normalize::Document;
#[cfg(feature = "object-mapper")]
pub use normalize::JsonObjectMapper;
pub use tailtrack::{
    DEFAULT_COLLECTION, DEFAULT_FIELD, InMemoryPositionStore, PersistenceKey, PositionStore,
    StoredPosition, TailTracker, TailTrackingConfig, TailTrackingSettings, TrackedValue,
    TrackingError,
};

mod config;
mod pipeline;

pub use crate::config::{
    ConfigLoadError, DoctailConfig, NormalizerYamlConfig, TailTrackingYamlConfig,
};
pub use crate::pipeline::TailPipeline;

use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

/// Metrics observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_normalize(&self, latency: Duration, result: Result<(), FailureCategory>);
    fn record_tracking(&self, latency: Duration, result: Result<bool, TrackingError>);
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

pub(crate) struct MetricsSpan {
    recorder: Arc<dyn PipelineMetrics>,
    start: Instant,
}

impl MetricsSpan {
    pub(crate) fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    pub(crate) fn record_normalize(self, result: Result<(), FailureCategory>) {
        self.recorder
            .record_normalize(self.start.elapsed(), result);
    }

    pub(crate) fn record_tracking(self, result: Result<bool, TrackingError>) {
        self.recorder.record_tracking(self.start.elapsed(), result);
    }
}

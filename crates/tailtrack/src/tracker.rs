//! In-process bookmark state for one tailer.
use std::cmp::Ordering;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::TailTrackingConfig;
use crate::error::TrackingError;
use crate::store::PositionStore;
use crate::value::TrackedValue;

/// Follows the increasing field across processed documents.
///
/// The tracker only moves forward. Whether it ever touches a
/// [`PositionStore`] depends on [`TailTrackingConfig::is_persistent`]; a
/// non-persistent tracker keeps its bookmark in memory only.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use tailtrack::{InMemoryPositionStore, TailTracker, TailTrackingConfig};
///
/// let config = TailTrackingConfig::new(true, "seq", None, None, None, Some("t1".into()));
/// let store = InMemoryPositionStore::new();
/// let mut tracker = TailTracker::new(config);
///
/// let doc = json!({"seq": 3}).as_object().cloned().unwrap();
/// assert!(tracker.observe(&doc).unwrap());
/// assert!(tracker.persist(&store).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct TailTracker {
    config: Arc<TailTrackingConfig>,
    last_value: Option<TrackedValue>,
    dirty: bool,
}

impl TailTracker {
    pub fn new(config: impl Into<Arc<TailTrackingConfig>>) -> Self {
        Self {
            config: config.into(),
            last_value: None,
            dirty: false,
        }
    }

    pub fn config(&self) -> &TailTrackingConfig {
        &self.config
    }

    /// Value of the increasing field in the last document that moved the bookmark.
    pub fn last_value(&self) -> Option<&TrackedValue> {
        self.last_value.as_ref()
    }

    /// True when the bookmark moved since it was last persisted or recovered.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Loads the persisted bookmark, replacing the in-memory one.
    ///
    /// A non-persistent tracker leaves `store` alone.
    pub fn recover(
        &mut self,
        store: &dyn PositionStore,
    ) -> Result<Option<&TrackedValue>, TrackingError> {
        if !self.config.is_persistent() {
            debug!(
                increasing_field = %self.config.increasing_field(),
                "tail_tracking_in_memory"
            );
            return Ok(self.last_value.as_ref());
        }

        let key = self.config.persistence_key();
        match store.load(&key)? {
            Some(stored) => {
                info!(
                    key = %key,
                    value = %stored.value,
                    updated_at = %stored.updated_at,
                    "tail_tracking_recovered"
                );
                self.last_value = Some(stored.value);
            }
            None => info!(key = %key, "tail_tracking_no_bookmark"),
        }
        self.dirty = false;
        Ok(self.last_value.as_ref())
    }

    /// Advances the bookmark to `document`'s increasing-field value.
    ///
    /// Returns `Ok(false)` when the value does not move past the current
    /// bookmark; the bookmark never goes back.
    pub fn observe(&mut self, document: &Map<String, Value>) -> Result<bool, TrackingError> {
        let field = self.config.increasing_field();
        let value = match document.get(field) {
            Some(value) if !value.is_null() => TrackedValue::new(value.clone()),
            _ => {
                return Err(TrackingError::MissingField {
                    field: field.to_string(),
                })
            }
        };

        if let Some(current) = &self.last_value {
            match value.compare(current) {
                Some(Ordering::Greater) => {}
                Some(_) => return Ok(false),
                None => {
                    return Err(TrackingError::Incomparable {
                        current: current.to_string(),
                        attempted: value.to_string(),
                    })
                }
            }
        }

        debug!(increasing_field = %field, value = %value, "tail_tracking_advanced");
        self.last_value = Some(value);
        self.dirty = true;
        Ok(true)
    }

    /// Saves the bookmark if this tracker is persistent and it moved.
    ///
    /// Returns whether anything was written.
    pub fn persist(&mut self, store: &dyn PositionStore) -> Result<bool, TrackingError> {
        if !self.config.is_persistent() || !self.dirty {
            return Ok(false);
        }
        let Some(value) = &self.last_value else {
            return Ok(false);
        };

        let key = self.config.persistence_key();
        store.save(&key, value)?;
        info!(key = %key, value = %value, "tail_tracking_persisted");
        self.dirty = false;
        Ok(true)
    }
}

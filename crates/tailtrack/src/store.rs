//! The persistence collaborator contract for bookmarks.
//!
//! Durable storage (a database collection, a file) lives outside this crate.
//! Whatever implements [`PositionStore`] must keep persisted positions
//! monotonic: a value saved later never sorts below one saved earlier for the
//! same [`PersistenceKey`]. [`InMemoryPositionStore`] is the reference
//! implementation used by tests and by process-lifetime tailers.
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::PersistenceKey;
use crate::error::TrackingError;
use crate::value::TrackedValue;

/// A persisted bookmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredPosition {
    pub value: TrackedValue,
    pub updated_at: DateTime<Utc>,
}

/// Reads and writes bookmarks by [`PersistenceKey`].
///
/// # Implementations
///
/// - [`InMemoryPositionStore`]: lives as long as the process
pub trait PositionStore: Send + Sync {
    /// Returns the bookmark for `key`, or `None` if nothing was saved yet.
    fn load(&self, key: &PersistenceKey) -> Result<Option<StoredPosition>, TrackingError>;

    /// Upserts the bookmark for `key`. Must reject values that would move it back.
    fn save(&self, key: &PersistenceKey, value: &TrackedValue) -> Result<(), TrackingError>;
}

/// Bookmarks held in a map for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemoryPositionStore {
    positions: RwLock<HashMap<PersistenceKey, StoredPosition>>,
}

impl InMemoryPositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<PersistenceKey, StoredPosition>> {
        self.positions
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PositionStore for InMemoryPositionStore {
    fn load(&self, key: &PersistenceKey) -> Result<Option<StoredPosition>, TrackingError> {
        Ok(self.read().get(key).cloned())
    }

    fn save(&self, key: &PersistenceKey, value: &TrackedValue) -> Result<(), TrackingError> {
        let mut positions = self
            .positions
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(current) = positions.get(key) {
            match value.compare(&current.value) {
                Some(Ordering::Less) => {
                    return Err(TrackingError::Regression {
                        key: key.to_string(),
                        current: current.value.to_string(),
                        attempted: value.to_string(),
                    });
                }
                Some(_) => {}
                None => {
                    return Err(TrackingError::Incomparable {
                        current: current.value.to_string(),
                        attempted: value.to_string(),
                    });
                }
            }
        }

        positions.insert(
            key.clone(),
            StoredPosition {
                value: value.clone(),
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }
}

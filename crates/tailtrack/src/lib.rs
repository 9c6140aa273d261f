//! doctail tail tracking.
//!
//! Everything a cursor-based poller needs to resume a tailed collection
//! without gaps or duplicate reprocessing:
//!
//! - [`TailTrackingConfig`] - the immutable position descriptor: which field
//!   orders documents, and where its last processed value is kept
//! - [`PersistenceKey`] - the `{db, collection, field, persistent_id}` tuple a
//!   persistence layer keys the bookmark on
//! - [`PositionStore`] - the contract that persistence layer implements, with
//!   [`InMemoryPositionStore`] as reference
//! - [`TailTracker`] - per-tailer state that only ever moves forward
//!
//! This crate does no I/O of its own; durable storage is whatever
//! [`PositionStore`] the caller hands in. Persisted positions must be
//! monotonic per key, and the in-memory store enforces that.
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use tailtrack::{InMemoryPositionStore, TailTracker, TailTrackingConfig};
//!
//! let store = InMemoryPositionStore::new();
//! let config = TailTrackingConfig::new(true, "ts", None, None, None, Some("feed".into()));
//!
//! let mut tracker = TailTracker::new(config.clone());
//! for ts in [10, 11, 12] {
//!     let doc = json!({ "ts": ts }).as_object().cloned().unwrap();
//!     tracker.observe(&doc).unwrap();
//! }
//! tracker.persist(&store).unwrap();
//!
//! let mut resumed = TailTracker::new(config);
//! let last = resumed.recover(&store).unwrap().cloned();
//! assert_eq!(last.map(|v| v.into_value()), Some(json!(12)));
//! ```

mod config;
mod error;
mod store;
mod tracker;
mod value;

pub use crate::config::{
    PersistenceKey, TailTrackingConfig, TailTrackingSettings, DEFAULT_COLLECTION, DEFAULT_FIELD,
};
pub use crate::error::TrackingError;
pub use crate::store::{InMemoryPositionStore, PositionStore, StoredPosition};
pub use crate::tracker::TailTracker;
pub use crate::value::TrackedValue;

//! The tail position descriptor.
//!
//! [`TailTrackingConfig`] says which document field orders the tailed
//! collection and where the last processed value of that field is kept. It is
//! built once from configuration and only read afterwards. Changing the
//! configuration means building a new descriptor and restarting the tailer
//! that owns it.
//!
//! # Defaults
//!
//! Only two inputs are defaulted, and only when absent:
//!
//! | Input | Default |
//! |-------|---------|
//! | `collection` | [`DEFAULT_COLLECTION`] (`"tailTrackingDefault"`) |
//! | `field` | [`DEFAULT_FIELD`] (`"lastTrackingValue"`) |
//!
//! `db` stays `None` when absent; resolving the ambient location is up to the
//! persistence layer. `increasing_field` has no default at all.
//!
//! # Serialization
//!
//! ```yaml
//! increasing_field: seq
//! persistent: true
//! db: local
//! collection: null
//! field: null
//! persistent_id: orders-1
//! ```
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Collection used when none is configured.
pub const DEFAULT_COLLECTION: &str = "tailTrackingDefault";

/// Bookmark field used when none is configured.
pub const DEFAULT_FIELD: &str = "lastTrackingValue";

/// Immutable description of how a tailed collection is bookmarked.
///
/// All fields are private; nothing can change a descriptor after
/// [`TailTrackingConfig::new`] returns.
///
/// # Examples
///
/// ```rust
/// use tailtrack::{TailTrackingConfig, DEFAULT_COLLECTION, DEFAULT_FIELD};
///
/// let config = TailTrackingConfig::new(true, "seq", None, None, None, Some("orders-1".into()));
///
/// assert_eq!(config.increasing_field(), "seq");
/// assert_eq!(config.collection(), DEFAULT_COLLECTION);
/// assert_eq!(config.field(), DEFAULT_FIELD);
/// assert_eq!(config.db(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "TailTrackingSettings")]
pub struct TailTrackingConfig {
    increasing_field: String,
    persistent: bool,
    db: Option<String>,
    collection: String,
    field: String,
    persistent_id: Option<String>,
}

impl TailTrackingConfig {
    /// Builds a descriptor, defaulting `collection` and `field` when absent.
    ///
    /// `increasing_field` is taken as given; validating it is the caller's job.
    /// Empty strings are kept as they are, only `None` is defaulted.
    pub fn new(
        persistent: bool,
        increasing_field: impl Into<String>,
        db: Option<String>,
        collection: Option<String>,
        field: Option<String>,
        persistent_id: Option<String>,
    ) -> Self {
        let collection = collection.unwrap_or_else(|| {
            debug!(
                setting = "collection",
                default = DEFAULT_COLLECTION,
                "tail_tracking_default_applied"
            );
            DEFAULT_COLLECTION.to_string()
        });
        let field = field.unwrap_or_else(|| {
            debug!(
                setting = "field",
                default = DEFAULT_FIELD,
                "tail_tracking_default_applied"
            );
            DEFAULT_FIELD.to_string()
        });

        Self {
            increasing_field: increasing_field.into(),
            persistent,
            db,
            collection,
            field,
            persistent_id,
        }
    }

    /// Field in each document whose value only grows.
    pub fn increasing_field(&self) -> &str {
        &self.increasing_field
    }

    /// Whether the bookmark must survive restarts.
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Database holding the bookmark; `None` means the ambient one.
    pub fn db(&self) -> Option<&str> {
        self.db.as_deref()
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Field the bookmark value is stored under.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Tells apart tailers sharing one bookmark collection.
    pub fn persistent_id(&self) -> Option<&str> {
        self.persistent_id.as_deref()
    }

    /// Key the persistence layer reads and writes the bookmark under.
    pub fn persistence_key(&self) -> PersistenceKey {
        PersistenceKey {
            db: self.db.clone(),
            collection: self.collection.clone(),
            field: self.field.clone(),
            persistent_id: self.persistent_id.clone(),
        }
    }
}

/// Raw tail-tracking settings as they appear in configuration files.
///
/// Converting into [`TailTrackingConfig`] is the only place defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TailTrackingSettings {
    pub increasing_field: String,
    #[serde(default)]
    pub persistent: bool,
    #[serde(default)]
    pub db: Option<String>,
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub persistent_id: Option<String>,
}

impl TailTrackingSettings {
    pub fn into_config(self) -> TailTrackingConfig {
        TailTrackingConfig::new(
            self.persistent,
            self.increasing_field,
            self.db,
            self.collection,
            self.field,
            self.persistent_id,
        )
    }
}

impl From<TailTrackingSettings> for TailTrackingConfig {
    fn from(settings: TailTrackingSettings) -> Self {
        settings.into_config()
    }
}

/// Location of one tailer's bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersistenceKey {
    pub db: Option<String>,
    pub collection: String,
    pub field: String,
    pub persistent_id: Option<String>,
}

impl fmt::Display for PersistenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}",
            self.db.as_deref().unwrap_or("<default>"),
            self.collection
        )?;
        if let Some(id) = &self.persistent_id {
            write!(f, "[{id}]")?;
        }
        write!(f, ".{}", self.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_collection_and_field_are_defaulted() {
        let config = TailTrackingConfig::new(false, "ts", None, None, None, None);
        assert_eq!(config.collection(), "tailTrackingDefault");
        assert_eq!(config.field(), "lastTrackingValue");
        assert!(!config.is_persistent());
        assert_eq!(config.persistent_id(), None);
    }

    #[test]
    fn explicit_values_pass_through() {
        let config = TailTrackingConfig::new(
            true,
            "ts",
            Some("ops".into()),
            Some("bookmarks".into()),
            Some("last".into()),
            Some("tailer-a".into()),
        );
        assert_eq!(config.increasing_field(), "ts");
        assert!(config.is_persistent());
        assert_eq!(config.db(), Some("ops"));
        assert_eq!(config.collection(), "bookmarks");
        assert_eq!(config.field(), "last");
        assert_eq!(config.persistent_id(), Some("tailer-a"));
    }

    #[test]
    fn empty_strings_are_not_defaulted() {
        let config =
            TailTrackingConfig::new(false, "", None, Some(String::new()), Some(String::new()), None);
        assert_eq!(config.increasing_field(), "");
        assert_eq!(config.collection(), "");
        assert_eq!(config.field(), "");
    }

    #[test]
    fn deserializing_applies_defaults_once() {
        let config: TailTrackingConfig =
            serde_json::from_str(r#"{"increasing_field": "seq", "persistent": true}"#)
                .expect("valid settings");
        assert_eq!(config.collection(), DEFAULT_COLLECTION);
        assert_eq!(config.field(), DEFAULT_FIELD);

        let text = serde_json::to_string(&config).expect("serialize");
        let back: TailTrackingConfig = serde_json::from_str(&text).expect("round trip");
        assert_eq!(back, config);
    }

    #[test]
    fn missing_increasing_field_is_rejected() {
        let result = serde_json::from_str::<TailTrackingConfig>(r#"{"persistent": true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn persistence_key_display() {
        let key = TailTrackingConfig::new(true, "seq", None, None, None, Some("a".into()))
            .persistence_key();
        assert_eq!(key.to_string(), "<default>.tailTrackingDefault[a].lastTrackingValue");

        let key = TailTrackingConfig::new(true, "seq", Some("db".into()), None, None, None)
            .persistence_key();
        assert_eq!(key.to_string(), "db.tailTrackingDefault.lastTrackingValue");
    }
}

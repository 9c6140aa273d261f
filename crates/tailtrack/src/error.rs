use thiserror::Error;

/// Errors raised while advancing, recovering or persisting a bookmark.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TrackingError {
    /// The document has no non-null value for the increasing field.
    #[error("document has no value for increasing field `{field}`")]
    MissingField { field: String },

    /// The new value cannot be ordered against the current bookmark.
    #[error("tracked value {attempted} cannot be ordered against {current}")]
    Incomparable { current: String, attempted: String },

    /// A store was asked to move a bookmark backwards.
    #[error("refusing to move bookmark {key} back from {current} to {attempted}")]
    Regression {
        key: String,
        current: String,
        attempted: String,
    },

    /// The persistence collaborator failed.
    #[error("position store failure: {0}")]
    Store(String),
}

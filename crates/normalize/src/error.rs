//! Error types produced by the normalize crate.
//!
//! The normalizer has a single externally observable failure mode: no
//! document. [`NormalizeError`] is the typed reason behind that outcome and is
//! returned by [`Normalizer::convert`](crate::Normalizer::convert) for callers
//! that want to branch on it. [`Normalizer::normalize`](crate::Normalizer::normalize)
//! collapses it into `None` plus one log record.
//!
//! # Failure Categories
//!
//! | Error | Category | Description |
//! |-------|----------|-------------|
//! | [`ParseFailure`](NormalizeError::ParseFailure) | `parse_failure` | Text is not valid JSON |
//! | [`NotAnObject`](NormalizeError::NotAnObject) | `parse_failure` | Text parsed, but not to a JSON object |
//! | [`CapabilityUnavailable`](NormalizeError::CapabilityUnavailable) | `capability_unavailable` | No object mapper in this process |
//! | [`TypeUnconvertible`](NormalizeError::TypeUnconvertible) | `type_unconvertible` | Mapper rejected the value |
use std::fmt;

use thiserror::Error;

/// Why an input did not produce a document.
///
/// # Examples
///
/// ```rust
/// use normalize::{FailureCategory, NormalizeError};
///
/// let err = NormalizeError::NotAnObject { kind: "array" };
/// assert_eq!(err.category(), FailureCategory::ParseFailure);
/// assert_eq!(err.to_string(), "json text parsed to array, expected an object");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NormalizeError {
    /// Text input is not valid JSON.
    ///
    /// Carries the parser message only. Positions are part of the message,
    /// so the log record is enough to locate the defect.
    #[error("json text could not be parsed: {0}")]
    ParseFailure(String),

    /// Text input is valid JSON but its root is not an object.
    #[error("json text parsed to {kind}, expected an object")]
    NotAnObject {
        /// JSON kind of the parsed root (`"array"`, `"string"`, ...).
        kind: &'static str,
    },

    /// Object input was given but no object mapper exists in this process.
    #[error("object mapping capability is not available in this process")]
    CapabilityUnavailable,

    /// The object mapper exists but rejected this value.
    #[error("value of type {type_name} cannot be mapped to a document: {reason}")]
    TypeUnconvertible {
        /// Runtime type name of the rejected value.
        type_name: String,
        /// Mapper-provided reason.
        reason: String,
    },
}

impl NormalizeError {
    /// Returns the cause category recorded in diagnostics.
    pub fn category(&self) -> FailureCategory {
        match self {
            NormalizeError::ParseFailure(_) | NormalizeError::NotAnObject { .. } => {
                FailureCategory::ParseFailure
            }
            NormalizeError::CapabilityUnavailable => FailureCategory::CapabilityUnavailable,
            NormalizeError::TypeUnconvertible { .. } => FailureCategory::TypeUnconvertible,
        }
    }

    /// Runtime type name of the offending value, for type-unconvertible failures.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            NormalizeError::TypeUnconvertible { type_name, .. } => Some(type_name),
            _ => None,
        }
    }
}

/// Coarse cause of a failed conversion, as it appears in log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCategory {
    ParseFailure,
    CapabilityUnavailable,
    TypeUnconvertible,
}

impl FailureCategory {
    /// Stable snake_case label used as the `cause` log field.
    pub fn as_str(self) -> &'static str {
        match self {
            FailureCategory::ParseFailure => "parse_failure",
            FailureCategory::CapabilityUnavailable => "capability_unavailable",
            FailureCategory::TypeUnconvertible => "type_unconvertible",
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by an [`ObjectMapper`](crate::ObjectMapper) implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MapperError {
    /// The value's `Serialize` implementation failed (custom errors, non-string map keys).
    #[error("serialization failed: {0}")]
    Serialize(String),

    /// The value serialized to something other than a key/value structure.
    #[error("value serialized to {kind}, expected a key/value structure")]
    NotAnObject {
        /// JSON kind the value serialized to.
        kind: &'static str,
    },
}

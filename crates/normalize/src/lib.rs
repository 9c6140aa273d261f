//! doctail document normalizer.
//!
//! Turns inbound items of unknown shape into canonical ordered-key
//! [`Document`]s for a tailing pipeline.
//!
//! ## What we accept
//!
//! - **Mappings** ([`SharedMap`]) - wrapped in place, never copied. The
//!   document and the caller's map stay aliases of each other.
//! - **Documents** - handed back as they are.
//! - **JSON text** - parsed; the root must be an object.
//! - **Anything `Serialize`** - converted through the optional
//!   [`ObjectMapper`] capability, if this process has one.
//!
//! ## Failure model
//!
//! [`Normalizer::normalize`] never errors and never panics on bad input. It
//! returns `None` and writes one `warn` record carrying a `cause` field
//! (`parse_failure`, `capability_unavailable` or `type_unconvertible`), plus
//! `type_name` for values the mapper rejected. One malformed item never stops
//! the stream around it. Use [`Normalizer::convert`] to get the typed
//! [`NormalizeError`] instead.
//!
//! ## Optional mapper
//!
//! The `object-mapper` feature (on by default) compiles in
//! [`JsonObjectMapper`]. The process-wide [`MapperCapability`] is detected
//! once and then only read; see the [`mapper`] module docs.
//!
//! ## Example
//!
//! ```
//! use normalize::{normalize, shared_map, Input};
//! use serde_json::{json, Map};
//!
//! let doc = normalize(Input::Text(r#"{"seq": 41, "body": "hi"}"#)).unwrap();
//! assert_eq!(doc.get("seq"), Some(json!(41)));
//!
//! let source = shared_map(Map::new());
//! let aliased = normalize(Input::Mapping(source.clone())).unwrap();
//! aliased.insert("seq", 42);
//! assert_eq!(source.read().unwrap().get("seq"), Some(&json!(42)));
//!
//! assert!(normalize(Input::Text("not json")).is_none());
//! ```

mod document;
mod error;
mod input;
pub mod mapper;
mod normalizer;

pub use crate::document::{shared_map, Document, SharedMap};
pub use crate::error::{FailureCategory, MapperError, NormalizeError};
pub use crate::input::{Input, MappableObject};
#[cfg(feature = "object-mapper")]
pub use crate::mapper::JsonObjectMapper;
pub use crate::mapper::{
    disable_object_mapper, install_object_mapper, object_mapper, MapperCapability, ObjectMapper,
};
pub use crate::normalizer::{normalize, report_failure, Normalizer};

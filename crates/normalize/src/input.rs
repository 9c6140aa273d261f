//! Input shapes accepted by the normalizer.
//!
//! Precedence is fixed by the variant order of [`Input`] and matched
//! explicitly in [`Normalizer::convert`](crate::Normalizer::convert):
//!
//! ```text
//! Mapping   -> zero-copy wrap, always succeeds
//! Document  -> returned as is
//! Text      -> JSON parse, object root required
//! Object    -> optional ObjectMapper capability
//! ```
use std::any;

use serde::Serialize;
use serde_json::Value;

use crate::document::{Document, SharedMap};

/// One inbound item of unknown shape.
#[derive(Clone)]
pub enum Input<'a> {
    /// Key/value pairs owned by the caller. The resulting document aliases them.
    Mapping(SharedMap),
    /// A value that is already canonical.
    Document(Document),
    /// JSON text.
    Text(&'a str),
    /// Any serializable value, mapped through the optional object mapper.
    Object(&'a dyn MappableObject),
}

impl<'a> Input<'a> {
    /// Borrows a serializable value as an object input.
    pub fn object<T: Serialize>(value: &'a T) -> Self {
        Input::Object(value)
    }

    /// Short label for the variant, used in log records.
    pub fn kind(&self) -> &'static str {
        match self {
            Input::Mapping(_) => "mapping",
            Input::Document(_) => "document",
            Input::Text(_) => "text",
            Input::Object(_) => "object",
        }
    }
}

impl From<SharedMap> for Input<'_> {
    fn from(map: SharedMap) -> Self {
        Input::Mapping(map)
    }
}

impl From<Document> for Input<'_> {
    fn from(doc: Document) -> Self {
        Input::Document(doc)
    }
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(text: &'a str) -> Self {
        Input::Text(text)
    }
}

impl<'a> From<&'a String> for Input<'a> {
    fn from(text: &'a String) -> Self {
        Input::Text(text.as_str())
    }
}

/// A value an [`ObjectMapper`](crate::ObjectMapper) can try to turn into a document.
///
/// Object safe so inputs of any type can travel through [`Input::Object`].
/// Every `Serialize` type implements it.
pub trait MappableObject {
    /// Runtime type name, reported when conversion fails.
    fn type_name(&self) -> &'static str;

    /// Serializes the value into a generic JSON tree.
    fn to_json(&self) -> Result<Value, serde_json::Error>;
}

impl<T: Serialize> MappableObject for T {
    fn type_name(&self) -> &'static str {
        any::type_name::<T>()
    }

    fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

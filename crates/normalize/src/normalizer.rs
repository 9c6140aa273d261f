//! Conversion of inbound items into canonical documents.
use std::sync::{Arc, OnceLock};

use serde_json::Value;
use tracing::warn;

use crate::document::Document;
use crate::error::NormalizeError;
use crate::input::{json_kind, Input, MappableObject};
use crate::mapper::{object_mapper, MapperCapability, ObjectMapper};

/// Converts inputs of variable shape into [`Document`]s.
///
/// Holds no per-call state, so one instance can serve any number of threads.
/// The optional object mapper is fixed at construction.
///
/// # Examples
///
/// ```rust
/// use normalize::{Input, MapperCapability, Normalizer};
///
/// let normalizer = Normalizer::with_capability(MapperCapability::Unavailable);
///
/// let doc = normalizer.normalize(Input::Text(r#"{"seq": 1}"#)).unwrap();
/// assert_eq!(doc.get("seq"), Some(serde_json::json!(1)));
///
/// assert!(normalizer.normalize(Input::Text("[1, 2, 3]")).is_none());
/// assert!(normalizer.normalize(Input::object(&("a", 1))).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Normalizer {
    capability: MapperCapability,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    /// Normalizer bound to the process-wide mapper capability.
    pub fn new() -> Self {
        Self::with_capability(object_mapper().clone())
    }

    pub fn with_capability(capability: MapperCapability) -> Self {
        Self { capability }
    }

    pub fn with_mapper(mapper: Arc<dyn ObjectMapper>) -> Self {
        Self::with_capability(MapperCapability::Available(mapper))
    }

    pub fn capability(&self) -> &MapperCapability {
        &self.capability
    }

    /// Converts `input`, reporting why no document was produced.
    ///
    /// Nothing is logged here; [`Normalizer::normalize`] is the logging entry point.
    pub fn convert(&self, input: Input<'_>) -> Result<Document, NormalizeError> {
        match input {
            Input::Mapping(map) => Ok(Document::from_shared(map)),
            Input::Document(doc) => Ok(doc),
            Input::Text(text) => parse_document(text),
            Input::Object(value) => self.map_object(value),
        }
    }

    /// Converts `input`, or logs one warning and returns `None`.
    ///
    /// A `None` means the item should be skipped; the cause is only visible in
    /// the log record.
    pub fn normalize(&self, input: Input<'_>) -> Option<Document> {
        let kind = input.kind();
        match self.convert(input) {
            Ok(doc) => Some(doc),
            Err(err) => {
                report_failure(kind, &err);
                None
            }
        }
    }

    fn map_object(&self, value: &dyn MappableObject) -> Result<Document, NormalizeError> {
        let Some(mapper) = self.capability.mapper() else {
            return Err(NormalizeError::CapabilityUnavailable);
        };

        mapper
            .to_mapping(value)
            .map(Document::from_map)
            .map_err(|err| NormalizeError::TypeUnconvertible {
                type_name: value.type_name().to_string(),
                reason: err.to_string(),
            })
    }
}

/// Normalizes `input` with the process-wide normalizer.
pub fn normalize(input: Input<'_>) -> Option<Document> {
    static NORMALIZER: OnceLock<Normalizer> = OnceLock::new();
    NORMALIZER.get_or_init(Normalizer::new).normalize(input)
}

fn parse_document(text: &str) -> Result<Document, NormalizeError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(Document::from_map(map)),
        Ok(other) => Err(NormalizeError::NotAnObject {
            kind: json_kind(&other),
        }),
        Err(err) => Err(NormalizeError::ParseFailure(err.to_string())),
    }
}

/// Writes the diagnostic for a failed conversion of an `input`-kind item.
///
/// [`Normalizer::normalize`] calls this once per failure; callers driving
/// [`Normalizer::convert`] themselves use it to keep the same log shape.
pub fn report_failure(input: &'static str, err: &NormalizeError) {
    let cause = err.category().as_str();
    match err.type_name() {
        Some(type_name) => warn!(
            cause,
            input,
            type_name,
            error = %err,
            "document_conversion_failed"
        ),
        None => warn!(cause, input, error = %err, "document_conversion_failed"),
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;
    use serde_json::{json, Map};

    use super::*;
    use crate::document::shared_map;
    use crate::error::{FailureCategory, MapperError};

    struct RejectAll;

    impl ObjectMapper for RejectAll {
        fn to_mapping(
            &self,
            _value: &dyn MappableObject,
        ) -> Result<Map<String, Value>, MapperError> {
            Err(MapperError::Serialize("rejected".into()))
        }

        fn name(&self) -> &'static str {
            "reject-all"
        }
    }

    #[derive(Serialize)]
    struct Plain {
        a: i32,
        b: &'static str,
    }

    fn unavailable() -> Normalizer {
        Normalizer::with_capability(MapperCapability::Unavailable)
    }

    #[test]
    fn mapping_is_wrapped_without_copy() {
        let source = shared_map(Map::new());
        let doc = unavailable()
            .convert(Input::Mapping(source.clone()))
            .expect("mappings always convert");

        source
            .write()
            .expect("lock")
            .insert("late".into(), json!(1));
        assert_eq!(doc.get("late"), Some(json!(1)));

        doc.insert("later", 2);
        assert_eq!(source.read().expect("lock").get("later"), Some(&json!(2)));
    }

    #[test]
    fn documents_pass_through_unchanged() {
        let doc = Document::from_map(Map::new());
        let out = unavailable()
            .convert(Input::Document(doc.clone()))
            .expect("documents always convert");
        assert!(out.ptr_eq(&doc));
    }

    #[test]
    fn text_must_be_a_json_object() {
        let normalizer = unavailable();
        let doc = normalizer
            .convert(Input::Text(r#"{"a": 1, "nested": {"b": [true, null]}}"#))
            .expect("object text converts");
        assert_eq!(doc.to_value(), json!({"a": 1, "nested": {"b": [true, null]}}));

        assert_eq!(
            normalizer.convert(Input::Text("[1,2,3]")),
            Err(NormalizeError::NotAnObject { kind: "array" })
        );
        for bad in ["not json", "", "{\"a\":"] {
            let err = normalizer.convert(Input::Text(bad)).expect_err("malformed");
            assert_eq!(err.category(), FailureCategory::ParseFailure);
        }
    }

    #[test]
    fn objects_need_the_capability() {
        let value = Plain { a: 1, b: "x" };
        assert_eq!(
            unavailable().convert(Input::object(&value)),
            Err(NormalizeError::CapabilityUnavailable)
        );
    }

    #[test]
    fn mapper_rejection_reports_the_type_name() {
        let value = Plain { a: 1, b: "x" };
        let err = Normalizer::with_mapper(Arc::new(RejectAll))
            .convert(Input::object(&value))
            .expect_err("mapper rejects");

        assert_eq!(err.category(), FailureCategory::TypeUnconvertible);
        assert!(err.type_name().is_some_and(|name| name.ends_with("Plain")));
    }

    #[cfg(feature = "object-mapper")]
    #[test]
    fn plain_values_map_to_documents() {
        let value = Plain { a: 1, b: "x" };
        let doc = Normalizer::with_capability(MapperCapability::detect())
            .normalize(Input::object(&value))
            .expect("plain struct maps");
        assert_eq!(doc.to_value(), json!({"a": 1, "b": "x"}));
    }
}

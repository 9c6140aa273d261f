mod common;

use std::sync::Arc;

use common::capture_warnings;
use normalize::{
    Input, MappableObject, MapperCapability, MapperError, Normalizer, ObjectMapper,
};
use serde::Serialize;
use serde_json::{json, Map, Value};

#[derive(Serialize)]
struct Reading {
    sensor: &'static str,
    value: f64,
}

struct Refuse;

impl ObjectMapper for Refuse {
    fn to_mapping(&self, _value: &dyn MappableObject) -> Result<Map<String, Value>, MapperError> {
        Err(MapperError::Serialize("cycle detected".into()))
    }

    fn name(&self) -> &'static str {
        "refuse"
    }
}

#[test]
fn malformed_text_logs_exactly_one_parse_failure() {
    let normalizer = Normalizer::with_capability(MapperCapability::Unavailable);

    for text in ["not json", "[1,2,3]", "", "42", "\"str\""] {
        let (doc, events) = capture_warnings(|| normalizer.normalize(Input::Text(text)));
        assert!(doc.is_none(), "{text:?} must not produce a document");
        assert_eq!(events.len(), 1, "{text:?} must log once");
        assert_eq!(events[0].field("cause"), Some("parse_failure"));
        assert_eq!(events[0].field("input"), Some("text"));
        assert!(events[0].field("type_name").is_none());
    }
}

#[test]
fn valid_text_logs_nothing() {
    let normalizer = Normalizer::with_capability(MapperCapability::Unavailable);
    let (doc, events) =
        capture_warnings(|| normalizer.normalize(Input::Text(r#"{"ts": 10, "tags": ["a"]}"#)));

    let doc = doc.expect("object text converts");
    assert_eq!(doc.to_value(), json!({"ts": 10, "tags": ["a"]}));
    assert!(events.is_empty());
}

#[test]
fn unavailable_capability_logs_on_every_call() {
    let normalizer = Normalizer::with_capability(MapperCapability::Unavailable);
    let reading = Reading {
        sensor: "t1",
        value: 1.5,
    };

    let (results, events) = capture_warnings(|| {
        (0..3)
            .map(|_| normalizer.normalize(Input::object(&reading)))
            .collect::<Vec<_>>()
    });

    assert!(results.iter().all(Option::is_none));
    assert_eq!(events.len(), 3);
    for event in &events {
        assert_eq!(event.field("cause"), Some("capability_unavailable"));
        assert_eq!(event.field("input"), Some("object"));
    }
}

#[test]
fn rejected_object_logs_its_type_name() {
    let normalizer = Normalizer::with_mapper(Arc::new(Refuse));
    let reading = Reading {
        sensor: "t2",
        value: 0.0,
    };

    let (doc, events) = capture_warnings(|| normalizer.normalize(Input::object(&reading)));

    assert!(doc.is_none());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].field("cause"), Some("type_unconvertible"));
    let type_name = events[0].field("type_name").expect("type name recorded");
    assert!(type_name.ends_with("Reading"), "got {type_name}");
}

#[test]
fn mappings_and_documents_never_log() {
    let normalizer = Normalizer::with_capability(MapperCapability::Unavailable);
    let source = normalize::shared_map(Map::new());

    let (docs, events) = capture_warnings(|| {
        let first = normalizer.normalize(Input::Mapping(source.clone()));
        let second = first
            .clone()
            .and_then(|doc| normalizer.normalize(Input::Document(doc)));
        (first, second)
    });

    let (first, second) = docs;
    assert!(first.is_some() && second.is_some());
    assert!(events.is_empty());
}

#[cfg(feature = "object-mapper")]
#[test]
fn scalar_objects_are_unconvertible() {
    let normalizer = Normalizer::with_capability(MapperCapability::detect());
    let (doc, events) = capture_warnings(|| normalizer.normalize(Input::object(&7u64)));

    assert!(doc.is_none());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].field("cause"), Some("type_unconvertible"));
    assert_eq!(events[0].field("type_name"), Some("u64"));
}

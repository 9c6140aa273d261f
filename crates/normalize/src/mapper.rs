//! Optional structured-object mapping capability.
//!
//! Object inputs need something that can turn an arbitrary value into a
//! key/value structure. That capability is optional: it is compiled in with
//! the `object-mapper` cargo feature, and a process may also install its own
//! [`ObjectMapper`] or disable mapping outright before first use.
//!
//! The process-wide [`MapperCapability`] is resolved exactly once. The first
//! call to [`object_mapper`] (directly or through
//! [`Normalizer::new`](crate::Normalizer::new)) runs [`MapperCapability::detect`]
//! unless [`install_object_mapper`] or [`disable_object_mapper`] ran earlier.
//! After that the capability is read-only and lives until the process exits.
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::MapperError;
use crate::input::MappableObject;

/// Converts a structured value into document entries.
///
/// Implementations are shared across threads and must not keep per-call state.
pub trait ObjectMapper: Send + Sync {
    fn to_mapping(&self, value: &dyn MappableObject) -> Result<Map<String, Value>, MapperError>;

    /// Name reported in diagnostics.
    fn name(&self) -> &'static str;
}

/// Mapper backed by `serde_json`'s data model.
///
/// Structs and maps with string keys become documents; scalars, sequences and
/// values whose `Serialize` implementation fails are rejected.
#[cfg(feature = "object-mapper")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonObjectMapper;

#[cfg(feature = "object-mapper")]
impl ObjectMapper for JsonObjectMapper {
    fn to_mapping(&self, value: &dyn MappableObject) -> Result<Map<String, Value>, MapperError> {
        match value
            .to_json()
            .map_err(|err| MapperError::Serialize(err.to_string()))?
        {
            Value::Object(map) => Ok(map),
            other => Err(MapperError::NotAnObject {
                kind: crate::input::json_kind(&other),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "serde_json"
    }
}

/// Whether object inputs can be converted in this process.
#[derive(Clone)]
pub enum MapperCapability {
    Available(Arc<dyn ObjectMapper>),
    Unavailable,
}

impl MapperCapability {
    /// Resolves the capability compiled into this build.
    pub fn detect() -> Self {
        #[cfg(feature = "object-mapper")]
        {
            MapperCapability::Available(Arc::new(JsonObjectMapper))
        }
        #[cfg(not(feature = "object-mapper"))]
        {
            MapperCapability::Unavailable
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, MapperCapability::Available(_))
    }

    pub fn mapper(&self) -> Option<&Arc<dyn ObjectMapper>> {
        match self {
            MapperCapability::Available(mapper) => Some(mapper),
            MapperCapability::Unavailable => None,
        }
    }
}

impl fmt::Debug for MapperCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapperCapability::Available(mapper) => {
                f.debug_tuple("Available").field(&mapper.name()).finish()
            }
            MapperCapability::Unavailable => f.write_str("Unavailable"),
        }
    }
}

fn capability_cell() -> &'static OnceLock<MapperCapability> {
    static CAPABILITY: OnceLock<MapperCapability> = OnceLock::new();
    &CAPABILITY
}

/// The process-wide capability, detecting it on first use.
pub fn object_mapper() -> &'static MapperCapability {
    capability_cell().get_or_init(|| {
        let capability = MapperCapability::detect();
        debug!(capability = ?capability, "object_mapper_detected");
        capability
    })
}

/// Installs `mapper` as the process-wide capability.
///
/// Fails with the already-resolved capability if anything used or configured
/// it first.
pub fn install_object_mapper(
    mapper: Arc<dyn ObjectMapper>,
) -> Result<(), &'static MapperCapability> {
    set_capability(MapperCapability::Available(mapper))
}

/// Marks object mapping as unavailable for the rest of the process.
pub fn disable_object_mapper() -> Result<(), &'static MapperCapability> {
    set_capability(MapperCapability::Unavailable)
}

fn set_capability(capability: MapperCapability) -> Result<(), &'static MapperCapability> {
    let cell = capability_cell();
    match cell.set(capability) {
        Ok(()) => {
            debug!(capability = ?object_mapper(), "object_mapper_configured");
            Ok(())
        }
        Err(_) => Err(object_mapper()),
    }
}

#[cfg(all(test, feature = "object-mapper"))]
mod tests {
    use std::collections::BTreeMap;

    use serde::Serialize;
    use serde_json::json;

    use super::*;

    #[derive(Serialize)]
    struct Order {
        id: u32,
        sku: &'static str,
    }

    #[test]
    fn detect_finds_the_json_mapper() {
        let capability = MapperCapability::detect();
        assert!(capability.is_available());
        assert_eq!(capability.mapper().map(|m| m.name()), Some("serde_json"));
    }

    #[test]
    fn json_mapper_keeps_field_order() {
        let order = Order { id: 4, sku: "A-1" };
        let map = JsonObjectMapper.to_mapping(&order).expect("struct maps");
        assert_eq!(Value::Object(map), json!({"id": 4, "sku": "A-1"}));
        let keys: Vec<_> = JsonObjectMapper
            .to_mapping(&order)
            .expect("struct maps")
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, vec!["id", "sku"]);
    }

    #[test]
    fn json_mapper_rejects_scalars_and_sequences() {
        assert_eq!(
            JsonObjectMapper.to_mapping(&42u32),
            Err(MapperError::NotAnObject { kind: "number" })
        );
        assert_eq!(
            JsonObjectMapper.to_mapping(&vec![1, 2]),
            Err(MapperError::NotAnObject { kind: "array" })
        );
    }

    #[test]
    fn json_mapper_rejects_non_string_keys() {
        let mut keyed = BTreeMap::new();
        keyed.insert((1, 2), "pair");
        assert!(matches!(
            JsonObjectMapper.to_mapping(&keyed),
            Err(MapperError::Serialize(_))
        ));
    }
}

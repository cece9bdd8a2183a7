use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::domain::value_objects::ConnectionKey;

/// A controller payload that is not a map of connection key to record.
///
/// This is a caller contract violation, distinct from a controller that
/// could not be reached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadShapeError {
    #[error("controller payload must be an object keyed by connection key, got {0}")]
    NotAMap(&'static str),

    #[error("controller record for '{key}' must be an object, got {kind}")]
    RecordNotAnObject { key: String, kind: &'static str },
}

/// Opaque per-connection controller payloads, keyed by [`ConnectionKey`].
///
/// The shape of each record varies with the query that produced it; the
/// merge engine reads it only through the extraction rule table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ApiDataMap(BTreeMap<ConnectionKey, Map<String, Value>>);

impl ApiDataMap {
    /// Validate a raw JSON document as a payload map.
    ///
    /// The top level must be an object keyed by connection key and every
    /// value must itself be an object. Anything else fails instead of
    /// yielding an empty map.
    pub fn from_value(value: Value) -> Result<Self, PayloadShapeError> {
        let top = match value {
            Value::Object(map) => map,
            other => return Err(PayloadShapeError::NotAMap(json_kind(&other))),
        };

        let mut records = BTreeMap::new();
        for (key, record) in top {
            match record {
                Value::Object(obj) => {
                    records.insert(ConnectionKey(key), obj);
                }
                other => {
                    return Err(PayloadShapeError::RecordNotAnObject {
                        kind: json_kind(&other),
                        key,
                    })
                }
            }
        }
        Ok(Self(records))
    }

    pub fn contains(&self, key: &ConnectionKey) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ConnectionKey, &Map<String, Value>)> {
        self.0.iter()
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

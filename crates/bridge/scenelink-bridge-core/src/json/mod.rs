use serde_json::{json, Value as JsonValue};
use thiserror::Error;

use crate::{AccessorPath, PathError, Value};

/// Errors produced while reading shorthand value or scene JSON.
#[derive(Debug, Error)]
pub enum JsonError {
    #[error("value json parse error: {0}")]
    Value(#[from] serde_json::Error),
    #[error("invalid path '{path}': {source}")]
    Path {
        path: String,
        #[source]
        source: PathError,
    },
    #[error("scene json: {0}")]
    Scene(String),
}

/// Normalize shorthand `Value` JSON into the canonical `{ "type": ..., "data": ... }`
/// representation understood by the serde derives on [`Value`]. Accepted
/// shorthands:
/// - `null`, `true`, `3`, `2.5`, `"text"`
/// - homogeneous arrays of booleans, integers or numbers (mixed numbers become floats)
/// - `{ "enum": "TOKEN" }`, `{ "enum_set": ["A", "B"] }`, `{ "object": "path" }`
///
/// Objects already in canonical form pass through unchanged.
pub fn normalize_value_json(value: JsonValue) -> JsonValue {
    match value {
        JsonValue::Null => json!({ "type": "none" }),
        JsonValue::Bool(b) => json!({ "type": "bool", "data": b }),
        JsonValue::Number(n) => {
            if n.is_i64() || n.is_u64() {
                json!({ "type": "int", "data": n })
            } else {
                json!({ "type": "float", "data": n })
            }
        }
        JsonValue::String(s) => json!({ "type": "text", "data": s }),
        JsonValue::Array(arr) => {
            if arr.iter().all(|x| x.is_boolean()) && !arr.is_empty() {
                json!({ "type": "bool_array", "data": arr })
            } else if arr.iter().all(|x| x.is_i64() || x.is_u64()) {
                json!({ "type": "int_array", "data": arr })
            } else if arr.iter().all(|x| x.is_number()) {
                json!({ "type": "float_array", "data": arr })
            } else {
                JsonValue::Array(arr)
            }
        }
        JsonValue::Object(obj) => {
            if obj.contains_key("type") {
                return JsonValue::Object(obj);
            }
            if let Some(token) = obj.get("enum").and_then(|x| x.as_str()) {
                return json!({ "type": "enum", "data": token });
            }
            if let Some(tokens) = obj.get("enum_set").and_then(|x| x.as_array()) {
                return json!({ "type": "enum_set", "data": tokens });
            }
            if let Some(path) = obj.get("object").and_then(|x| x.as_str()) {
                return json!({ "type": "object", "data": path });
            }
            JsonValue::Object(obj)
        }
    }
}

/// Normalize shorthand JSON then deserialize it into a [`Value`]. Enum-set
/// tokens are re-sorted so the result matches [`Value::enum_set`].
pub fn parse_value(value: JsonValue) -> Result<Value, JsonError> {
    let normalized = normalize_value_json(value);
    let parsed: Value = serde_json::from_value(normalized)?;
    Ok(match parsed {
        Value::EnumSet(tokens) => Value::enum_set(tokens),
        other => other,
    })
}

/// Parse a path string, attaching the offending text to the error.
pub fn parse_path(path: &str) -> Result<AccessorPath, JsonError> {
    AccessorPath::parse(path).map_err(|source| JsonError::Path {
        path: path.to_string(),
        source,
    })
}

/// A preloaded remote state: attribute values and collection lengths keyed
/// by accessor path, ordered by path text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub values: Vec<(AccessorPath, Value)>,
    pub lengths: Vec<(AccessorPath, usize)>,
}

/// Parse a scene document:
/// `{ "values": { "<path>": <shorthand value> }, "lengths": { "<path>": n } }`.
pub fn parse_scene(text: &str) -> Result<Scene, JsonError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let root = root
        .as_object()
        .ok_or_else(|| JsonError::Scene("root must be an object".to_string()))?;

    let mut scene = Scene::default();
    if let Some(values) = root.get("values") {
        let values = values
            .as_object()
            .ok_or_else(|| JsonError::Scene("'values' must be an object".to_string()))?;
        for (path, value) in values {
            scene
                .values
                .push((parse_path(path)?, parse_value(value.clone())?));
        }
    }
    if let Some(lengths) = root.get("lengths") {
        let lengths = lengths
            .as_object()
            .ok_or_else(|| JsonError::Scene("'lengths' must be an object".to_string()))?;
        for (path, len) in lengths {
            let len = len
                .as_u64()
                .ok_or_else(|| JsonError::Scene(format!("length of '{path}' must be a count")))?;
            let len = usize::try_from(len).map_err(|_| {
                JsonError::Scene(format!("length of '{path}' does not fit in usize"))
            })?;
            scene.lengths.push((parse_path(path)?, len));
        }
    }
    Ok(scene)
}

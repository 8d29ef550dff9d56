//! Line-level parsing and projection onto the fixed field sets.

use crate::schema::ContentType;
use serde::de::Error as _;
use serde_json::{Map, Value};

/// One record narrowed to its content type's fields, in table order.
/// Absent source keys are `Value::Null`.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectedRecord {
    values: Vec<Value>,
}

impl ProjectedRecord {
    /// Narrow a parsed JSON object. Keys outside the field set are dropped.
    pub fn project(mut obj: Map<String, Value>, kind: ContentType) -> Self {
        let values = kind
            .fields()
            .iter()
            .map(|f| obj.remove(f.name).unwrap_or(Value::Null))
            .collect();
        Self { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Value of a projected field by name, or `None` if `name` is not one of
    /// `kind`'s fields.
    pub fn get(&self, kind: ContentType, name: &str) -> Option<&Value> {
        let idx = kind.fields().iter().position(|f| f.name == name)?;
        self.values.get(idx)
    }

    /// The raw `id` (always the first projected field).
    pub fn id(&self) -> &Value {
        &self.values[0]
    }
}

/// Parse one decoded line as a JSON object and project it.
/// Any non-object JSON (array, string, number...) is rejected like invalid JSON.
pub fn parse_line(line: &str, kind: ContentType) -> Result<ProjectedRecord, serde_json::Error> {
    match serde_json::from_str::<Value>(line)? {
        Value::Object(obj) => Ok(ProjectedRecord::project(obj, kind)),
        other => Err(serde_json::Error::custom(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
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

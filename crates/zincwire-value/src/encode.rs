use serde_json::{json, Map, Number};

use crate::error::{CodecError, Result};
use crate::value::Value;

/// An extension converter tried before the built-in encoding rules.
///
/// Returning `None` falls through to the next converter or the defaults.
pub type Extension = fn(&Value) -> Option<serde_json::Value>;

/// Encodes domain values into the tagged JSON wire representation.
///
/// Encoding is a pure function of the input. Extension converters let
/// callers override the representation of selected values (the hook that
/// array-library bridges plug into) without touching the core rules.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    extensions: Vec<Extension>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a converter tried before the built-in rules.
    pub fn with_extension(mut self, extension: Extension) -> Self {
        self.extensions.push(extension);
        self
    }

    /// Encode a value.
    ///
    /// Enum references become `{"e": name}`, anonymous members
    /// `{"e": enumName, "i": index}`, constructor members
    /// `{"c": ctor, "e": argument}` and sets `{"set": [...]}`. Sets are
    /// emitted element by element; `[lo, hi]` range compression is a
    /// decode-side convenience, not a round-trip guarantee.
    pub fn encode(&self, value: &Value) -> Result<serde_json::Value> {
        for extension in &self.extensions {
            if let Some(encoded) = extension(value) {
                return Ok(encoded);
            }
        }

        match value {
            Value::Absent => Ok(serde_json::Value::Null),
            Value::Bool(b) => Ok(json!(b)),
            Value::Int(i) => Ok(json!(i)),
            Value::Float(x) => Number::from_f64(*x)
                .map(serde_json::Value::Number)
                .ok_or_else(|| CodecError::UnsupportedType(format!("non-finite float {x}"))),
            Value::String(s) => Ok(json!(s)),
            Value::Enum(member) => Ok(json!({ "e": member.name() })),
            Value::AnonEnum(anon) => Ok(json!({ "e": &anon.enum_name, "i": anon.index })),
            Value::ConstrEnum(constr) => Ok(json!({
                "c": &constr.constructor,
                "e": self.encode(&constr.argument)?,
            })),
            Value::Set(set) => {
                let items = set
                    .iter()
                    .map(|item| self.encode(item))
                    .collect::<Result<Vec<_>>>()?;
                Ok(json!({ "set": items }))
            }
            Value::Array(items) => {
                let items = items
                    .iter()
                    .map(|item| self.encode(item))
                    .collect::<Result<Vec<_>>>()?;
                Ok(serde_json::Value::Array(items))
            }
            Value::Record(fields) => {
                let mut map = Map::with_capacity(fields.len());
                for (key, field) in fields {
                    map.insert(key.clone(), self.encode(field)?);
                }
                Ok(serde_json::Value::Object(map))
            }
        }
    }
}

/// Encode with the default rules and no extensions.
pub fn to_json(value: &Value) -> Result<serde_json::Value> {
    Encoder::new().encode(value)
}

use std::collections::BTreeMap;

use serde_json::Map;

use crate::enums::{AnonEnum, ConstrEnum};
use crate::registry::EnumRegistry;
use crate::value::{SetValue, Value};

/// Decode a parsed JSON tree into a domain [`Value`].
///
/// Applied bottom-up: every object node is matched against the reserved
/// tag shapes (`{"set"}`, `{"e"}`, `{"e","c"}`, `{"e","i"}`) by exact
/// key-set cardinality; anything else passes through structurally. Enum
/// names resolve through the caller's registry, falling back to the raw
/// name string. Never fails — unrecognized shapes stay opaque records.
pub fn from_json(json: &serde_json::Value, registry: &EnumRegistry) -> Value {
    match json {
        serde_json::Value::Null => Value::Absent,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                // u64 beyond i64::MAX or a float
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => {
            Value::Array(items.iter().map(|item| from_json(item, registry)).collect())
        }
        serde_json::Value::Object(map) => decode_object(map, registry),
    }
}

fn decode_object(map: &Map<String, serde_json::Value>, registry: &EnumRegistry) -> Value {
    if map.len() == 1 {
        if let Some(serde_json::Value::Array(items)) = map.get("set") {
            return decode_set(items, registry);
        }
        if let Some(serde_json::Value::String(name)) = map.get("e") {
            return match registry.get(name) {
                Some(member) => Value::Enum(member.clone()),
                None => Value::String(name.clone()),
            };
        }
    } else if map.len() == 2 {
        if let (Some(serde_json::Value::String(ctor)), Some(argument)) =
            (map.get("c"), map.get("e"))
        {
            return Value::ConstrEnum(ConstrEnum::new(ctor, from_json(argument, registry)));
        }
        if let (Some(serde_json::Value::String(name)), Some(index)) = (map.get("e"), map.get("i"))
        {
            if let Some(index) = index.as_u64() {
                return Value::AnonEnum(AnonEnum::new(name, index));
            }
        }
    }

    // A record/tuple payload; a single field literally named "e" is
    // indistinguishable from an enum tag and was handled above (known
    // lossy ambiguity of the wire format).
    Value::Record(
        map.iter()
            .map(|(key, field)| (key.clone(), from_json(field, registry)))
            .collect::<BTreeMap<_, _>>(),
    )
}

/// Expand a `{"set": [...]}` payload into a single unordered set.
///
/// Two-element integer arrays are inclusive `[lo, hi]` range runs and
/// contribute every integer in between; all other elements decode
/// recursively and join the same set.
fn decode_set(items: &[serde_json::Value], registry: &EnumRegistry) -> Value {
    let mut set = SetValue::new();
    for item in items {
        match item {
            serde_json::Value::Array(pair) if pair.len() == 2 => {
                match (pair[0].as_i64(), pair[1].as_i64()) {
                    (Some(lo), Some(hi)) => {
                        for i in lo..=hi {
                            set.insert(Value::Int(i));
                        }
                    }
                    _ => {
                        set.insert(from_json(item, registry));
                    }
                }
            }
            _ => {
                set.insert(from_json(item, registry));
            }
        }
    }
    Value::Set(set)
}

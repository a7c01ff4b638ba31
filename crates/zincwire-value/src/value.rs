use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;

use crate::enums::{AnonEnum, ConstrEnum, EnumMember};

/// A decoded solver value.
///
/// This is the domain-side counterpart of the tagged JSON wire shapes:
/// enum references resolve to [`EnumMember`] (or stay a plain `String`
/// when the name is not registered), `{"set": ...}` objects become
/// [`SetValue`], and untagged objects pass through as `Record`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON `null`; the absent value of an optional variable.
    Absent,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Enum(EnumMember),
    AnonEnum(AnonEnum),
    ConstrEnum(ConstrEnum),
    Set(SetValue),
    Array(Vec<Value>),
    Record(BTreeMap<String, Value>),
}

impl Value {
    /// Field access for `Record` values; `None` for every other variant.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Record(fields) => fields.get(key),
            _ => None,
        }
    }

    /// Index access for `Array` values; `None` for every other variant.
    pub fn at(&self, index: usize) -> Option<&Value> {
        match self {
            Value::Array(items) => items.get(index),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => f.write_str("<>"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Enum(m) => write!(f, "{m}"),
            Value::AnonEnum(a) => write!(f, "{a}"),
            Value::ConstrEnum(c) => write!(f, "{c}"),
            Value::Set(set) => {
                f.write_str("{")?;
                for (i, item) in set.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("}")
            }
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Record(fields) => {
                f.write_str("(")?;
                for (i, (key, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<EnumMember> for Value {
    fn from(m: EnumMember) -> Self {
        Value::Enum(m)
    }
}

impl From<AnonEnum> for Value {
    fn from(a: AnonEnum) -> Self {
        Value::AnonEnum(a)
    }
}

impl From<ConstrEnum> for Value {
    fn from(c: ConstrEnum) -> Self {
        Value::ConstrEnum(c)
    }
}

impl From<SetValue> for Value {
    fn from(s: SetValue) -> Self {
        Value::Set(s)
    }
}

/// Vectors (and, by nesting, matrices) of convertible scalars flatten into
/// plain nested arrays. This is the bridge for numeric-array interop.
impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<RangeInclusive<i64>> for Value {
    fn from(range: RangeInclusive<i64>) -> Self {
        Value::Set(range.map(Value::Int).collect())
    }
}

/// An unordered, duplicate-free collection of values.
///
/// Backed by a `Vec` with insert-time deduplication so that elements only
/// need `PartialEq` (floats and compound values included). Equality is
/// order-insensitive. Lookup is linear, which is fine at solution sizes.
#[derive(Debug, Clone, Default)]
pub struct SetValue {
    items: Vec<Value>,
}

impl SetValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value; returns `false` if it was already present.
    pub fn insert(&mut self, value: Value) -> bool {
        if self.contains(&value) {
            false
        } else {
            self.items.push(value);
            true
        }
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.items.iter().any(|item| item == value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }
}

impl PartialEq for SetValue {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.items.iter().all(|item| other.contains(item))
    }
}

impl FromIterator<Value> for SetValue {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl<'a> IntoIterator for &'a SetValue {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for SetValue {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

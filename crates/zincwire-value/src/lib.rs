//! Typed constraint-solver value model with a tagged JSON codec.
//!
//! Solver drivers exchange richly-typed values (enumerated types,
//! constructor and anonymous enum members, sets with range-compressed
//! encoding, tuples, records) over plain JSON. This crate provides the
//! domain value tree and the bidirectional mapping onto JSON using a
//! small set of reserved tag keys:
//!
//! | Shape                      | Meaning                |
//! |----------------------------|------------------------|
//! | `{"e": name}`              | enum reference         |
//! | `{"e": name, "c": ctor}`   | constructor-enum value |
//! | `{"e": name, "i": index}`  | anonymous-enum value   |
//! | `{"set": [elem, ...]}`     | set (ranges as `[lo,hi]` pairs) |
//!
//! Objects matching none of the tag shapes pass through unchanged, which
//! keeps untagged record and tuple payloads forward compatible.

pub mod decode;
pub mod encode;
pub mod enums;
pub mod error;
pub mod registry;
pub mod value;

pub use decode::from_json;
pub use encode::{to_json, Encoder, Extension};
pub use enums::{AnonEnum, ConstrEnum, EnumMember, EnumType};
pub use error::{CodecError, Result};
pub use registry::EnumRegistry;
pub use value::{SetValue, Value};

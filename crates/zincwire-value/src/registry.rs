use std::collections::HashMap;
use std::sync::Arc;

use crate::enums::{EnumMember, EnumType};

/// Caller-owned lookup from enum-member name to its [`EnumMember`].
///
/// The decoder consults the registry for every `{"e": name}` tag and falls
/// back to the raw name string for unregistered members. The registry is
/// read-only during a single decode call, but callers may add entries
/// between calls — decoding of message N may depend on types discovered
/// while processing message N-1.
#[derive(Debug, Clone, Default)]
pub struct EnumRegistry {
    members: HashMap<String, EnumMember>,
}

impl EnumRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every declared member of an enumerated type.
    pub fn register(&mut self, ty: &Arc<EnumType>) {
        for (ordinal, name) in ty.members().iter().enumerate() {
            if let Some(member) = ty.member_at(ordinal) {
                self.members.insert(name.clone(), member);
            }
        }
    }

    /// Bind a single member name, replacing any previous binding.
    pub fn insert(&mut self, name: impl Into<String>, member: EnumMember) {
        self.members.insert(name.into(), member);
    }

    /// Decode-time lookup.
    pub fn get(&self, name: &str) -> Option<&EnumMember> {
        self.members.get(name)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

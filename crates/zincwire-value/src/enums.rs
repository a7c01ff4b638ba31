use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// A closed, ordered enumerated type declared by the solver model.
///
/// Member identity is the declared name; member ordering is declaration
/// order. The type is shared via `Arc` so that every [`EnumMember`]
/// carries a cheap handle to its declaring type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumType {
    name: String,
    members: Vec<String>,
}

impl EnumType {
    /// Declare an enumerated type with its ordered member names.
    pub fn new(name: impl Into<String>, members: impl IntoIterator<Item = impl Into<String>>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        })
    }

    /// The type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared member names, in order.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Look up a member by name.
    pub fn member(self: &Arc<Self>, name: &str) -> Option<EnumMember> {
        let ordinal = self.members.iter().position(|m| m == name)?;
        Some(EnumMember {
            ty: Arc::clone(self),
            ordinal,
        })
    }

    /// The member at a zero-based declaration position.
    pub fn member_at(self: &Arc<Self>, ordinal: usize) -> Option<EnumMember> {
        if ordinal < self.members.len() {
            Some(EnumMember {
                ty: Arc::clone(self),
                ordinal,
            })
        } else {
            None
        }
    }
}

/// A named member of an [`EnumType`].
///
/// Equality compares the declaring type and the declaration position.
/// Members of the same type order by declaration position; members of
/// different types are incomparable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumMember {
    ty: Arc<EnumType>,
    ordinal: usize,
}

impl EnumMember {
    /// The member's declared name.
    pub fn name(&self) -> &str {
        &self.ty.members[self.ordinal]
    }

    /// The declaring type.
    pub fn enum_type(&self) -> &Arc<EnumType> {
        &self.ty
    }

    /// Zero-based declaration position within the type.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }
}

impl PartialOrd for EnumMember {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.ty == other.ty {
            Some(self.ordinal.cmp(&other.ordinal))
        } else {
            None
        }
    }
}

impl fmt::Display for EnumMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The `index`-th unnamed member of the enumerated type `enum_name`.
///
/// Indices are 1-based on the wire. Unlike [`EnumMember`] the member has
/// no declared symbolic name, so identity is the `(enum_name, index)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnonEnum {
    pub enum_name: String,
    pub index: u64,
}

impl AnonEnum {
    pub fn new(enum_name: impl Into<String>, index: u64) -> Self {
        Self {
            enum_name: enum_name.into(),
            index,
        }
    }
}

impl fmt::Display for AnonEnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "to_enum({}, {})", self.enum_name, self.index)
    }
}

/// An enum member built by applying a named constructor to an argument.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstrEnum {
    pub constructor: String,
    pub argument: Box<Value>,
}

impl ConstrEnum {
    pub fn new(constructor: impl Into<String>, argument: Value) -> Self {
        Self {
            constructor: constructor.into(),
            argument: Box::new(argument),
        }
    }
}

impl fmt::Display for ConstrEnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.constructor, self.argument)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members_order_by_declaration() {
        let day = EnumType::new("DAY", ["Mo", "Tu", "We"]);
        let mo = day.member("Mo").unwrap();
        let we = day.member("We").unwrap();

        assert!(mo < we);
        assert_eq!(mo.ordinal(), 0);
        assert_eq!(we.name(), "We");
    }

    #[test]
    fn members_of_different_types_are_incomparable() {
        let day = EnumType::new("DAY", ["Mo"]);
        let color = EnumType::new("COLOR", ["Red"]);

        let mo = day.member("Mo").unwrap();
        let red = color.member("Red").unwrap();

        assert_ne!(mo, red);
        assert_eq!(mo.partial_cmp(&red), None);
    }

    #[test]
    fn unknown_member_lookup_fails() {
        let day = EnumType::new("DAY", ["Mo"]);
        assert!(day.member("Xx").is_none());
        assert!(day.member_at(1).is_none());
    }

    #[test]
    fn constr_enum_displays_as_application() {
        let v = ConstrEnum::new("Succ", Value::Int(3));
        assert_eq!(v.to_string(), "Succ(3)");
    }

    #[test]
    fn anon_enum_displays_as_to_enum() {
        let v = AnonEnum::new("TT", 2);
        assert_eq!(v.to_string(), "to_enum(TT, 2)");
    }
}

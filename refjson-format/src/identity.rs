//! Identity keys: scope + id value

use std::borrow::Cow;
use std::fmt;

use uuid::Uuid;

/// Namespace in which id values must be unique
///
/// One scope exists per identity-bearing type, or per annotated property when the
/// identity is declared on a field. Scopes are opaque and compared by name only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdScope(Cow<'static, str>);

impl IdScope {
    /// Create a scope from a static name
    pub const fn new(name: &'static str) -> Self {
        IdScope(Cow::Borrowed(name))
    }

    /// Create a scope from an owned name
    pub fn owned(name: impl Into<String>) -> Self {
        IdScope(Cow::Owned(name.into()))
    }

    /// Scope name
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Id value carried by an object literal or used as a bare reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdValue {
    /// Integer id (sequence generator or integer property)
    Int(i64),
    /// 128-bit random token
    Uuid(Uuid),
    /// String property value
    Text(String),
}

impl From<i64> for IdValue {
    fn from(value: i64) -> Self {
        IdValue::Int(value)
    }
}

impl From<i32> for IdValue {
    fn from(value: i32) -> Self {
        IdValue::Int(i64::from(value))
    }
}

impl From<Uuid> for IdValue {
    fn from(value: Uuid) -> Self {
        IdValue::Uuid(value)
    }
}

impl From<String> for IdValue {
    fn from(value: String) -> Self {
        IdValue::Text(value)
    }
}

impl From<&str> for IdValue {
    fn from(value: &str) -> Self {
        IdValue::Text(value.to_string())
    }
}

impl fmt::Display for IdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdValue::Int(v) => write!(f, "{v}"),
            IdValue::Uuid(v) => write!(f, "{v}"),
            IdValue::Text(v) => write!(f, "\"{v}\""),
        }
    }
}

/// Registry key: an id value within its scope
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdKey {
    /// Identity namespace
    pub scope: IdScope,
    /// Id within the namespace
    pub id: IdValue,
}

impl IdKey {
    /// Create a new key
    pub fn new(scope: IdScope, id: IdValue) -> Self {
        Self { scope, id }
    }
}

impl fmt::Display for IdKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.scope, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scopes_compare_by_name() {
        assert_eq!(IdScope::new("Node"), IdScope::owned("Node"));
        assert_ne!(IdScope::new("Node"), IdScope::new("Edge"));
    }

    #[test]
    fn test_same_id_in_different_scopes_is_distinct() {
        let a = IdKey::new(IdScope::new("A"), IdValue::Int(1));
        let b = IdKey::new(IdScope::new("B"), IdValue::Int(1));
        assert_ne!(a, b);
    }

    #[test]
    fn test_display() {
        let key = IdKey::new(IdScope::new("Node"), IdValue::Int(7));
        assert_eq!(key.to_string(), "Node#7");

        let key = IdKey::new(IdScope::new("Tag"), IdValue::from("x"));
        assert_eq!(key.to_string(), "Tag#\"x\"");
    }
}

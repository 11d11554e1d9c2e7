//! Dotted names

use std::fmt;

/// A possibly namespace-qualified name such as `ns.sub.Type`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName(String);

impl QualifiedName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Prefixes `name` with `namespace` unless it is already qualified or
    /// the namespace is empty.
    pub fn in_namespace(name: &str, namespace: &str) -> Self {
        if name.contains('.') || namespace.is_empty() {
            Self::new(name)
        } else {
            Self(format!("{namespace}.{name}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// Everything before the last segment
    pub fn namespace(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(namespace, _)| namespace)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QualifiedName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_namespace() {
        assert_eq!(QualifiedName::in_namespace("T", "a.b").as_str(), "a.b.T");
        assert_eq!(QualifiedName::in_namespace("x.T", "a.b").as_str(), "x.T");
        assert_eq!(QualifiedName::in_namespace("T", "").as_str(), "T");
    }

    #[test]
    fn test_simple_name_and_namespace() {
        let name = QualifiedName::from("a.b.T");
        assert_eq!(name.simple_name(), "T");
        assert_eq!(name.namespace(), Some("a.b"));

        let bare = QualifiedName::from("T");
        assert_eq!(bare.simple_name(), "T");
        assert_eq!(bare.namespace(), None);
    }
}

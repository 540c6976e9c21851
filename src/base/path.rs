use std::fmt;

use smol_str::SmolStr;

/// A dot-joined sequence of identifiers naming something a piece of code
/// reads from its environment: a plain name (`math`) or an attribute chain
/// (`math.sin`).
///
/// Paths are recorded together with every non-empty prefix, so a consumer
/// can match dependency edges at whatever granularity it needs. A chain is
/// only tracked up to the first call expression in it; everything to the
/// right of a call names a runtime value, not an environment entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DependencyPath(SmolStr);

impl DependencyPath {
    /// Create a path from its dot-joined text.
    pub fn new(path: impl AsRef<str>) -> Self {
        Self(SmolStr::new(path.as_ref()))
    }

    /// The full dot-joined text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The first identifier in the path (`a` for `a.b.c`).
    ///
    /// Scope filtering is keyed on the root alone: a path is suppressed
    /// when its root is locally bound, never segment by segment.
    pub fn root(&self) -> &str {
        self.0.split('.').next().unwrap_or(self.0.as_str())
    }

    /// Iterate the identifiers in the path, left to right.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Extend the path by one attribute segment.
    pub fn child(&self, segment: &str) -> Self {
        let mut joined = String::with_capacity(self.0.len() + segment.len() + 1);
        joined.push_str(&self.0);
        joined.push('.');
        joined.push_str(segment);
        Self(SmolStr::new(joined))
    }

    /// Whether `self` is a (strict or equal) prefix of `other` on segment
    /// boundaries: `a.b` is a prefix of `a.b.c` but not of `a.bc`.
    pub fn is_prefix_of(&self, other: &DependencyPath) -> bool {
        let rest = match other.0.strip_prefix(self.0.as_str()) {
            Some(rest) => rest,
            None => return false,
        };
        rest.is_empty() || rest.starts_with('.')
    }
}

impl fmt::Display for DependencyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DependencyPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for DependencyPath {
    fn from(path: String) -> Self {
        Self(SmolStr::new(path))
    }
}

impl PartialEq<&str> for DependencyPath {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<DependencyPath> for &str {
    fn eq(&self, other: &DependencyPath) -> bool {
        other.0 == *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_and_segments() {
        let path = DependencyPath::new("a.b.c");
        assert_eq!(path.root(), "a");
        assert_eq!(path.segments().collect::<Vec<_>>(), vec!["a", "b", "c"]);

        let bare = DependencyPath::new("math");
        assert_eq!(bare.root(), "math");
    }

    #[test]
    fn child_extends_path() {
        let path = DependencyPath::new("a").child("b").child("c");
        assert_eq!(path, "a.b.c");
    }

    #[test]
    fn prefix_respects_segment_boundaries() {
        let ab = DependencyPath::new("a.b");
        assert!(ab.is_prefix_of(&DependencyPath::new("a.b.c")));
        assert!(ab.is_prefix_of(&DependencyPath::new("a.b")));
        assert!(!ab.is_prefix_of(&DependencyPath::new("a.bc")));
        assert!(!ab.is_prefix_of(&DependencyPath::new("a")));
    }
}

//! Dotted path representation for navigating document structure.
//!
//! A path is a sequence of segments. Each segment is either a field name
//! (for records) or an index (for lists). The textual form joins segments
//! with `.`, so `lotItem.0.lotDescription.1.title` is a key, an index, a key,
//! an index and a key.

use crate::error::{Fault, StateError, StateResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single segment in a path.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Seg {
    /// Record field access.
    Key(String),
    /// List element access.
    Index(usize),
}

impl Seg {
    /// Create a key segment.
    #[inline]
    pub fn key(k: impl Into<String>) -> Self {
        Seg::Key(k.into())
    }

    /// Create an index segment.
    #[inline]
    pub fn index(i: usize) -> Self {
        Seg::Index(i)
    }

    /// Get the key if this is a key segment.
    #[inline]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Seg::Key(k) => Some(k),
            Seg::Index(_) => None,
        }
    }

    /// Get the index if this is an index segment.
    #[inline]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Seg::Key(_) => None,
            Seg::Index(i) => Some(*i),
        }
    }

    /// Parse one textual segment: all-digit segments are indices.
    fn parse(raw: &str) -> Option<Seg> {
        if raw.is_empty() {
            return None;
        }
        if raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(i) = raw.parse::<usize>() {
                return Some(Seg::Index(i));
            }
        }
        Some(Seg::Key(raw.to_owned()))
    }
}

impl fmt::Display for Seg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seg::Key(k) => f.write_str(k),
            Seg::Index(i) => write!(f, "{}", i),
        }
    }
}

impl From<String> for Seg {
    fn from(s: String) -> Self {
        Seg::Key(s)
    }
}

impl From<&str> for Seg {
    fn from(s: &str) -> Self {
        Seg::Key(s.to_owned())
    }
}

impl From<usize> for Seg {
    fn from(i: usize) -> Self {
        Seg::Index(i)
    }
}

/// A complete path into a document.
///
/// # Examples
///
/// ```
/// use reqform_state::Path;
///
/// let path = Path::root().key("lotItem").index(0).key("lotTitle");
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.to_string(), "lotItem.0.lotTitle");
///
/// let parsed: Path = "lotItem.0.lotTitle".parse().unwrap();
/// assert_eq!(parsed, path);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Path(Vec<Seg>);

impl Path {
    /// Create an empty path (root).
    #[inline]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Create a path from a vector of segments.
    #[inline]
    pub fn from_segments(segments: Vec<Seg>) -> Self {
        Self(segments)
    }

    /// Parse the dotted form.
    ///
    /// The empty string and empty segments (`"a..b"`, `"a."`) are rejected:
    /// every addressable value lives below the root.
    pub fn parse(raw: &str) -> StateResult<Self> {
        if raw.is_empty() {
            return Err(StateError::malformed(Path::root(), Fault::EmptySegment));
        }
        let mut path = Path::root();
        for part in raw.split('.') {
            match Seg::parse(part) {
                Some(seg) => path.push(seg),
                None => return Err(StateError::malformed(path, Fault::EmptySegment)),
            }
        }
        Ok(path)
    }

    /// Append a key segment and return self (builder pattern).
    #[inline]
    pub fn key(mut self, k: impl Into<String>) -> Self {
        self.0.push(Seg::Key(k.into()));
        self
    }

    /// Append an index segment and return self (builder pattern).
    #[inline]
    pub fn index(mut self, i: usize) -> Self {
        self.0.push(Seg::Index(i));
        self
    }

    /// Push a segment onto the path (mutating).
    #[inline]
    pub fn push(&mut self, seg: Seg) {
        self.0.push(seg);
    }

    /// Pop the last segment from the path.
    #[inline]
    pub fn pop(&mut self) -> Option<Seg> {
        self.0.pop()
    }

    /// Get the segments of this path.
    #[inline]
    pub fn segments(&self) -> &[Seg] {
        &self.0
    }

    /// Check if this path is empty (root).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of segments in this path.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get the last segment.
    #[inline]
    pub fn last(&self) -> Option<&Seg> {
        self.0.last()
    }

    /// Join this path with another path.
    #[inline]
    pub fn join(&self, other: &Path) -> Path {
        let mut result = self.clone();
        result.0.extend(other.0.iter().cloned());
        result
    }

    /// Check if this path is a prefix of another path.
    ///
    /// A path is a prefix of itself.
    ///
    /// ```
    /// use reqform_state::path;
    ///
    /// let parent = path!("activity");
    /// let child = path!("activity", "schedule", "dateStart");
    ///
    /// assert!(parent.is_prefix_of(&child));
    /// assert!(!child.is_prefix_of(&parent));
    /// ```
    #[inline]
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Get the parent path (path without the last segment).
    #[inline]
    pub fn parent(&self) -> Option<Path> {
        if self.0.is_empty() {
            None
        } else {
            let mut p = self.clone();
            p.pop();
            Some(p)
        }
    }

    /// Prefix made of the first `len` segments.
    #[inline]
    pub fn prefix(&self, len: usize) -> Path {
        Path(self.0[..len.min(self.0.len())].to_vec())
    }

    /// Iterate over the segments.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Seg> {
        self.0.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("$");
        }
        for (i, seg) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", seg)?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl From<Path> for String {
    fn from(path: Path) -> Self {
        path.to_string()
    }
}

impl TryFrom<String> for Path {
    type Error = StateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Path::parse(&value)
    }
}

impl FromIterator<Seg> for Path {
    fn from_iter<I: IntoIterator<Item = Seg>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Seg;
    type IntoIter = std::slice::Iter<'a, Seg>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::ops::Index<usize> for Path {
    type Output = Seg;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Construct a `Path` from a sequence of segments.
///
/// ```
/// use reqform_state::path;
///
/// // String literals become key segments, numbers become index segments.
/// let p = path!("lotItem", 0, "lotDescription", 1, "title");
/// assert_eq!(p.to_string(), "lotItem.0.lotDescription.1.title");
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::root()
    };
    ($($seg:expr),+ $(,)?) => {{
        let mut p = $crate::Path::root();
        $(
            p.push($crate::Seg::from($seg));
        )+
        p
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_construction() {
        let path = Path::root().key("normalItem").index(0).key("unit");
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], Seg::Key("normalItem".into()));
        assert_eq!(path[1], Seg::Index(0));
        assert_eq!(path[2], Seg::Key("unit".into()));
    }

    #[test]
    fn test_path_display() {
        let path = Path::root().key("normalItem").index(0).key("unit");
        assert_eq!(path.to_string(), "normalItem.0.unit");
        assert_eq!(Path::root().to_string(), "$");
    }

    #[test]
    fn test_parse_numeric_segments_become_indices() {
        let path = Path::parse("lotItem.0.lotDescription.12.items").unwrap();
        assert_eq!(path, path!("lotItem", 0, "lotDescription", 12, "items"));
    }

    #[test]
    fn test_parse_negative_index_is_a_key() {
        let path = Path::parse("normalItem.-1").unwrap();
        assert_eq!(path[1], Seg::Key("-1".into()));
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        for raw in ["", "a..b", "a.", ".a"] {
            let err = Path::parse(raw).unwrap_err();
            assert!(
                matches!(
                    err,
                    StateError::MalformedPath {
                        fault: Fault::EmptySegment,
                        ..
                    }
                ),
                "{raw:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_path_parent_and_prefix() {
        let path = path!("a", 0, "b");
        assert_eq!(path.parent().unwrap(), path!("a", 0));
        assert_eq!(path.prefix(1), path!("a"));
        assert!(Path::root().parent().is_none());
    }

    #[test]
    fn test_path_serde_uses_dotted_form() {
        let path = path!("lotItem", 0, "lotTitle");
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"lotItem.0.lotTitle\"");
        let parsed: Path = serde_json::from_str(&json).unwrap();
        assert_eq!(path, parsed);
    }

    #[test]
    fn test_path_serde_rejects_malformed() {
        assert!(serde_json::from_str::<Path>("\"a..b\"").is_err());
    }
}

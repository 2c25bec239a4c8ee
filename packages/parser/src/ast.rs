//! Typed path AST
//!
//! A path is a sequence of segments applied from the story root:
//!
//! ```text
//! sections[{"id":"abc"}].contents[0].background
//! └──┬───┘└─────┬──────┘ └──┬───┘└┬┘ └───┬────┘
//! Property  Predicate   Property Index Property
//! ```

use geostory_common::Value;
use std::fmt;

/// One step of a path expression
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Object property (or array position when the name is a decimal integer)
    Property(String),

    /// Array position; negative positions parse but never resolve
    Index(i64),

    /// First array element whose `key` equals `value`
    Predicate { key: String, value: Value },
}

/// Concrete key produced by resolving a segment against a document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Index(usize),
    Property(String),
}

impl From<Key> for Segment {
    fn from(key: Key) -> Self {
        match key {
            Key::Index(i) => Segment::Index(i as i64),
            Key::Property(name) => Segment::Property(name),
        }
    }
}

/// Parsed path expression
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The empty path (addresses the root)
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Path made of concrete keys (predicates already resolved)
    pub fn from_keys(keys: &[Key]) -> Self {
        Self::new(keys.iter().cloned().map(Segment::from).collect())
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Path without its last segment (`None` for the root)
    pub fn parent(&self) -> Option<Path> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self::new(self.segments[..self.segments.len() - 1].to_vec()))
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn child(mut self, name: impl Into<String>) -> Self {
        self.segments.push(Segment::Property(name.into()));
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(Segment::Index(index as i64));
        self
    }

    pub fn predicate(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.segments.push(Segment::Predicate {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn join(mut self, other: &Path) -> Self {
        self.segments.extend(other.segments.iter().cloned());
        self
    }
}

fn is_plain_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Property(name) if is_plain_name(name) => write!(f, "{}", name),
            Segment::Property(name) => write!(f, "[{}]", quote(name)),
            Segment::Index(i) => write!(f, "[{}]", i),
            Segment::Predicate { key, value } => write!(f, "[{{{}:{}}}]", quote(key), value),
        }
    }
}

/// Canonical form; parses back to an equal path
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 && matches!(segment, Segment::Property(name) if is_plain_name(name)) {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_canonical_form() {
        let path = Path::root()
            .child("sections")
            .predicate("id", "abc")
            .child("contents")
            .index(0)
            .child("font-size");
        assert_eq!(
            path.to_string(),
            r#"sections[{"id":"abc"}].contents[0]["font-size"]"#
        );
    }

    #[test]
    fn test_parent_and_last() {
        let path = Path::root().child("sections").index(2);
        assert_eq!(path.last(), Some(&Segment::Index(2)));
        assert_eq!(path.parent(), Some(Path::root().child("sections")));
        assert_eq!(Path::root().parent(), None);
    }

    #[test]
    fn test_from_keys() {
        let path = Path::from_keys(&[Key::Property("sections".into()), Key::Index(1)]);
        assert_eq!(path.to_string(), "sections[1]");
    }
}

//! # Path Resolution
//!
//! Applies a parsed path to a document.
//!
//! Resolution never fails loudly: a missing property, a predicate without a
//! match or an out-of-range index produce `found == false`, and callers
//! decide whether that is a no-op or something to report.
//!
//! Addressing rules:
//! - `Property(name)` reads an object property; on arrays a decimal name is
//!   an index
//! - `Index(n)` reads an array element; on objects it reads the property
//!   named `n`; negative indices never resolve
//! - `Predicate { key, value }` picks the first array element whose `key`
//!   equals `value` (numbers compared by value)

use crate::ast::{Key, Path, Segment};
use geostory_common::Value;

/// Location of a path inside a document
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<'a> {
    /// Container holding the addressed value (`None` for the root or a miss
    /// before the last segment)
    pub parent: Option<&'a Value>,

    /// Key of the addressed value inside `parent`
    pub key: Option<Key>,

    /// Addressed value, when present
    pub value: Option<&'a Value>,

    /// Whether every segment resolved to an existing value
    pub found: bool,
}

impl<'a> Resolution<'a> {
    fn miss() -> Self {
        Self {
            parent: None,
            key: None,
            value: None,
            found: false,
        }
    }
}

/// Key addressed by `segment` inside `node`, if the segment applies to it
fn key_for(node: &Value, segment: &Segment) -> Option<Key> {
    match (node, segment) {
        (Value::Object(_), Segment::Property(name)) => Some(Key::Property(name.clone())),
        (Value::Array(_), Segment::Property(name)) => {
            name.parse::<usize>().ok().map(Key::Index)
        }
        (_, Segment::Index(i)) if *i < 0 => None,
        (Value::Array(_), Segment::Index(i)) => Some(Key::Index(*i as usize)),
        (Value::Object(_), Segment::Index(i)) => Some(Key::Property(i.to_string())),
        (Value::Array(items), Segment::Predicate { key, value }) => items
            .iter()
            .position(|item| item.get(key).map_or(false, |v| v.strict_eq(value)))
            .map(Key::Index),
        _ => None,
    }
}

/// Child of `node` at `key`
pub fn child<'a>(node: &'a Value, key: &Key) -> Option<&'a Value> {
    match key {
        Key::Index(i) => node.get_index(*i),
        Key::Property(name) => node.get(name),
    }
}

/// Resolve a path against a document
pub fn resolve<'a>(root: &'a Value, path: &Path) -> Resolution<'a> {
    let segments = path.segments();
    if segments.is_empty() {
        return Resolution {
            parent: None,
            key: None,
            value: Some(root),
            found: true,
        };
    }

    let mut node = root;
    for (i, segment) in segments.iter().enumerate() {
        let is_last = i == segments.len() - 1;
        let key = match key_for(node, segment) {
            Some(key) => key,
            None => return Resolution::miss(),
        };
        let next = child(node, &key);

        if is_last {
            return Resolution {
                parent: Some(node),
                found: next.is_some(),
                value: next,
                key: Some(key),
            };
        }

        node = match next {
            Some(next) => next,
            None => return Resolution::miss(),
        };
    }

    Resolution::miss()
}

/// Read the value at a path
pub fn get<'a>(root: &'a Value, path: &Path) -> Option<&'a Value> {
    resolve(root, path).value
}

/// Concrete keys for a path against a document.
///
/// Every intermediate segment must resolve to an existing value; the last
/// one only needs to be applicable to its container (so a missing property
/// still yields a key that can be written).
pub fn effective_keys(root: &Value, path: &Path) -> Option<Vec<Key>> {
    let mut keys = Vec::with_capacity(path.len());
    let mut node = root;
    let segments = path.segments();

    for (i, segment) in segments.iter().enumerate() {
        let key = key_for(node, segment)?;
        if i + 1 < segments.len() {
            node = child(node, &key)?;
        }
        keys.push(key);
    }

    Some(keys)
}

/// Index-based equivalent of a path (predicates replaced by positions)
pub fn effective_path(root: &Value, path: &Path) -> Option<Path> {
    effective_keys(root, path).map(|keys| Path::from_keys(&keys))
}

//! # Story Mutations
//!
//! The four structural edits of a story document, each addressed by a
//! string path.
//!
//! ## Semantics
//!
//! ### Add
//! - Inserts `element` into the array at `path`
//! - Object elements without an `id` get a fresh one
//! - Position: numeric index (clamped), id of a sibling (insert after it),
//!   or append when absent or unmatched
//! - Creates the array when the path names a missing property of an
//!   existing object
//!
//! ### Update
//! - Replace: the value at `path` becomes `element`
//! - Merge: shallow merge of two objects; two arrays concatenate (or
//!   dedupe with `uniqueByKey`); a missing value is set
//!
//! ### Remove
//! - Detaches the value at `path`
//!
//! ### Move
//! - Remove at `source`, then Add at `target` against the document that
//!   no longer holds the node
//! - No-op when either half fails, so content is never dropped
//!
//! Every mutation is fail-soft: when the path does not resolve the input
//! document is returned unchanged (the very same tree, not a copy).

use crate::errors::EditorError;
use crate::tree::{edit_at, remove_at, set_at};
use geostory_common::{ensure_id, Value};
use geostory_parser::resolver::child;
use geostory_parser::{effective_keys, get, Key, Path, PathCache};
use serde::{Deserialize, Serialize};

/// Insert position for `Add` and `Move`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Position {
    /// Array index; negative values insert at the front
    Index(i64),

    /// Insert right after the element with this id
    Id(String),
}

impl From<i64> for Position {
    fn from(index: i64) -> Self {
        Position::Index(index)
    }
}

impl From<&str> for Position {
    fn from(id: &str) -> Self {
        Position::Id(id.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    #[default]
    Replace,
    Merge,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOptions {
    /// When merging two arrays, keep one element per value of this key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_by_key: Option<String>,
}

/// Structural edits of a story document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Mutation {
    /// Insert an element into the array at `path`
    Add {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Position>,
        element: Value,
    },

    /// Replace or merge the value at `path`
    Update {
        path: String,
        element: Value,
        #[serde(default)]
        mode: UpdateMode,
        #[serde(default)]
        options: MergeOptions,
    },

    /// Detach the value at `path`
    Remove { path: String },

    /// Relocate the value at `source` into the array at `target`
    Move {
        source: String,
        target: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Position>,
    },
}

impl Mutation {
    /// Add mutation; object elements are given an `id` here when missing
    pub fn add(path: impl Into<String>, position: Option<Position>, element: Value) -> Self {
        Mutation::Add {
            path: path.into(),
            position,
            element: ensure_id(element),
        }
    }

    pub fn update(path: impl Into<String>, element: Value, mode: UpdateMode) -> Self {
        Mutation::Update {
            path: path.into(),
            element,
            mode,
            options: MergeOptions::default(),
        }
    }

    /// Merge of arrays keeping one element per `key`
    pub fn merge_unique(path: impl Into<String>, element: Value, key: impl Into<String>) -> Self {
        Mutation::Update {
            path: path.into(),
            element,
            mode: UpdateMode::Merge,
            options: MergeOptions {
                unique_by_key: Some(key.into()),
            },
        }
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Mutation::Remove { path: path.into() }
    }

    pub fn move_to(
        source: impl Into<String>,
        target: impl Into<String>,
        position: Option<Position>,
    ) -> Self {
        Mutation::Move {
            source: source.into(),
            target: target.into(),
            position,
        }
    }

    /// Path whose value this mutation detaches, if any
    pub fn removed_path(&self) -> Option<&str> {
        match self {
            Mutation::Remove { path } => Some(path),
            Mutation::Move { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Apply to `doc`, returning the edited document.
    ///
    /// Unresolvable paths return `doc` itself; only malformed path strings
    /// are errors.
    pub fn apply(&self, doc: &Value, paths: &PathCache) -> Result<Value, EditorError> {
        let edited = match self {
            Mutation::Add {
                path,
                position,
                element,
            } => add(doc, &*paths.parse(path)?, position.as_ref(), element.clone()),

            Mutation::Update {
                path,
                element,
                mode,
                options,
            } => update(doc, &*paths.parse(path)?, element, *mode, options),

            Mutation::Remove { path } => remove(doc, &*paths.parse(path)?),

            Mutation::Move {
                source,
                target,
                position,
            } => move_node(
                doc,
                &*paths.parse(source)?,
                &*paths.parse(target)?,
                position.as_ref(),
            ),
        };

        Ok(match edited {
            Some(next) => next,
            None => {
                tracing::debug!(mutation = ?self, "mutation did not resolve, document unchanged");
                doc.clone()
            }
        })
    }
}

/// Array index where a new element goes
pub(crate) fn index_to_insert(items: &[Value], position: Option<&Position>) -> usize {
    match position {
        None => items.len(),
        Some(Position::Index(i)) => (*i).clamp(0, items.len() as i64) as usize,
        Some(Position::Id(id)) => items
            .iter()
            .position(|item| item.id() == Some(id.as_str()))
            .map_or(items.len(), |i| i + 1),
    }
}

/// Insert `element` into the array at `path`
pub fn add(doc: &Value, path: &Path, position: Option<&Position>, element: Value) -> Option<Value> {
    let element = ensure_id(element);
    let keys = effective_keys(doc, path)?;

    let target = match keys.split_last() {
        None => Some(doc),
        Some((last, parent)) => {
            let mut node = doc;
            for key in parent {
                node = child(node, key)?;
            }
            match child(node, last) {
                Some(existing) => Some(existing),
                None if node.is_object() && matches!(last, Key::Property(_)) => {
                    // new array under an existing object
                    return set_at(doc, &keys, Value::array(vec![element]));
                }
                None => None,
            }
        }
    }?;

    if !target.is_array() {
        return None;
    }

    edit_at(doc, &keys, |node| match node.array_mut() {
        Some(items) => {
            let at = index_to_insert(items, position);
            items.insert(at, element);
            true
        }
        None => false,
    })
}

/// Replace or merge the value at `path`
pub fn update(
    doc: &Value,
    path: &Path,
    element: &Value,
    mode: UpdateMode,
    options: &MergeOptions,
) -> Option<Value> {
    let keys = effective_keys(doc, path)?;
    let existing = get(doc, path);

    let next = match mode {
        UpdateMode::Replace => element.clone(),
        UpdateMode::Merge => merged(existing, element, options)?,
    };

    set_at(doc, &keys, next)
}

/// Shallow merge of `element` into `existing`
fn merged(existing: Option<&Value>, element: &Value, options: &MergeOptions) -> Option<Value> {
    match (existing, element) {
        (None, _) | (Some(Value::Null), _) => Some(element.clone()),
        (Some(Value::Object(_)), Value::Object(incoming)) => {
            let mut result = existing?.clone();
            let map = result.object_mut()?;
            for (key, value) in incoming.iter() {
                map.insert(key.clone(), value.clone());
            }
            Some(result)
        }
        (Some(Value::Array(current)), Value::Array(incoming)) => {
            let combined = current.iter().chain(incoming.iter()).cloned();
            Some(match &options.unique_by_key {
                Some(key) => Value::array(unique_by(combined, key)),
                None => Value::array(combined.collect()),
            })
        }
        _ => None,
    }
}

/// One element per distinct `key` value, in order of first appearance, the
/// latest element winning. Elements without the key are all kept.
///
/// Key values compare like path predicates, so `1` and `1.0` are one key.
fn unique_by(items: impl Iterator<Item = Value>, key: &str) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::new();
    let mut seen: Vec<(Value, usize)> = Vec::new();

    for item in items {
        let tag = match item.get(key) {
            Some(tag) => tag.clone(),
            None => {
                out.push(item);
                continue;
            }
        };
        match seen.iter().find(|(other, _)| tag.strict_eq(other) || &tag == other) {
            Some(&(_, at)) => out[at] = item,
            None => {
                seen.push((tag, out.len()));
                out.push(item);
            }
        }
    }

    out
}

/// Detach the value at `path`
pub fn remove(doc: &Value, path: &Path) -> Option<Value> {
    if path.is_root() {
        return None;
    }
    let keys = effective_keys(doc, path)?;
    remove_at(doc, &keys)
}

/// Remove at `source`, then insert the detached value at `target`
pub fn move_node(
    doc: &Value,
    source: &Path,
    target: &Path,
    position: Option<&Position>,
) -> Option<Value> {
    let node = get(doc, source)?.clone();
    let detached = remove(doc, source)?;
    add(&detached, target, position, node)
}

//! # Post-Effect System
//!
//! Mutations can leave the story in a shape that needs follow-up edits. A
//! post-effect looks at a committed mutation together with the documents
//! before and after it, and returns the follow-up mutations.
//!
//! Effects never apply anything themselves. The caller applies their output
//! right after the mutation, against the document they were computed for,
//! so a follow-up can trigger further follow-ups (a column emptied by a
//! removal is removed, which can empty its section, and so on).

use crate::mutations::{index_to_insert, Mutation, Position};
use crate::tree::remove_at;
use geostory_common::Value;
use geostory_parser::resolver::child;
use geostory_parser::{effective_keys, parse, Key, Path, Segment};

/// Post-effect that can be triggered by a mutation
pub trait PostEffect: std::fmt::Debug + Send + Sync {
    /// Analyze the mutation that turned `before` into `after`
    fn analyze(&self, mutation: &Mutation, before: &Value, after: &Value) -> Vec<Mutation>;
}

/// Remove a node whose `contents` array was emptied by a removal or a move
#[derive(Debug)]
pub struct CleanupEmptyContainers;

impl PostEffect for CleanupEmptyContainers {
    fn analyze(&self, mutation: &Mutation, before: &Value, after: &Value) -> Vec<Mutation> {
        let owner = match mutation {
            Mutation::Remove { path } => parsed(path).and_then(|path| empty_container_owner(after, &path)),
            Mutation::Move {
                source,
                target,
                position,
            } => match (parsed(source), parsed(target)) {
                (Some(source), Some(target)) => moved_out_owner(before, after, &source, &target, position.as_ref()),
                _ => None,
            },
            _ => None,
        };

        match owner {
            Some(owner) => vec![Mutation::remove(owner.to_string())],
            None => vec![],
        }
    }
}

fn parsed(source: &str) -> Option<Path> {
    match parse(source) {
        Ok(path) => Some(path),
        Err(err) => {
            tracing::debug!(path = source, error = %err, "mutation path does not parse");
            None
        }
    }
}

/// Owner of the `contents` array that held `removed`, when that array is
/// now empty and the owner is not the story root.
///
/// The returned path is index based, resolved against `doc`.
pub fn empty_container_owner(doc: &Value, removed: &Path) -> Option<Path> {
    let container = removed.parent()?;
    if !matches!(container.last(), Some(Segment::Property(name)) if name == "contents") {
        return None;
    }
    if container.parent()?.is_root() {
        return None;
    }

    let keys = effective_keys(doc, &container)?;
    let is_empty = geostory_parser::get(doc, &container)
        .and_then(Value::as_array)
        .map_or(false, |items| items.is_empty());
    if !is_empty {
        return None;
    }

    let owner: &[Key] = &keys[..keys.len() - 1];
    Some(Path::from_keys(owner))
}

/// [`empty_container_owner`] for a move from `source` to `target`.
///
/// The container is inspected in `before` with the node detached, where
/// `source` still addresses it. When the insertion lands in an array on the
/// way to the owner, at or before it, the owner's index there moves up by
/// one. The result is checked against `after`.
pub fn moved_out_owner(
    before: &Value,
    after: &Value,
    source: &Path,
    target: &Path,
    position: Option<&Position>,
) -> Option<Path> {
    let keys = effective_keys(before, source)?;
    let detached = remove_at(before, &keys)?;
    let owner = empty_container_owner(&detached, &Path::from_keys(&keys))?;
    let mut owner_keys = effective_keys(&detached, &owner)?;

    if let Some(target_keys) = effective_keys(&detached, target) {
        if target_keys.starts_with(&owner_keys) {
            // moved back under the owner
            return None;
        }
        let depth = target_keys.len();
        let crossed = match owner_keys.get(depth) {
            Some(Key::Index(at)) if owner_keys.starts_with(&target_keys) => Some(*at),
            _ => None,
        };
        if let Some(at) = crossed {
            let inserted = node_at(&detached, &target_keys)
                .and_then(Value::as_array)
                .map(|items| index_to_insert(items, position));
            if matches!(inserted, Some(i) if i <= at) {
                owner_keys[depth] = Key::Index(at + 1);
            }
        }
    }

    let emptied = node_at(after, &owner_keys)
        .and_then(|node| node.get("contents"))
        .and_then(Value::as_array)
        .map_or(false, |items| items.is_empty());
    emptied.then(|| Path::from_keys(&owner_keys))
}

fn node_at<'a>(doc: &'a Value, keys: &[Key]) -> Option<&'a Value> {
    keys.iter().try_fold(doc, |node, key| child(node, key))
}

/// Runs every registered effect
#[derive(Debug)]
pub struct PostEffectEngine {
    effects: Vec<Box<dyn PostEffect>>,
}

impl PostEffectEngine {
    /// Create engine with default effects
    pub fn new() -> Self {
        Self {
            effects: vec![Box::new(CleanupEmptyContainers)],
        }
    }

    pub fn register(&mut self, effect: Box<dyn PostEffect>) {
        self.effects.push(effect);
    }

    /// Analyze a mutation and generate all secondary mutations
    pub fn analyze(&self, mutation: &Mutation, before: &Value, after: &Value) -> Vec<Mutation> {
        self.effects
            .iter()
            .flat_map(|effect| effect.analyze(mutation, before, after))
            .collect()
    }
}

impl Default for PostEffectEngine {
    fn default() -> Self {
        Self::new()
    }
}

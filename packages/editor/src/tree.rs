//! Path copying over `Value` trees.
//!
//! Every helper returns a new root when it changed something and `None`
//! otherwise. Only the containers on the edited path are copied; all other
//! branches are shared with the input.

use geostory_common::Value;
use geostory_parser::{resolver::child, Key};

/// Rebuild `root` with `edit` applied to the value at `keys`.
///
/// Returns `None` when a key does not exist or when `edit` reports that it
/// left the target untouched.
pub(crate) fn edit_at<F>(root: &Value, keys: &[Key], edit: F) -> Option<Value>
where
    F: FnOnce(&mut Value) -> bool,
{
    match keys.split_first() {
        None => {
            let mut target = root.clone();
            edit(&mut target).then_some(target)
        }
        Some((key, rest)) => {
            let current = child(root, key)?;
            let replaced = edit_at(current, rest, edit)?;
            let mut copy = root.clone();
            put(&mut copy, key, replaced).then_some(copy)
        }
    }
}

/// Write `value` under `key`. Object properties are created when missing,
/// array slots must already exist.
pub(crate) fn put(container: &mut Value, key: &Key, value: Value) -> bool {
    match key {
        Key::Index(i) => match container.array_mut() {
            Some(items) if *i < items.len() => {
                items[*i] = value;
                true
            }
            _ => false,
        },
        Key::Property(name) => match container.object_mut() {
            Some(map) => {
                map.insert(name.clone(), value);
                true
            }
            None => false,
        },
    }
}

/// Detach the child at `key`, keeping the order of the remaining children
pub(crate) fn take(container: &mut Value, key: &Key) -> Option<Value> {
    match key {
        Key::Index(i) => match container.array_mut() {
            Some(items) if *i < items.len() => Some(items.remove(*i)),
            _ => None,
        },
        Key::Property(name) => container.object_mut()?.shift_remove(name),
    }
}

/// Set the value at `keys`, creating the final property if needed
pub(crate) fn set_at(root: &Value, keys: &[Key], value: Value) -> Option<Value> {
    match keys.split_last() {
        None => Some(value),
        Some((last, parent)) => edit_at(root, parent, |node| put(node, last, value)),
    }
}

/// Remove the value at `keys`
pub(crate) fn remove_at(root: &Value, keys: &[Key]) -> Option<Value> {
    let (last, parent) = keys.split_last()?;
    edit_at(root, parent, |node| take(node, last).is_some())
}

/// Set a nested property, creating missing objects on the way.
///
/// `root` must be an object or null; an intermediate scalar stops the write.
pub(crate) fn set_creating(root: &Value, names: &[&str], value: Value) -> Option<Value> {
    let (name, rest) = match names.split_first() {
        Some(split) => split,
        None => return Some(value),
    };
    let mut copy = match root {
        Value::Object(_) => root.clone(),
        Value::Null => Value::object(),
        _ => return None,
    };
    let next = if rest.is_empty() {
        value
    } else {
        set_creating(root.get(name).unwrap_or(&Value::Null), rest, value)?
    };
    copy.object_mut()?.insert(name.to_string(), next);
    Some(copy)
}

use crate::value::Value;

/// One step from the story root to a node: an array property and a position in it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub container: &'static str,
    pub index: usize,
}

/// Visitor pattern for traversing story nodes immutably
///
/// The default implementations walk `sections`, then every nested
/// `contents` array. Override specific visit_* methods to act on nodes.
/// The trail passed to each method locates the node from the story root.
pub trait Visitor: Sized {
    fn visit_story(&mut self, story: &Value) {
        walk_story(self, story);
    }

    fn visit_node(&mut self, trail: &[Step], node: &Value) {
        walk_node(self, trail, node);
    }

    fn visit_background(&mut self, _trail: &[Step], _background: &Value) {
        // Leaf node, no children to walk
    }
}

pub fn walk_story<V: Visitor>(visitor: &mut V, story: &Value) {
    let sections = match story.get("sections").and_then(Value::as_array) {
        Some(sections) => sections,
        None => return,
    };
    for (index, section) in sections.iter().enumerate() {
        let trail = [Step {
            container: "sections",
            index,
        }];
        visitor.visit_node(&trail, section);
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, trail: &[Step], node: &Value) {
    if let Some(background) = node.get("background").filter(|b| b.is_object()) {
        visitor.visit_background(trail, background);
    }

    if let Some(contents) = node.get("contents").and_then(Value::as_array) {
        let mut child_trail = trail.to_vec();
        for (index, child) in contents.iter().enumerate() {
            child_trail.push(Step {
                container: "contents",
                index,
            });
            visitor.visit_node(&child_trail, child);
            child_trail.pop();
        }
    }
}

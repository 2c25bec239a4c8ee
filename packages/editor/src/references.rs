//! Lookup of story nodes pointing at a media resource

use geostory_common::{walk_node, Step, Value, Visitor};
use geostory_parser::Path;

/// Collects index paths of contents and backgrounds whose `resourceId`
/// matches. A content that references the resource itself is reported
/// without descending into its children.
struct ResourceReferences<'a> {
    resource_id: &'a str,
    found: Vec<Path>,
}

fn trail_path(trail: &[Step]) -> Path {
    trail
        .iter()
        .fold(Path::root(), |path, step| path.child(step.container).index(step.index))
}

fn references(node: &Value, resource_id: &str) -> bool {
    node.get("resourceId").and_then(Value::as_str) == Some(resource_id)
}

impl Visitor for ResourceReferences<'_> {
    fn visit_node(&mut self, trail: &[Step], node: &Value) {
        if references(node, self.resource_id) {
            self.found.push(trail_path(trail));
            return;
        }
        walk_node(self, trail, node);
    }

    fn visit_background(&mut self, trail: &[Step], background: &Value) {
        if references(background, self.resource_id) {
            self.found.push(trail_path(trail).child("background"));
        }
    }
}

/// Paths (index based, story relative) of every node using `resource_id`
pub fn resource_references(story: &Value, resource_id: &str) -> Vec<Path> {
    let mut visitor = ResourceReferences {
        resource_id,
        found: Vec::new(),
    };
    visitor.visit_story(story);
    visitor.found
}

#[cfg(test)]
mod tests {
    use super::*;
    use geostory_common::value;

    #[test]
    fn test_finds_contents_and_backgrounds() {
        let story = value!({
            "sections": [
                {"id": "s1", "contents": [
                    {"id": "c1", "background": {"resourceId": "r1"}, "contents": [
                        {"id": "m1", "type": "media", "resourceId": "r1"},
                        {"id": "m2", "type": "media", "resourceId": "r2"}
                    ]}
                ]},
                {"id": "s2", "resourceId": "r1", "contents": [{"id": "m3", "resourceId": "r1"}]}
            ]
        });

        let paths: Vec<String> = resource_references(&story, "r1")
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            paths,
            [
                "sections[0].contents[0].background",
                "sections[0].contents[0].contents[0]",
                "sections[1]",
            ]
        );
        assert!(resource_references(&story, "nope").is_empty());
    }
}

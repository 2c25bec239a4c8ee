//! Read-only views of the story state.
//!
//! Selectors address the story with the same path grammar the mutations
//! use, so reading and writing a node take the same path string. Values are
//! returned as cheap clones sharing the tree.

use crate::actions::Mode;
use crate::references::resource_references;
use crate::store::{CurrentPage, StoryState};
use geostory_common::Value;
use geostory_parser::{get, parse, PathResult};
use serde::Serialize;
use std::collections::HashSet;

pub fn current_story_selector(state: &StoryState) -> &Value {
    &state.current_story
}

pub fn mode_selector(state: &StoryState) -> Mode {
    state.mode
}

pub fn current_page_selector(state: &StoryState) -> &CurrentPage {
    &state.current_page
}

pub fn loading_selector(state: &StoryState) -> bool {
    state.loading
}

pub fn save_error_selector(state: &StoryState) -> Option<&[Value]> {
    state.errors.save.as_deref()
}

pub fn resources_selector(state: &StoryState) -> &[Value] {
    state
        .current_story
        .get("resources")
        .and_then(Value::as_array)
        .unwrap_or_default()
}

pub fn sections_selector(state: &StoryState) -> &[Value] {
    state
        .current_story
        .get("sections")
        .and_then(Value::as_array)
        .unwrap_or_default()
}

pub fn can_edit_selector(state: &StoryState) -> bool {
    state.resource.as_ref().map_or(false, |r| r.can_edit)
}

pub fn geostory_id_selector(state: &StoryState) -> Option<&str> {
    state.resource.as_ref().and_then(|r| r.id.as_deref())
}

pub fn has_pending_changes(state: &StoryState) -> bool {
    state.pending_changes
}

/// Selector for the story value at `path`.
///
/// The path is parsed once, when the selector is created.
pub fn create_path_selector(path: &str) -> PathResult<impl Fn(&StoryState) -> Option<Value>> {
    let path = parse(path)?;
    Ok(move |state: &StoryState| get(&state.current_story, &path).cloned())
}

pub fn section_at_index_selector_creator(index: usize) -> impl Fn(&StoryState) -> Option<Value> {
    move |state: &StoryState| sections_selector(state).get(index).cloned()
}

pub fn section_selector_creator(id: impl Into<String>) -> impl Fn(&StoryState) -> Option<Value> {
    let id = id.into();
    move |state: &StoryState| {
        sections_selector(state)
            .iter()
            .find(|section| section.id() == Some(id.as_str()))
            .cloned()
    }
}

pub fn resource_by_id_selector_creator(id: impl Into<String>) -> impl Fn(&StoryState) -> Option<Value> {
    let id = id.into();
    move |state: &StoryState| {
        resources_selector(state)
            .iter()
            .find(|resource| resource.id() == Some(id.as_str()))
            .cloned()
    }
}

/// Selector for the `resourceId` of the node at `path`
pub fn resource_id_selector_creator(path: &str) -> PathResult<impl Fn(&StoryState) -> Option<String>> {
    let path = parse(path)?.child("resourceId");
    Ok(move |state: &StoryState| {
        get(&state.current_story, &path)
            .and_then(Value::as_str)
            .map(String::from)
    })
}

pub fn control_selector_creator(control: impl Into<String>) -> impl Fn(&StoryState) -> Option<Value> {
    let control = control.into();
    move |state: &StoryState| state.controls.get(&control).cloned()
}

/// Whether any content or background of the story uses the resource
pub fn is_media_resource_used(state: &StoryState, resource_id: &str) -> bool {
    !resource_references(&state.current_story, resource_id).is_empty()
}

/// Ids checked as visible in the settings panel
fn visible_items(state: &StoryState) -> HashSet<&str> {
    state
        .current_story
        .get("settings")
        .and_then(|s| s.get("checked"))
        .and_then(Value::as_array)
        .unwrap_or_default()
        .iter()
        .filter_map(Value::as_str)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigableOptions {
    /// Also list immersive sections themselves, before their columns
    pub with_immersive_section: bool,
    /// List every item, not only the ones checked as visible
    pub include_always: bool,
}

impl Default for NavigableOptions {
    fn default() -> Self {
        Self {
            with_immersive_section: false,
            include_always: true,
        }
    }
}

/// Flat list of what a reader steps through: plain sections, and the
/// columns of immersive sections (tagged with their `sectionId`)
pub fn navigable_items(state: &StoryState, options: NavigableOptions) -> Vec<Value> {
    let visible = visible_items(state);
    let shown = |node: &Value| options.include_always || node.id().map_or(false, |id| visible.contains(id));

    let mut items = Vec::new();
    for section in sections_selector(state) {
        match section.node_type() {
            Some("title") | Some("paragraph") | Some("banner") if shown(section) => {
                items.push(section.clone());
            }
            Some("immersive") => {
                if options.with_immersive_section {
                    items.push(section.clone());
                }
                let columns = section
                    .get("contents")
                    .and_then(Value::as_array)
                    .unwrap_or_default();
                for column in columns.iter().filter(|c| shown(*c)) {
                    let mut column = column.clone();
                    if let (Some(map), Some(section_id)) = (column.object_mut(), section.id()) {
                        map.insert("sectionId".to_string(), Value::from(section_id));
                    }
                    items.push(column);
                }
            }
            _ => {}
        }
    }
    items
}

pub fn total_items_selector(state: &StoryState) -> usize {
    navigable_items(state, NavigableOptions::default()).len()
}

/// Position of the current page among the navigable items
pub fn current_position_selector(state: &StoryState) -> Option<usize> {
    let page = &state.current_page;
    let current = page
        .section_id
        .as_ref()
        .and_then(|section| page.columns.get(section))
        .or(page.section_id.as_ref())?;
    navigable_items(state, NavigableOptions::default())
        .iter()
        .position(|item| item.id() == Some(current.as_str()))
}

/// Entry of the settings panel checkbox tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsItem {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<SettingsItem>>,
}

fn settings_item(node: &Value) -> SettingsItem {
    SettingsItem {
        label: node.get("title").and_then(Value::as_str).unwrap_or_default().to_string(),
        value: node.id().unwrap_or_default().to_string(),
        children: None,
    }
}

pub fn settings_items_selector(state: &StoryState) -> Vec<SettingsItem> {
    sections_selector(state)
        .iter()
        .map(|section| {
            let mut item = settings_item(section);
            if section.node_type() == Some("immersive") {
                let columns = section
                    .get("contents")
                    .and_then(Value::as_array)
                    .unwrap_or_default();
                item.children = Some(columns.iter().map(settings_item).collect());
            }
            item
        })
        .collect()
}

//! # Story Document Store
//!
//! Owns the edited story and the builder state around it. Every change
//! goes through [`StoryStore::dispatch`] (or one of the named shortcuts),
//! which replaces `current_story` with a new tree built by the mutations
//! module. Nothing edits the tree in place, so a consumer can detect
//! changes with [`Value::same`].

use crate::actions::{Action, FocusedContent, MediaType, Mode, StoryResource};
use crate::errors::EditorError;
use crate::mutations::{Mutation, Position, UpdateMode};
use crate::references::resource_references;
use crate::tree::{remove_at, set_at, set_creating};
use geostory_common::Value;
use geostory_parser::{effective_keys, Key, PathCache};
use indexmap::IndexMap;
use serde::Serialize;

/// Where the reader currently is
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPage {
    pub section_id: Option<String>,
    /// Current column of each immersive section, by section id
    pub columns: IndexMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Errors {
    pub save: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryState {
    pub mode: Mode,
    pub current_story: Value,
    pub current_page: CurrentPage,
    pub is_collapsed: bool,
    pub loading: bool,
    pub load_flags: IndexMap<String, bool>,
    pub errors: Errors,
    pub resource: Option<StoryResource>,
    pub controls: IndexMap<String, Value>,
    pub focused_content: Option<FocusedContent>,
    pub selected_card: String,
    pub is_settings_enabled: bool,
    pub old_settings: Value,
    pub default_settings: Value,
    pub pending_changes: bool,
    pub update_url_on_scroll: bool,
}

impl StoryState {
    pub fn new() -> Self {
        Self {
            current_story: Value::object(),
            old_settings: Value::object(),
            ..Self::default()
        }
    }
}

/// Single owner of the story state
#[derive(Debug)]
pub struct StoryStore {
    state: StoryState,
    paths: PathCache,
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(false, |n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

impl Default for StoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoryStore {
    pub fn new() -> Self {
        Self {
            state: StoryState::new(),
            paths: PathCache::new(),
        }
    }

    /// Store whose stories fall back to `settings` when they carry none
    pub fn with_default_settings(settings: Value) -> Self {
        let mut store = Self::new();
        store.state.default_settings = settings;
        store
    }

    /// Store already holding `story`
    pub fn from_story(story: Value) -> Self {
        let mut store = Self::new();
        store.set_current_story(story);
        store
    }

    /// Store holding a story read from JSON text
    pub fn from_json(source: &str) -> Result<Self, EditorError> {
        let story: Value = serde_json::from_str(source)?;
        Ok(Self::from_story(story))
    }

    pub fn state(&self) -> &StoryState {
        &self.state
    }

    pub fn current_story(&self) -> &Value {
        &self.state.current_story
    }

    pub fn paths(&self) -> &PathCache {
        &self.paths
    }

    /// Reduce one action into the state.
    ///
    /// Actions that only drive orchestration workflows leave the state
    /// untouched.
    pub fn dispatch(&mut self, action: &Action) -> Result<(), EditorError> {
        match action {
            Action::Add { .. }
            | Action::Update { .. }
            | Action::Remove { .. }
            | Action::Move { .. } => {
                if let Some(mutation) = action.mutation() {
                    self.apply(&mutation)?;
                }
            }
            Action::SetCurrentStory { story } => self.set_current_story(story.clone()),
            Action::ChangeMode { mode } => self.state.mode = *mode,
            Action::UpdateCurrentPage {
                section_id,
                column_id,
            } => self.update_current_page(section_id.as_deref(), column_id.as_deref()),
            Action::AddResource {
                id,
                media_type,
                data,
            } => self.add_resource(id, *media_type, data),
            Action::EditResource {
                id,
                media_type,
                data,
            } => self.edit_resource(id, *media_type, data),
            Action::RemoveResource { id, media_type } => self.remove_resource(id, *media_type),
            Action::SetResource { resource } => self.set_resource(resource.clone()),
            Action::LoadingGeostory { value, name } => self.loading_geostory(*value, name),
            Action::SaveGeostoryError { error } => self.save_geostory_error(error.clone()),
            Action::StorySaved { .. } | Action::ClearSaveError => self.story_saved(),
            Action::SetPendingChanges { value } => self.state.pending_changes = *value,
            Action::SetUpdateUrlScroll { value } => self.state.update_url_on_scroll = *value,
            Action::SetControl { control, value } => {
                self.state.controls.insert(control.clone(), value.clone());
            }
            Action::ToggleCardPreview => self.state.is_collapsed = !self.state.is_collapsed,
            Action::SelectCard { card } => {
                self.state.selected_card = if self.state.selected_card == *card {
                    String::new()
                } else {
                    card.clone()
                };
            }
            Action::ToggleSetting { option } => {
                let current = self.setting(option).cloned();
                self.write_setting(option, Value::Bool(!is_truthy(current.as_ref())));
            }
            Action::UpdateSetting { prop, value } => self.write_setting(prop, value.clone()),
            Action::ToggleSettingsPanel { with_save } => self.toggle_settings_panel(*with_save),
            Action::ToggleContentFocus { status, focus } => {
                self.state.focused_content = if *status {
                    Some(focus.clone().unwrap_or_default())
                } else {
                    None
                };
            }
            _ => {}
        }
        Ok(())
    }

    /// Apply a structural mutation to the current story
    pub fn apply(&mut self, mutation: &Mutation) -> Result<(), EditorError> {
        let next = mutation.apply(&self.state.current_story, &self.paths)?;
        self.state.current_story = next;
        Ok(())
    }

    /// Replace the whole story; clears errors
    pub fn set_current_story(&mut self, mut story: Value) {
        let needs_defaults = story.is_object()
            && story.get("settings").is_none()
            && self.state.default_settings.is_object();
        if needs_defaults {
            if let Some(map) = story.object_mut() {
                map.insert("settings".to_string(), self.state.default_settings.clone());
            }
        }
        self.state.current_story = story;
        self.state.errors = Errors::default();
    }

    pub fn set_editing(&mut self, editing: bool) {
        self.state.mode = if editing { Mode::Edit } else { Mode::View };
    }

    pub fn add(
        &mut self,
        path: &str,
        position: Option<Position>,
        element: Value,
    ) -> Result<(), EditorError> {
        self.apply(&Mutation::add(path, position, element))
    }

    pub fn update(&mut self, path: &str, element: Value, mode: UpdateMode) -> Result<(), EditorError> {
        self.apply(&Mutation::update(path, element, mode))
    }

    pub fn remove(&mut self, path: &str) -> Result<(), EditorError> {
        self.apply(&Mutation::remove(path))
    }

    pub fn move_node(
        &mut self,
        source: &str,
        target: &str,
        position: Option<Position>,
    ) -> Result<(), EditorError> {
        self.apply(&Mutation::move_to(source, target, position))
    }

    /// Track the page in view.
    ///
    /// A column is only recorded when it belongs to a section of the live
    /// story; otherwise the section pointer is replaced.
    pub fn update_current_page(&mut self, section_id: Option<&str>, column_id: Option<&str>) {
        match column_id {
            Some(column_id) => {
                let owner = self
                    .state
                    .current_story
                    .get("sections")
                    .and_then(Value::as_array)
                    .unwrap_or_default()
                    .iter()
                    .find(|section| {
                        section
                            .get("contents")
                            .and_then(Value::as_array)
                            .map_or(false, |contents| {
                                contents.iter().any(|c| c.id() == Some(column_id))
                            })
                    })
                    .and_then(Value::id);
                if let Some(owner) = owner {
                    self.state
                        .current_page
                        .columns
                        .insert(owner.to_string(), column_id.to_string());
                }
            }
            None => self.state.current_page.section_id = section_id.map(String::from),
        }
    }

    pub fn loading_geostory(&mut self, value: bool, name: &str) {
        self.state.loading = value;
        self.state.load_flags.insert(name.to_string(), value);
    }

    /// Record save errors (a single error or a list)
    pub fn save_geostory_error(&mut self, error: Value) {
        let errors = match error.as_array() {
            Some(items) => items.to_vec(),
            None => vec![error],
        };
        self.state.errors.save = Some(errors);
    }

    pub fn story_saved(&mut self) {
        self.state.errors.save = None;
    }

    fn resources(&self) -> &[Value] {
        self.state
            .current_story
            .get("resources")
            .and_then(Value::as_array)
            .unwrap_or_default()
    }

    fn replace_resources(&mut self, resources: Vec<Value>) {
        let key = [Key::Property("resources".to_string())];
        if let Some(next) = set_at(&self.state.current_story, &key, Value::array(resources)) {
            self.state.current_story = next;
        }
    }

    /// Prepend a media resource
    pub fn add_resource(&mut self, id: &str, media_type: MediaType, data: &Value) {
        let mut resources = vec![resource_value(id, media_type, data)];
        resources.extend(self.resources().iter().cloned());
        self.replace_resources(resources);
    }

    /// Replace a media resource; map edits drop custom map settings of its users
    pub fn edit_resource(&mut self, id: &str, media_type: MediaType, data: &Value) {
        let resources = self.resources();
        if !resources.iter().any(|r| r.id() == Some(id)) {
            tracing::debug!(resource = id, "edited resource not found");
            return;
        }
        let replaced: Vec<Value> = resources
            .iter()
            .map(|r| {
                if r.id() == Some(id) {
                    resource_value(id, media_type, data)
                } else {
                    r.clone()
                }
            })
            .collect();
        self.replace_resources(replaced);

        if media_type == MediaType::Map {
            self.unset_on_references(id, &["map"]);
        }
    }

    /// Remove a media resource and unlink its users
    pub fn remove_resource(&mut self, id: &str, media_type: MediaType) {
        let kept: Vec<Value> = self
            .resources()
            .iter()
            .filter(|r| r.id() != Some(id))
            .cloned()
            .collect();
        self.replace_resources(kept);

        let fields: &[&str] = match media_type {
            MediaType::Map => &["resourceId", "map"],
            _ => &["resourceId"],
        };
        self.unset_on_references(id, fields);
    }

    fn unset_on_references(&mut self, resource_id: &str, fields: &[&str]) {
        let mut story = self.state.current_story.clone();
        for path in resource_references(&story, resource_id) {
            for field in fields {
                let field_path = path.clone().child(*field);
                let removed = effective_keys(&story, &field_path)
                    .and_then(|keys| remove_at(&story, &keys));
                if let Some(next) = removed {
                    story = next;
                }
            }
        }
        self.state.current_story = story;
    }

    /// Keep the persisted story resource; its name becomes the default title
    pub fn set_resource(&mut self, resource: StoryResource) {
        let has_title = is_truthy(self.setting("storyTitle"));
        if !has_title {
            if let Some(name) = resource.name.clone() {
                self.write_setting("storyTitle", Value::from(name));
            }
        }
        self.state.resource = Some(resource);
    }

    fn setting(&self, prop: &str) -> Option<&Value> {
        prop.split('.')
            .try_fold(self.state.current_story.get("settings")?, |node, name| {
                node.get(name)
            })
    }

    fn write_setting(&mut self, prop: &str, value: Value) {
        let mut names = vec!["settings"];
        names.extend(prop.split('.'));
        match set_creating(&self.state.current_story, &names, value) {
            Some(next) => self.state.current_story = next,
            None => tracing::debug!(prop, "setting not writable"),
        }
    }

    /// Opening snapshots the settings; closing without save restores them
    fn toggle_settings_panel(&mut self, with_save: bool) {
        let opening = !self.state.is_settings_enabled;
        let settings = self
            .state
            .current_story
            .get("settings")
            .cloned()
            .unwrap_or_else(Value::object);

        let restored = if opening || with_save {
            settings.clone()
        } else {
            self.state.old_settings.clone()
        };

        self.state.is_settings_enabled = opening;
        self.state.old_settings = if opening { settings } else { Value::object() };
        if let Some(next) = set_creating(&self.state.current_story, &["settings"], restored) {
            self.state.current_story = next;
        }
    }
}

fn resource_value(id: &str, media_type: MediaType, data: &Value) -> Value {
    crate::actions::MediaResource {
        id: id.to_string(),
        media_type,
        data: data.clone(),
    }
    .to_value()
}

//! Action catalog.
//!
//! Plain data records exchanged between the UI, the store and the
//! orchestration workflows. Serialized as `{"type": "ADD", ...}`.

use crate::mutations::{MergeOptions, Mutation, Position, UpdateMode};
use geostory_common::{ensure_id, Value};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    View,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Map,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Map => "map",
        }
    }
}

/// Persisted resource holding the whole story (not a media resource)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default)]
    pub can_delete: bool,
}

/// Media resource as stored in `resources`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaResource {
    pub id: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(default)]
    pub data: Value,
}

impl MediaResource {
    pub fn to_value(&self) -> Value {
        let mut map = geostory_common::Map::new();
        map.insert("id".to_string(), Value::from(self.id.as_str()));
        map.insert("type".to_string(), Value::from(self.media_type.as_str()));
        map.insert("data".to_string(), self.data.clone());
        Value::from(map)
    }
}

/// Content with exclusive focus in the builder
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusedContent {
    #[serde(default)]
    pub target: Value,
    #[serde(default)]
    pub selector: String,
    #[serde(default)]
    pub hide_content: bool,
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Action {
    // Story tree
    Add {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Position>,
        element: Value,
    },
    Update {
        path: String,
        element: Value,
        #[serde(default)]
        mode: UpdateMode,
        #[serde(default)]
        options: MergeOptions,
    },
    Remove {
        path: String,
    },
    Move {
        source: String,
        target: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        position: Option<Position>,
    },
    SetCurrentStory {
        story: Value,
    },
    ChangeMode {
        mode: Mode,
    },
    UpdateCurrentPage {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        section_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        column_id: Option<String>,
    },

    // Media resources of the story
    AddResource {
        id: String,
        media_type: MediaType,
        data: Value,
    },
    EditResource {
        id: String,
        media_type: MediaType,
        data: Value,
    },
    RemoveResource {
        id: String,
        media_type: MediaType,
    },
    SetResource {
        resource: StoryResource,
    },

    // Load / save
    LoadGeostory {
        id: String,
    },
    LoadingGeostory {
        value: bool,
        name: String,
    },
    LoadGeostoryError {
        message_id: String,
    },
    GeostoryLoaded {
        id: String,
    },
    SaveStory {
        resource: StoryResource,
    },
    StorySaved {
        id: String,
    },
    SaveGeostoryError {
        error: Value,
    },
    ClearSaveError,
    SetPendingChanges {
        value: bool,
    },

    // Builder UI
    SetControl {
        control: String,
        value: Value,
    },
    ToggleCardPreview,
    SelectCard {
        card: String,
    },
    ToggleSetting {
        option: String,
    },
    UpdateSetting {
        prop: String,
        value: Value,
    },
    ToggleSettingsPanel {
        #[serde(default)]
        with_save: bool,
    },
    ToggleContentFocus {
        status: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        focus: Option<FocusedContent>,
    },
    SetUpdateUrlScroll {
        value: bool,
    },

    // Media editor
    ShowMediaEditor {
        owner: String,
    },
    HideMediaEditor,
    ChooseMedia {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        resource: Option<MediaResource>,
    },
    EditMedia {
        path: String,
        owner: String,
    },
    SelectItem {
        id: String,
    },
    SetMediaType {
        media_type: MediaType,
    },
    LoadMedia {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        media_type: Option<MediaType>,
    },
    LoadMediaSuccess {
        media_type: MediaType,
        source_id: String,
        resources: Vec<MediaResource>,
        total_count: usize,
    },
    SaveMedia {
        media_type: MediaType,
        data: Value,
    },
    SaveMediaSuccess {
        media_type: MediaType,
        source_id: String,
        id: String,
    },
    RemoveMedia {
        media_type: MediaType,
        id: String,
    },
    EditingMedia {
        editing: bool,
    },

    // Session and routing
    LoginSuccess {
        user: String,
    },
    Logout,
    LocationChange {
        pathname: String,
    },
}

impl Action {
    /// `ADD`; object elements get their id here so callers know it upfront
    pub fn add(path: impl Into<String>, position: Option<Position>, element: Value) -> Self {
        Action::Add {
            path: path.into(),
            position,
            element: ensure_id(element),
        }
    }

    /// Give the element of an `ADD` an id when it has none, whichever way
    /// the action was built
    pub fn with_element_id(self) -> Self {
        match self {
            Action::Add {
                path,
                position,
                element,
            } => Action::Add {
                path,
                position,
                element: ensure_id(element),
            },
            other => other,
        }
    }

    pub fn update(path: impl Into<String>, element: Value, mode: UpdateMode) -> Self {
        Action::Update {
            path: path.into(),
            element,
            mode,
            options: MergeOptions::default(),
        }
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Action::Remove { path: path.into() }
    }

    pub fn move_to(
        source: impl Into<String>,
        target: impl Into<String>,
        position: Option<Position>,
    ) -> Self {
        Action::Move {
            source: source.into(),
            target: target.into(),
            position,
        }
    }

    pub fn set_current_story(story: Value) -> Self {
        Action::SetCurrentStory { story }
    }

    pub fn loading(value: bool, name: impl Into<String>) -> Self {
        Action::LoadingGeostory {
            value,
            name: name.into(),
        }
    }

    pub fn load(id: impl Into<String>) -> Self {
        Action::LoadGeostory { id: id.into() }
    }

    /// Structural mutation carried by this action, if any
    pub fn mutation(&self) -> Option<Mutation> {
        match self {
            Action::Add {
                path,
                position,
                element,
            } => Some(Mutation::Add {
                path: path.clone(),
                position: position.clone(),
                element: element.clone(),
            }),
            Action::Update {
                path,
                element,
                mode,
                options,
            } => Some(Mutation::Update {
                path: path.clone(),
                element: element.clone(),
                mode: *mode,
                options: options.clone(),
            }),
            Action::Remove { path } => Some(Mutation::Remove { path: path.clone() }),
            Action::Move {
                source,
                target,
                position,
            } => Some(Mutation::Move {
                source: source.clone(),
                target: target.clone(),
                position: position.clone(),
            }),
            _ => None,
        }
    }

    /// Whether this action edits the story content (tracked as a pending change)
    pub fn is_story_edit(&self) -> bool {
        matches!(
            self,
            Action::Add { .. }
                | Action::Update { .. }
                | Action::Remove { .. }
                | Action::Move { .. }
                | Action::AddResource { .. }
                | Action::EditResource { .. }
                | Action::UpdateSetting { .. }
        )
    }
}

impl From<Mutation> for Action {
    fn from(mutation: Mutation) -> Self {
        match mutation {
            Mutation::Add {
                path,
                position,
                element,
            } => Action::Add {
                path,
                position,
                element,
            },
            Mutation::Update {
                path,
                element,
                mode,
                options,
            } => Action::Update {
                path,
                element,
                mode,
                options,
            },
            Mutation::Remove { path } => Action::Remove { path },
            Mutation::Move {
                source,
                target,
                position,
            } => Action::Move {
                source,
                target,
                position,
            },
        }
    }
}

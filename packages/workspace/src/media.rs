//! Media sources and the media editor state.
//!
//! A media source lists, stores and deletes media resources. The built-in
//! `geostory` source keeps them inside the story's own `resources` array,
//! so it works through the same actions as any other story edit.

use async_trait::async_trait;
use geostory_common::{new_id, Value};
use geostory_editor::{Action, MediaResource, MediaType};
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

use crate::services::ServiceError;

/// Source storing media inside the story
pub const GEOSTORY_SOURCE: &str = "geostory";

/// What a media source may read from and do to the edited story
pub trait StoryHandle: Send + Sync {
    fn story(&self) -> Value;
    fn dispatch(&self, action: Action);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaQuery {
    pub media_type: MediaType,
    /// 1-based
    pub page: usize,
    pub page_size: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaPage {
    pub resources: Vec<MediaResource>,
    pub total_count: usize,
}

#[async_trait]
pub trait MediaService: Send + Sync {
    async fn load(&self, story: &dyn StoryHandle, query: MediaQuery) -> Result<MediaPage, ServiceError>;
    /// Store a new resource, returns its id
    async fn save(&self, story: &dyn StoryHandle, media_type: MediaType, data: Value) -> Result<String, ServiceError>;
    async fn edit(
        &self,
        story: &dyn StoryHandle,
        media_type: MediaType,
        id: &str,
        data: Value,
    ) -> Result<String, ServiceError>;
    async fn remove(&self, story: &dyn StoryHandle, media_type: MediaType, id: &str) -> Result<String, ServiceError>;
}

/// Media sources by id
#[derive(Clone)]
pub struct MediaRegistry {
    sources: IndexMap<String, Arc<dyn MediaService>>,
}

impl MediaRegistry {
    /// Registry without any source, not even `geostory`
    pub fn empty() -> Self {
        Self {
            sources: IndexMap::new(),
        }
    }

    pub fn register(&mut self, id: impl Into<String>, service: Arc<dyn MediaService>) {
        self.sources.insert(id.into(), service);
    }

    pub fn get(&self, id: &str) -> Result<Arc<dyn MediaService>, ServiceError> {
        self.sources
            .get(id)
            .cloned()
            .ok_or_else(|| ServiceError::UnknownSource(id.to_string()))
    }

    pub fn source_ids(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }
}

impl Default for MediaRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(GEOSTORY_SOURCE, Arc::new(GeostoryMedia));
        registry
    }
}

impl std::fmt::Debug for MediaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.sources.keys()).finish()
    }
}

/// Media kept in the story's `resources`
#[derive(Debug, Clone, Copy, Default)]
pub struct GeostoryMedia;

fn story_resources(story: &Value, media_type: MediaType) -> Vec<MediaResource> {
    story
        .get("resources")
        .and_then(Value::as_array)
        .unwrap_or_default()
        .iter()
        .filter_map(|resource| serde_json::from_value::<MediaResource>(resource.to_json()).ok())
        .filter(|resource| resource.media_type == media_type)
        .collect()
}

#[async_trait]
impl MediaService for GeostoryMedia {
    async fn load(&self, story: &dyn StoryHandle, query: MediaQuery) -> Result<MediaPage, ServiceError> {
        let resources = story_resources(&story.story(), query.media_type);
        let total_count = resources.len();
        let start = query.page.saturating_sub(1) * query.page_size;
        Ok(MediaPage {
            resources: resources.into_iter().skip(start).take(query.page_size).collect(),
            total_count,
        })
    }

    async fn save(&self, story: &dyn StoryHandle, media_type: MediaType, data: Value) -> Result<String, ServiceError> {
        let id = new_id();
        story.dispatch(Action::AddResource {
            id: id.clone(),
            media_type,
            data,
        });
        Ok(id)
    }

    async fn edit(
        &self,
        story: &dyn StoryHandle,
        media_type: MediaType,
        id: &str,
        data: Value,
    ) -> Result<String, ServiceError> {
        story.dispatch(Action::EditResource {
            id: id.to_string(),
            media_type,
            data,
        });
        Ok(id.to_string())
    }

    async fn remove(&self, story: &dyn StoryHandle, media_type: MediaType, id: &str) -> Result<String, ServiceError> {
        story.dispatch(Action::RemoveResource {
            id: id.to_string(),
            media_type,
        });
        Ok(id.to_string())
    }
}

/// State of the media picking surface
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaEditorState {
    pub open: bool,
    pub owner: Option<String>,
    pub source_id: String,
    pub media_type: MediaType,
    pub selected: Option<String>,
    pub editing: bool,
    pub resources: Vec<MediaResource>,
    pub total_count: usize,
}

impl Default for MediaEditorState {
    fn default() -> Self {
        Self {
            open: false,
            owner: None,
            source_id: GEOSTORY_SOURCE.to_string(),
            media_type: MediaType::Image,
            selected: None,
            editing: false,
            resources: Vec::new(),
            total_count: 0,
        }
    }
}

impl MediaEditorState {
    pub fn reduce(&mut self, action: &Action) {
        match action {
            Action::ShowMediaEditor { owner } => {
                self.open = true;
                self.owner = Some(owner.clone());
            }
            Action::HideMediaEditor | Action::ChooseMedia { .. } => {
                self.open = false;
                self.owner = None;
                self.editing = false;
            }
            Action::SelectItem { id } => self.selected = Some(id.clone()),
            Action::SetMediaType { media_type } => {
                if self.media_type != *media_type {
                    self.media_type = *media_type;
                    self.selected = None;
                }
            }
            Action::LoadMediaSuccess {
                media_type,
                source_id,
                resources,
                total_count,
            } => {
                if *media_type == self.media_type && *source_id == self.source_id {
                    self.resources = resources.clone();
                    self.total_count = *total_count;
                }
            }
            Action::EditingMedia { editing } => self.editing = *editing,
            _ => {}
        }
    }

    pub fn selected_resource(&self) -> Option<&MediaResource> {
        let selected = self.selected.as_deref()?;
        self.resources.iter().find(|resource| resource.id == selected)
    }
}

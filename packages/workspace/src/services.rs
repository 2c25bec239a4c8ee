//! Collaborators the workflows talk to.
//!
//! The engine never reaches the network, the page or the browser history
//! directly. Hosts plug their own implementations in through [`Services`];
//! the headless ones below are enough to run the engine from a terminal.

use crate::media::MediaRegistry;
use async_trait::async_trait;
use geostory_common::Value;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("Request failed with status {0}")]
    Status(u16),

    #[error("Malformed payload: {0}")]
    Payload(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("No media source named {0}")]
    UnknownSource(String),
}

impl ServiceError {
    /// HTTP-like status of the failure, when there is one
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Status(status) => Some(*status),
            _ => None,
        }
    }
}

/// Stored story as exchanged with the persistence backend.
///
/// `data` is either the story itself or its JSON text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedResource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default)]
    pub can_delete: bool,
}

#[async_trait]
pub trait Persistence: Send + Sync {
    async fn create_resource(&self, resource: PersistedResource) -> Result<String, ServiceError>;
    async fn update_resource(&self, resource: PersistedResource) -> Result<String, ServiceError>;
    async fn get_resource(&self, id: &str) -> Result<PersistedResource, ServiceError>;
}

/// Stories shipped as configuration files rather than stored resources
#[async_trait]
pub trait StaticStories: Send + Sync {
    /// Story (or its JSON text) for a configuration name
    async fn fetch(&self, id: &str) -> Result<Value, ServiceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Warning,
    Error,
}

/// User-visible toast; `message` is a message id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub level: Level,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
    fn prompt_login(&self);
}

pub trait Router: Send + Sync {
    fn navigate(&self, path: &str);
    /// Swap the current route without adding a history entry
    fn replace(&self, path: &str);
    fn go_home(&self);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollAlign {
    Start,
    #[default]
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOptions {
    pub smooth: bool,
    pub align: ScrollAlign,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            smooth: true,
            align: ScrollAlign::Center,
        }
    }
}

/// The rendered page
pub trait Dom: Send + Sync {
    fn element_exists(&self, id: &str) -> bool;
    fn scroll_to_element(&self, id: &str, options: ScrollOptions);
}

/// Everything the engine calls out to
#[derive(Clone)]
pub struct Services {
    pub persistence: Arc<dyn Persistence>,
    pub stories: Arc<dyn StaticStories>,
    pub media: MediaRegistry,
    pub notifier: Arc<dyn Notifier>,
    pub router: Arc<dyn Router>,
    pub dom: Arc<dyn Dom>,
}

impl Services {
    /// Terminal setup: static stories from `stories_dir`, no backend, no page
    pub fn headless(stories_dir: impl Into<PathBuf>) -> Self {
        Self {
            persistence: Arc::new(NoPersistence),
            stories: Arc::new(FileStories::new(stories_dir)),
            media: MediaRegistry::default(),
            notifier: Arc::new(LogNotifier),
            router: Arc::new(MemoryRouter::default()),
            dom: Arc::new(HeadlessDom),
        }
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").field("media", &self.media).finish_non_exhaustive()
    }
}

/// Reads `<dir>/<id>.json`
#[derive(Debug, Clone)]
pub struct FileStories {
    dir: PathBuf,
}

impl FileStories {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn story_path(&self, id: &str) -> Result<PathBuf, ServiceError> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            && !id.starts_with('.');
        if valid {
            Ok(self.dir.join(format!("{}.json", id)))
        } else {
            Err(ServiceError::Status(404))
        }
    }
}

#[async_trait]
impl StaticStories for FileStories {
    async fn fetch(&self, id: &str) -> Result<Value, ServiceError> {
        let path = self.story_path(id)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Value::from(text)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(ServiceError::Status(404)),
            Err(err) => Err(ServiceError::Io(format!("{}: {}", path.display(), err))),
        }
    }
}

/// No backend: every stored story is missing, nothing can be saved
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPersistence;

#[async_trait]
impl Persistence for NoPersistence {
    async fn create_resource(&self, _resource: PersistedResource) -> Result<String, ServiceError> {
        Err(ServiceError::Status(503))
    }

    async fn update_resource(&self, _resource: PersistedResource) -> Result<String, ServiceError> {
        Err(ServiceError::Status(503))
    }

    async fn get_resource(&self, _id: &str) -> Result<PersistedResource, ServiceError> {
        Err(ServiceError::Status(404))
    }
}

/// Sends notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Error | Level::Warning => {
                tracing::warn!(title = %notification.title, message = %notification.message, "notification")
            }
            Level::Success => {
                tracing::info!(title = %notification.title, message = %notification.message, "notification")
            }
        }
    }

    fn prompt_login(&self) {
        tracing::info!("login required");
    }
}

/// Keeps the route in memory
#[derive(Debug, Default)]
pub struct MemoryRouter {
    history: Mutex<Vec<String>>,
}

impl MemoryRouter {
    pub fn current(&self) -> Option<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Router for MemoryRouter {
    fn navigate(&self, path: &str) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
    }

    fn replace(&self, path: &str) {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        history.pop();
        history.push(path.to_string());
    }

    fn go_home(&self) {
        self.navigate("/");
    }
}

/// No page: every element counts as mounted, scrolling does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessDom;

impl Dom for HeadlessDom {
    fn element_exists(&self, _id: &str) -> bool {
        true
    }

    fn scroll_to_element(&self, id: &str, _options: ScrollOptions) {
        tracing::trace!(id, "scroll");
    }
}

//! # GeoStory Workspace
//!
//! Runs the workflows around a story being edited: loading and saving it,
//! attaching media, cleaning up emptied containers, tracking unsaved
//! changes and following the reader's position in the route.
//!
//! ```rust,ignore
//! use geostory_workspace::{Engine, EngineConfig, Services};
//!
//! let config = EngineConfig::load(".")?;
//! let engine = Engine::start(config.clone(), Services::headless(config.get_stories_dir(".")));
//! let phase = engine.load("sampleStory").await?;
//! ```

pub mod config;
pub mod engine;
mod epics;
pub mod media;
pub mod services;
pub mod state;
pub mod timer;

pub use config::{ConfigError, EngineConfig, DEFAULT_CONFIG_NAME};
pub use engine::{Engine, EngineError};
pub use epics::load_error_message;
pub use media::{
    GeostoryMedia, MediaEditorState, MediaPage, MediaQuery, MediaRegistry, MediaService, StoryHandle,
    GEOSTORY_SOURCE,
};
pub use services::{
    Dom, FileStories, HeadlessDom, Level, LogNotifier, MemoryRouter, NoPersistence, Notification, Notifier,
    Persistence, PersistedResource, Router, ScrollAlign, ScrollOptions, ServiceError, Services, StaticStories,
};
pub use state::{LoadPhase, Session};
pub use timer::{Debouncer, SwitchTask};

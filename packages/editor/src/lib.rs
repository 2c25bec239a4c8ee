//! # GeoStory Editor
//!
//! Story document editing engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: path string → Path → resolution     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: story state + mutations             │
//! │  - Add / Update / Remove / Move by path     │
//! │  - Reduce actions into StoryState           │
//! │  - Selectors over the state                 │
//! │  - Post-effects (empty container cleanup)   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ workspace: workflows reacting to actions    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Immutable tree**: every edit builds a new root, untouched branches
//!    are shared with the previous one
//! 2. **Fail-soft edits**: a path that does not match the document leaves it
//!    unchanged
//! 3. **One grammar**: selectors and mutations address nodes the same way
//!
//! ## Usage
//!
//! ```rust,ignore
//! use geostory_editor::{Action, StoryStore, UpdateMode};
//!
//! let mut store = StoryStore::from_json(&source)?;
//! store.dispatch(&Action::update(
//!     r#"sections[{"id":"intro"}].title"#,
//!     "Welcome".into(),
//!     UpdateMode::Replace,
//! ))?;
//! ```

mod actions;
mod errors;
mod mutations;
mod post_effects;
mod references;
pub mod selectors;
mod store;
mod tree;

pub use actions::{Action, FocusedContent, MediaResource, MediaType, Mode, StoryResource};
pub use errors::EditorError;
pub use mutations::{add, move_node, remove, update, MergeOptions, Mutation, Position, UpdateMode};
pub use post_effects::{empty_container_owner, moved_out_owner, CleanupEmptyContainers, PostEffect, PostEffectEngine};
pub use references::resource_references;
pub use store::{CurrentPage, Errors, StoryState, StoryStore};

// Re-export common types for convenience
pub use geostory_common::Value;
pub use geostory_parser::{Path, PathCache, PathSyntaxError};

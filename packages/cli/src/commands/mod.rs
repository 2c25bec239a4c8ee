pub mod apply;
pub mod check;
pub mod get;
pub mod init;
pub mod load;

pub use apply::{apply, ApplyArgs};
pub use check::{check, CheckArgs};
pub use get::{get, GetArgs};
pub use init::{init, InitArgs};
pub use load::{load, LoadArgs};

use anyhow::{anyhow, Context, Result};
use geostory_editor::StoryStore;
use std::fs;
use std::path::Path;

/// Read a story document into a fresh store
pub(crate) fn read_story(path: &Path) -> Result<StoryStore> {
    let source = fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    StoryStore::from_json(&source).map_err(|e| anyhow!("{}: {}", path.display(), e))
}

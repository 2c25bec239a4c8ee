//! Error types for the editor

use geostory_parser::PathSyntaxError;
use thiserror::Error;

/// Errors surfaced by the store.
///
/// Resolution misses are not errors: mutations on paths that do not match
/// the document are no-ops. Only malformed input reaches the caller.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Path error: {0}")]
    Path(#[from] PathSyntaxError),

    #[error("Invalid story document: {0}")]
    InvalidStory(#[from] serde_json::Error),
}

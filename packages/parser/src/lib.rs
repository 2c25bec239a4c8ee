//! # GeoStory Paths
//!
//! String path expressions addressing nodes of a story document, used the
//! same way for reading (selectors) and writing (mutations).
//!
//! ```rust,ignore
//! use geostory_parser::{parse, resolve};
//!
//! let path = parse(r#"sections[{"id":"intro"}].contents[0].html"#)?;
//! let html = resolve(&story, &path).value;
//! ```

pub mod ast;
pub mod cache;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod resolver;

pub use ast::{Key, Path, Segment};
pub use cache::PathCache;
#[cfg(feature = "pretty-errors")]
pub use error::format_error;
pub use error::{PathResult, PathSyntaxError};
pub use parser::{parse, Parser};
pub use resolver::{effective_keys, effective_path, get, resolve, Resolution};

pub mod id;
pub mod value;
pub mod visitor;

pub use id::*;
pub use value::*;
pub use visitor::*;

#[doc(hidden)]
pub use serde_json;

//! Handler traits behind registered tools and resources.
//!
//! The registry stores handlers as trait objects; the domains provide the
//! concrete tools and resources.

mod error;
mod resource;
mod tool;

pub use error::{ResourceError, ToolError};
pub use resource::{FnResourceHandler, ResourceHandler};
pub use tool::{FnToolHandler, NoArgs, ToolHandler};

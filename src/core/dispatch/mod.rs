//! Request dispatch.
//!
//! Resolves tool and resource identifiers against the registry, validates
//! arguments, and supervises handler execution.

mod dispatcher;
mod error;
mod schema;

pub use dispatcher::{DispatchOptions, Dispatcher};
pub use error::{BoxError, DispatchError, ErrorKind, HandlerAbort};
pub use schema::validate_arguments;

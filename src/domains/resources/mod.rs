//! Resources domain module.
//!
//! Resources are named, URI-addressed text payloads that MCP clients can
//! read. The bundled resources are the HTML apps the demo tools embed.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual resource definitions (one file per resource)
//! - `handlers.rs` - Handler serving a resource definition
//! - `registry.rs` - Central resource registration
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file in `definitions/` (e.g., `my_resource.rs`)
//! 2. Implement the `ResourceDefinition` trait
//! 3. Export in `definitions/mod.rs`
//! 4. Register in `registry.rs`

pub mod definitions;
mod handlers;
mod registry;

pub use definitions::ResourceDefinition;
pub use registry::get_all_resources;

//! Tools domain module.
//!
//! Tools are executable functions that MCP clients call by name. Each call
//! answers with a [`ContentEnvelope`](crate::core::content::ContentEnvelope).
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `registry.rs` - Central list of tools
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Define `NAME`, `DESCRIPTION`, `execute()` and `descriptor()`
//! 3. Export in `definitions/mod.rs`
//! 4. Add the descriptor in `registry.rs`

pub mod definitions;
mod registry;

pub use registry::get_all_tools;

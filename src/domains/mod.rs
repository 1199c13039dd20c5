//! Domains module containing business logic organized by bounded contexts.
//!
//! Each subdomain represents a specific area of functionality within the MCP
//! server: the tools clients call, the resources they read, and the host
//! services the tools draw on.

pub mod host;
pub mod resources;
pub mod tools;

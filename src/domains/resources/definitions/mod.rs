//! Resource definitions module.
//!
//! Each resource is defined in its own file with:
//! - URI and metadata
//! - A content function shared with any tool that embeds the resource
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file (e.g., `my_resource.rs`)
//! 2. Implement the `ResourceDefinition` trait
//! 3. Export it here
//! 4. Register in `registry.rs`

mod clock_ui;
mod dashboard_ui;

pub use clock_ui::ClockUiResource;
pub use dashboard_ui::DashboardUiResource;

use crate::core::content::Content;

/// MIME type of the bundled HTML apps.
pub const HTML_MIME_TYPE: &str = "text/html";

/// Trait for resource definitions.
///
/// Each resource must implement this trait to provide its metadata and content.
pub trait ResourceDefinition {
    /// The unique URI of the resource.
    const URI: &'static str;

    /// The display name of the resource.
    const NAME: &'static str;

    /// A description of the resource.
    const DESCRIPTION: &'static str;

    /// The MIME type of the resource content.
    const MIME_TYPE: &'static str;

    /// Render the current content of this resource.
    fn content() -> String;

    /// Render the resource as a content unit for embedding in a tool response.
    fn embedded() -> Content {
        Content::resource(Self::URI, Self::MIME_TYPE, Self::content())
    }
}

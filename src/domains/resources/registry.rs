//! Resource Registry - central list of all resources.
//!
//! When adding a new resource:
//! 1. Create the resource file in `definitions/`
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it here in `get_all_resources()`

use std::sync::Arc;

use crate::core::registry::ResourceDescriptor;

use super::definitions::{ClockUiResource, DashboardUiResource, ResourceDefinition};
use super::handlers::DefinitionHandler;

fn build_resource<R: ResourceDefinition + 'static>() -> ResourceDescriptor {
    ResourceDescriptor::new(R::URI, R::NAME, R::MIME_TYPE, Arc::new(DefinitionHandler::<R>::new()))
        .with_description(R::DESCRIPTION)
}

/// All static resources.
pub fn get_all_resources() -> Vec<ResourceDescriptor> {
    vec![
        build_resource::<ClockUiResource>(),
        build_resource::<DashboardUiResource>(),
    ]
}

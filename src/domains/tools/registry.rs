//! Tool Registry - central list of all tools.
//!
//! When adding a new tool:
//! 1. Create the tool file in `definitions/`
//! 2. Export it in `definitions/mod.rs`
//! 3. Add its descriptor in `get_all_tools()`

use crate::core::registry::ToolDescriptor;
use crate::domains::host::HostServices;

use super::definitions::{GetTimeTool, ShowDashboardTool};

/// All tools, bound to the given host services.
pub fn get_all_tools(services: &HostServices) -> Vec<ToolDescriptor> {
    vec![
        GetTimeTool::descriptor(services),
        ShowDashboardTool::descriptor(services),
    ]
}

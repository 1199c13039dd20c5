//! Tool definitions module.
//!
//! Each tool is defined in its own file with a `NAME`, a `DESCRIPTION`, an
//! `execute()` function holding the logic and a `descriptor()` that binds it
//! to the host services for registration.

mod get_time;
mod show_dashboard;

pub use get_time::GetTimeTool;
pub use show_dashboard::{DashboardSnapshot, ShowDashboardTool};

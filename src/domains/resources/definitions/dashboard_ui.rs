//! System metrics dashboard resource definition.

use super::{HTML_MIME_TYPE, ResourceDefinition};

/// System dashboard UI (static HTML).
pub struct DashboardUiResource;

impl ResourceDefinition for DashboardUiResource {
    const URI: &'static str = "ui://dashboard/dashboard.html";
    const NAME: &'static str = "dashboard-ui";
    const DESCRIPTION: &'static str = "System metrics dashboard with CPU, memory and traffic cards";
    const MIME_TYPE: &'static str = HTML_MIME_TYPE;

    fn content() -> String {
        DASHBOARD_HTML.to_string()
    }
}

const DASHBOARD_HTML: &str = include_str!("assets/dashboard.html");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_ui_metadata() {
        assert_eq!(DashboardUiResource::URI, "ui://dashboard/dashboard.html");
        assert_eq!(DashboardUiResource::MIME_TYPE, "text/html");
    }

    #[test]
    fn test_dashboard_ui_content() {
        let html = DashboardUiResource::content();
        assert!(html.contains("System Dashboard"));
        assert!(html.ends_with("</html>"));
    }
}

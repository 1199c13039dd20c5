//! Interactive clock app resource definition.

use super::{HTML_MIME_TYPE, ResourceDefinition};

/// Interactive clock UI (static HTML).
pub struct ClockUiResource;

impl ResourceDefinition for ClockUiResource {
    const URI: &'static str = "ui://get-time/clock.html";
    const NAME: &'static str = "clock-ui";
    const DESCRIPTION: &'static str =
        "Interactive clock app showing local time and fetching server time via the get-time tool";
    const MIME_TYPE: &'static str = HTML_MIME_TYPE;

    fn content() -> String {
        CLOCK_HTML.to_string()
    }
}

const CLOCK_HTML: &str = include_str!("assets/clock.html");

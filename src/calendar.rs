//! Contribution calendar widget mount.
//!
//! The calendar itself is drawn by the external `github-calendar` script, this
//! module only produces the code that starts it.

use serde::{Deserialize, Serialize};

pub const CALENDAR_ELEMENT_ID: &str = "github-calendar";

#[derive(Deserialize, Serialize, PartialEq, Eq, Copy, Clone, Debug)]
#[serde(default)]
pub struct CalendarOptions {
    pub responsive: bool,
    pub tooltips: bool,
    pub global_stats: bool,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        Self { responsive: true, tooltips: true, global_stats: false }
    }
}

#[derive(PartialEq, Clone, Debug)]
pub struct CalendarWidget<'a> {
    pub username: &'a str,
    pub options: CalendarOptions,
}

impl<'a> CalendarWidget<'a> {
    pub fn new(username: &'a str, options: CalendarOptions) -> Self {
        Self { username, options }
    }

    /// Script that starts the widget and, once it has loaded, removes the
    /// links it injects into the calendar container.
    pub fn bootstrap_script(&self) -> Result<String, serde_json::Error> {
        let selector = serde_json::to_string(&format!("#{CALENDAR_ELEMENT_ID}"))?;
        let element_id = serde_json::to_string(CALENDAR_ELEMENT_ID)?;
        let username = serde_json::to_string(self.username)?;
        let options = serde_json::to_string(&self.options)?;
        let script = format!(
            "GitHubCalendar({selector}, {username}, {options}).then(() => {{\n  \
               document.getElementById({element_id}).querySelectorAll(\"a\").forEach((link) => link.remove());\n\
             }});"
        );
        Ok(script)
    }

    /// The bootstrap script wrapped in a `<script>` element.
    pub fn script_element(&self) -> Result<String, serde_json::Error> {
        let script = self.bootstrap_script()?.replace("</", "<\\/");
        Ok(format!("<script>\n{script}\n</script>\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_script() {
        let widget = CalendarWidget::new("kafji", CalendarOptions::default());
        let script = widget.bootstrap_script().unwrap();
        assert!(script.starts_with(
            r##"GitHubCalendar("#github-calendar", "kafji", {"responsive":true,"tooltips":true,"global_stats":false}).then("##
        ));
        assert!(script.contains(r#"document.getElementById("github-calendar").querySelectorAll("a")"#));
        assert!(script.contains("link.remove()"));
    }

    #[test]
    fn test_username_is_quoted() {
        let widget = CalendarWidget::new("evil\"</script>", CalendarOptions::default());
        let element = widget.script_element().unwrap();
        assert!(element.contains(r#""evil\"<\/script>""#));
        assert_eq!(element.matches("</script>").count(), 1);
    }
}

//! The persisted application document.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Route;

/// Colour theme for the web UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Follow the browser's preference
    #[default]
    Auto,
    #[serde(alias = "chiaro")]
    Light,
    #[serde(alias = "scuro")]
    Dark,
}

impl Theme {
    /// All themes, in the order shown in the settings form.
    pub const ALL: [Theme; 3] = [Theme::Auto, Theme::Light, Theme::Dark];

    /// Stable identifier used in forms and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Auto => "auto",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Parse a form value, accepting the legacy Italian names too.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "auto" => Some(Theme::Auto),
            "light" | "chiaro" => Some(Theme::Light),
            "dark" | "scuro" => Some(Theme::Dark),
            _ => None,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
}

/// Root document: schedule image, routes and settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppData {
    /// File name of the uploaded schedule image, empty if none
    #[serde(default)]
    pub schedule_image_name: String,

    /// Routes keyed by their name
    #[serde(default)]
    pub routes: BTreeMap<String, Route>,

    #[serde(default)]
    pub settings: Settings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn default_document_shape() {
        let json = serde_json::to_value(AppData::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "schedule_image_name": "",
                "routes": {},
                "settings": { "theme": "auto" }
            })
        );
    }

    #[test]
    fn partial_document_uses_defaults() {
        let data: AppData = serde_json::from_str(r#"{"routes": {}}"#).unwrap();
        assert_eq!(data, AppData::default());
    }

    #[test]
    fn legacy_theme_names_load() {
        let data: AppData =
            serde_json::from_str(r#"{"settings": {"theme": "scuro"}}"#).unwrap();
        assert_eq!(data.settings.theme, Theme::Dark);

        let data: AppData =
            serde_json::from_str(r#"{"settings": {"theme": "chiaro"}}"#).unwrap();
        assert_eq!(data.settings.theme, Theme::Light);
    }

    #[test]
    fn full_document_loads() {
        let json = r#"{
            "schedule_image_name": "orario.png",
            "routes": {
                "Home → Terminal": { "line": "11A", "times": ["07:10", "08:00"] }
            },
            "settings": { "theme": "dark" }
        }"#;
        let data: AppData = serde_json::from_str(json).unwrap();

        assert_eq!(data.schedule_image_name, "orario.png");
        let route = &data.routes["Home → Terminal"];
        assert_eq!(route.line, "11A");
        assert_eq!(route.times[0], NaiveTime::from_hms_opt(7, 10, 0).unwrap());
        assert_eq!(data.settings.theme, Theme::Dark);
    }

    #[test]
    fn theme_parse() {
        assert_eq!(Theme::parse("auto"), Some(Theme::Auto));
        assert_eq!(Theme::parse("scuro"), Some(Theme::Dark));
        assert_eq!(Theme::parse("purple"), None);
        for theme in Theme::ALL {
            assert_eq!(Theme::parse(theme.as_str()), Some(theme));
        }
    }
}

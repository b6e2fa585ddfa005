//! Askama templates for the web frontend.

use askama::Template;
use chrono::{DateTime, FixedOffset};

use crate::domain::{Route, format_departure};
use crate::store::{AppData, Theme};

use super::dto::MAX_UPCOMING;

/// Format used for the header clock.
const CLOCK_FORMAT: &str = "%a %d/%m %H:%M";

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Home page: schedule image, routes and settings.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub theme: String,
    pub clock: String,
    pub notice: Option<Notice>,
    pub schedule_image_url: Option<String>,
    pub routes: Vec<RouteView>,
    pub themes: Vec<ThemeOption>,
    pub default_upcoming: usize,
    pub max_upcoming: usize,
}

impl IndexTemplate {
    /// Build the page for the current document.
    pub fn new(data: &AppData, notice: Option<Notice>, now: DateTime<FixedOffset>) -> Self {
        let current = data.settings.theme;

        Self {
            theme: current.to_string(),
            clock: format_clock(&now),
            notice,
            schedule_image_url: image_url(&data.schedule_image_name),
            routes: data
                .routes
                .iter()
                .map(|(name, route)| RouteView::from_route(name, route))
                .collect(),
            themes: Theme::ALL
                .iter()
                .map(|t| ThemeOption {
                    value: t.as_str(),
                    selected: *t == current,
                })
                .collect(),
            default_upcoming: crate::domain::DEFAULT_UPCOMING,
            max_upcoming: MAX_UPCOMING,
        }
    }
}

// ============================================================================
// Fragment Templates (AJAX responses, no base.html)
// ============================================================================

/// Next departures for one route.
#[derive(Template)]
#[template(path = "departures.html")]
pub struct DeparturesTemplate {
    pub departures: DeparturesView,
}

/// Next departures for two routes side by side.
#[derive(Template)]
#[template(path = "compare.html")]
pub struct CompareTemplate {
    /// The two routes, in the order they were asked for
    pub sides: Vec<DeparturesView>,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// A user-visible notification after a form action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// CSS modifier: "positive", "warning" or "negative"
    pub kind: &'static str,
    pub message: String,
}

impl Notice {
    pub fn positive(message: impl Into<String>) -> Self {
        Self {
            kind: "positive",
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: "warning",
            message: message.into(),
        }
    }

    pub fn negative(message: impl Into<String>) -> Self {
        Self {
            kind: "negative",
            message: message.into(),
        }
    }
}

/// Stored route view model.
#[derive(Debug, Clone)]
pub struct RouteView {
    pub name: String,
    pub line: String,
    pub times_text: String,
}

impl RouteView {
    pub fn from_route(name: &str, route: &Route) -> Self {
        Self {
            name: name.to_string(),
            line: route.line.clone(),
            times_text: route.times_text(),
        }
    }
}

/// Theme select option.
#[derive(Debug, Clone)]
pub struct ThemeOption {
    pub value: &'static str,
    pub selected: bool,
}

/// Upcoming departures view model.
#[derive(Debug, Clone)]
pub struct DeparturesView {
    pub name: String,
    pub line: String,
    pub departures: Vec<String>,
}

impl DeparturesView {
    /// Create from a route and its computed departures.
    pub fn from_route(name: &str, route: &Route, departures: &[DateTime<FixedOffset>]) -> Self {
        Self {
            name: name.to_string(),
            line: route.line.clone(),
            departures: departures.iter().map(format_departure).collect(),
        }
    }
}

/// Header clock text.
pub fn format_clock(now: &DateTime<FixedOffset>) -> String {
    format!("Current time: {}", now.format(CLOCK_FORMAT))
}

/// URL of the schedule image, if one has been uploaded.
fn image_url(file_name: &str) -> Option<String> {
    (!file_name.is_empty()).then(|| format!("/static/{file_name}"))
}

//! Bus routes and their validation.

use chrono::{DateTime, FixedOffset, NaiveTime};
use serde::{Deserialize, Serialize};

use super::error::RouteError;
use super::time::{format_times, hhmm, next_times, parse_times};

/// Label shown when a route has no bus line.
pub const NO_LINE: &str = "-";

fn default_line() -> String {
    NO_LINE.to_string()
}

/// A named travel leg's bus line and daily departure times.
///
/// `times` is sorted and unique when built through [`RouteDraft::validate`].
/// Documents loaded from disk are trusted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Display label for the bus line, e.g. "11A"
    #[serde(default = "default_line")]
    pub line: String,

    /// Daily departure times
    #[serde(default, with = "hhmm")]
    pub times: Vec<NaiveTime>,
}

impl Route {
    /// Create a route from already-validated parts.
    pub fn new(line: impl Into<String>, times: Vec<NaiveTime>) -> Self {
        Self {
            line: line.into(),
            times,
        }
    }

    /// Departure times as "HH:MM, HH:MM".
    pub fn times_text(&self) -> String {
        format_times(&self.times)
    }

    /// The next `n` departures after `from`.
    pub fn upcoming(&self, n: usize, from: DateTime<FixedOffset>) -> Vec<DateTime<FixedOffset>> {
        next_times(&self.times, n, from)
    }
}

/// Raw route input as typed by the user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteDraft {
    pub name: String,
    #[serde(default)]
    pub line: String,
    #[serde(default)]
    pub times: String,
}

impl RouteDraft {
    /// Validate the draft into a route name and route.
    ///
    /// The name and line are trimmed; a blank line becomes [`NO_LINE`].
    /// Malformed time tokens are dropped, and the draft is rejected only if
    /// nothing usable remains.
    pub fn validate(&self) -> Result<(String, Route), RouteError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(RouteError::MissingName);
        }

        let times = parse_times(&self.times);
        if times.is_empty() {
            return Err(RouteError::NoValidTimes);
        }

        let line = match self.line.trim() {
            "" => NO_LINE,
            line => line,
        };

        Ok((name.to_string(), Route::new(line, times)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, line: &str, times: &str) -> RouteDraft {
        RouteDraft {
            name: name.to_string(),
            line: line.to_string(),
            times: times.to_string(),
        }
    }

    fn t(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn valid_draft_is_trimmed_and_parsed() {
        let (name, route) = draft("  Home → Terminal ", " 11A ", "08:00 07:10")
            .validate()
            .unwrap();

        assert_eq!(name, "Home → Terminal");
        assert_eq!(route.line, "11A");
        assert_eq!(route.times, vec![t(7, 10), t(8, 0)]);
    }

    #[test]
    fn blank_line_defaults_to_dash() {
        let (_, route) = draft("Uni", "   ", "9:00").validate().unwrap();
        assert_eq!(route.line, NO_LINE);
    }

    #[test]
    fn blank_name_is_rejected() {
        assert_eq!(
            draft("  ", "11A", "08:00").validate(),
            Err(RouteError::MissingName)
        );
    }

    #[test]
    fn all_malformed_times_are_rejected() {
        assert_eq!(
            draft("Uni", "11A", "soon later 25:99").validate(),
            Err(RouteError::NoValidTimes)
        );
        assert_eq!(draft("Uni", "11A", "").validate(), Err(RouteError::NoValidTimes));
    }

    #[test]
    fn some_malformed_times_are_dropped() {
        let (_, route) = draft("Uni", "", "08:00 oops 09:15").validate().unwrap();
        assert_eq!(route.times, vec![t(8, 0), t(9, 15)]);
    }

    #[test]
    fn route_serializes_times_as_hhmm() {
        let route = Route::new("11A", vec![t(7, 5), t(18, 30)]);
        let json = serde_json::to_value(&route).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "line": "11A", "times": ["07:05", "18:30"] })
        );
    }

    #[test]
    fn route_deserializes_with_defaults_and_seconds() {
        let route: Route = serde_json::from_str(r#"{"times": ["07:05:00", "18:30"]}"#).unwrap();

        assert_eq!(route.line, NO_LINE);
        assert_eq!(route.times, vec![t(7, 5), t(18, 30)]);
    }

    #[test]
    fn route_drops_bad_stored_time() {
        let route: Route =
            serde_json::from_str(r#"{"line": "1", "times": ["7am", "08:15"]}"#).unwrap();
        assert_eq!(route.times, vec![t(8, 15)]);
    }

    #[test]
    fn times_text_matches_display_format() {
        let route = Route::new("11A", vec![t(7, 5), t(18, 30)]);
        assert_eq!(route.times_text(), "07:05, 18:30");
    }
}

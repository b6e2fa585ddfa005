//! Data transfer objects for web requests and responses.

use chrono::{DateTime, FixedOffset};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{DEFAULT_UPCOMING, Route, format_departure};
use crate::store::{StoreError, Theme};

/// Largest number of departures a query may ask for.
pub const MAX_UPCOMING: usize = 10;

/// Clamp a requested departure count to `1..=MAX_UPCOMING`.
pub fn upcoming_count(requested: Option<usize>) -> usize {
    requested
        .unwrap_or(DEFAULT_UPCOMING)
        .clamp(1, MAX_UPCOMING)
}

/// Read an optional count, treating a blank value (`n=`) as unset.
fn blank_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<usize>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| D::Error::custom(format!("invalid count {raw:?}: {e}"))),
        _ => Ok(None),
    }
}

/// Query for a single route's next departures.
#[derive(Debug, Deserialize)]
pub struct NextDeparturesRequest {
    /// Route name
    pub name: String,

    /// How many departures to show (defaults to 5)
    #[serde(default, deserialize_with = "blank_as_none")]
    pub n: Option<usize>,
}

/// Query comparing two routes, e.g. outbound and onward legs.
#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    pub first: String,

    #[serde(default)]
    pub second: String,

    #[serde(default, deserialize_with = "blank_as_none")]
    pub n: Option<usize>,
}

/// Form body naming a route to delete.
#[derive(Debug, Deserialize)]
pub struct DeleteRouteForm {
    pub name: String,
}

/// Settings form body; the theme is free text until validated.
#[derive(Debug, Deserialize)]
pub struct SettingsForm {
    pub theme: String,
}

/// JSON settings update.
#[derive(Debug, Deserialize)]
pub struct SettingsRequest {
    pub theme: Theme,
}

/// A stored route.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    pub name: String,

    /// Bus line label
    pub line: String,

    /// Daily departure times as HH:MM
    pub times: Vec<String>,
}

/// All stored routes.
#[derive(Debug, Serialize)]
pub struct RouteListResponse {
    pub routes: Vec<RouteResult>,
}

/// One upcoming departure.
#[derive(Debug, Serialize)]
pub struct DepartureResult {
    /// RFC 3339 instant with the local offset
    pub at: String,

    /// Human readable form, e.g. "Mon 02/09 23:00"
    pub display: String,
}

/// Next departures for one route.
#[derive(Debug, Serialize)]
pub struct NextDeparturesResponse {
    pub name: String,
    pub line: String,
    pub departures: Vec<DepartureResult>,
}

/// Next departures for two routes side by side.
#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub first: NextDeparturesResponse,
    pub second: NextDeparturesResponse,
}

/// Result of a mutation.
///
/// The change is always applied in memory; `saved` reports whether it also
/// reached disk.
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub saved: bool,

    /// Why the save failed, if it did
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Result of deleting a route.
#[derive(Debug, Serialize)]
pub struct DeleteRouteResponse {
    /// Whether a route with that name existed
    pub removed: bool,

    #[serde(flatten)]
    pub result: MutationResponse,
}

/// Result of uploading a schedule image.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Sanitized file name
    pub file_name: String,

    /// Where the image is served
    pub url: String,

    #[serde(flatten)]
    pub result: MutationResponse,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl RouteResult {
    /// Create from a stored route.
    pub fn from_route(name: &str, route: &Route) -> Self {
        Self {
            name: name.to_string(),
            line: route.line.clone(),
            times: route
                .times
                .iter()
                .map(|t| t.format("%H:%M").to_string())
                .collect(),
        }
    }
}

impl DepartureResult {
    pub fn from_instant(at: &DateTime<FixedOffset>) -> Self {
        Self {
            at: at.to_rfc3339(),
            display: format_departure(at),
        }
    }
}

impl NextDeparturesResponse {
    /// Create from a route and its computed departures.
    pub fn from_route(name: &str, route: &Route, departures: &[DateTime<FixedOffset>]) -> Self {
        Self {
            name: name.to_string(),
            line: route.line.clone(),
            departures: departures.iter().map(DepartureResult::from_instant).collect(),
        }
    }
}

impl MutationResponse {
    /// Create from the outcome of a store save.
    pub fn from_save(result: Result<(), StoreError>) -> Self {
        match result {
            Ok(()) => Self {
                saved: true,
                warning: None,
            },
            Err(e) => Self {
                saved: false,
                warning: Some(e.to_string()),
            },
        }
    }
}

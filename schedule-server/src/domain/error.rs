//! Domain error types.
//!
//! These errors describe why user input can't become a route. They are
//! distinct from storage and I/O errors.

/// Reasons a route draft fails validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// The route name was blank
    #[error("route name is required")]
    MissingName,

    /// None of the entered tokens was a valid HH:MM time
    #[error("no valid departure times (expected HH:MM)")]
    NoValidTimes,
}

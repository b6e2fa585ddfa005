//! Domain types for bus routes and departure times.
//!
//! These types are independent of storage and the web layer.

mod error;
mod route;
pub mod time;

pub use error::RouteError;
pub use route::{NO_LINE, Route, RouteDraft};
pub use time::{
    DEFAULT_UPCOMING, format_departure, format_times, next_times, now_local, parse_times,
};

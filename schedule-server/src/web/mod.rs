//! Web layer for the schedule server.
//!
//! Serves the HTML interface, JSON endpoints and uploaded images.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
pub use templates::*;

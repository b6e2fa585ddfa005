//! Persistent application state.
//!
//! The whole application state is one JSON document on disk, loaded at
//! startup and rewritten after every change. Uploaded schedule images live
//! next to it in a static asset directory.

mod assets;
mod document;
mod error;
mod file;

pub use assets::{AssetDir, sanitize_filename};
pub use document::{AppData, Settings, Theme};
pub use error::{StoreError, UploadError};
pub use file::{LoadOutcome, RouteStore, StoreConfig};

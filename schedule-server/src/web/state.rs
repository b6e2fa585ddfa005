//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::store::{AssetDir, RouteStore};

/// Shared application state.
///
/// The store sits behind a mutex so each handler's mutate-then-save runs
/// without interleaving with another request's.
#[derive(Clone)]
pub struct AppState {
    /// Routes, settings and schedule image name
    pub store: Arc<Mutex<RouteStore>>,

    /// Uploaded schedule images
    pub assets: Arc<AssetDir>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: RouteStore, assets: AssetDir) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            assets: Arc::new(assets),
        }
    }
}

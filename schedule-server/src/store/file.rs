//! JSON file backed route store.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::domain::Route;

use super::document::{AppData, Theme};
use super::error::StoreError;

/// Where the store reads and writes its document.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Primary document, rewritten on every change.
    pub path: PathBuf,
    /// Optional bundled document used when the primary is unusable.
    pub seed_path: Option<PathBuf>,
}

impl StoreConfig {
    /// Create a config for the given primary path with no seed.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            seed_path: None,
        }
    }

    /// Set a seed document.
    pub fn with_seed(mut self, seed_path: impl Into<PathBuf>) -> Self {
        self.seed_path = Some(seed_path.into());
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new("data.json").with_seed("seed.json")
    }
}

/// How the document was obtained at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Primary document read successfully
    Loaded,
    /// Primary unusable, seed document used and copied to the primary path
    FellBackToSeed,
    /// Neither primary nor seed usable, empty document used
    FellBackToDefault,
}

impl fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoadOutcome::Loaded => "loaded",
            LoadOutcome::FellBackToSeed => "fell back to seed",
            LoadOutcome::FellBackToDefault => "fell back to default",
        })
    }
}

/// In-memory application document mirrored to a JSON file.
///
/// Every mutation writes the whole document straight away. A failed write
/// is returned to the caller but the in-memory change is kept.
#[derive(Debug)]
pub struct RouteStore {
    config: StoreConfig,
    data: AppData,
}

impl RouteStore {
    /// Load the store, falling back to the seed or an empty document.
    ///
    /// Never fails: a missing or corrupt file is logged and replaced.
    pub fn load(config: StoreConfig) -> (Self, LoadOutcome) {
        let (data, outcome) = match read_document(&config.path) {
            Ok(data) => (data, LoadOutcome::Loaded),
            Err(reason) => {
                warn!(path = %config.path.display(), %reason, "primary document unusable");
                match config.seed_path.as_deref().map(read_document) {
                    Some(Ok(data)) => (data, LoadOutcome::FellBackToSeed),
                    Some(Err(reason)) => {
                        warn!(%reason, "seed document unusable");
                        (AppData::default(), LoadOutcome::FellBackToDefault)
                    }
                    None => (AppData::default(), LoadOutcome::FellBackToDefault),
                }
            }
        };

        let store = Self { config, data };

        if outcome == LoadOutcome::FellBackToSeed
            && let Err(e) = store.save()
        {
            warn!(error = %e, "failed to persist seed document");
        }

        info!(
            path = %store.config.path.display(),
            routes = store.data.routes.len(),
            %outcome,
            "route store ready"
        );

        (store, outcome)
    }

    /// Create a store around an existing document without touching disk.
    pub fn with_data(config: StoreConfig, data: AppData) -> Self {
        Self { config, data }
    }

    /// The current document.
    pub fn data(&self) -> &AppData {
        &self.data
    }

    /// Look up a route by name.
    pub fn route(&self, name: &str) -> Option<&Route> {
        self.data.routes.get(name)
    }

    /// Path of the primary document.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Write the whole document to the primary path.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self) -> Result<(), StoreError> {
        let path = &self.config.path;
        let io_err = |source| StoreError::Io {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(path, json).map_err(io_err)?;

        Ok(())
    }

    /// Insert a route, replacing any route with the same name, and save.
    pub fn add_route(&mut self, name: impl Into<String>, route: Route) -> Result<(), StoreError> {
        let name = name.into();
        info!(%name, line = %route.line, times = route.times.len(), "saving route");
        self.data.routes.insert(name, route);
        self.save()
    }

    /// Remove a route if present, and save.
    ///
    /// Returns the removed route alongside the save outcome, since the
    /// removal stands in memory even when the save fails. A missing name is
    /// not an error.
    pub fn delete_route(&mut self, name: &str) -> (Option<Route>, Result<(), StoreError>) {
        let removed = self.data.routes.remove(name);
        info!(%name, removed = removed.is_some(), "deleting route");
        (removed, self.save())
    }

    /// Record the schedule image file name, and save.
    pub fn set_schedule_image(&mut self, file_name: impl Into<String>) -> Result<(), StoreError> {
        self.data.schedule_image_name = file_name.into();
        self.save()
    }

    /// Change the UI theme, and save.
    pub fn set_theme(&mut self, theme: Theme) -> Result<(), StoreError> {
        self.data.settings.theme = theme;
        self.save()
    }
}

/// Read and parse a document, describing any failure.
fn read_document(path: &Path) -> Result<AppData, String> {
    let contents = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&contents).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use tempfile::tempdir;

    fn t(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn sample_data() -> AppData {
        let mut data = AppData::default();
        data.schedule_image_name = "orario.png".to_string();
        data.routes.insert(
            "Home → Terminal".to_string(),
            Route::new("11A", vec![t(7, 10), t(8, 0)]),
        );
        data.settings.theme = Theme::Dark;
        data
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::new(dir.path().join("data.json"));

        let store = RouteStore::with_data(config.clone(), sample_data());
        store.save().unwrap();

        let (reloaded, outcome) = RouteStore::load(config);
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(reloaded.data(), &sample_data());
    }

    #[test]
    fn saved_file_is_pretty_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        let store = RouteStore::with_data(StoreConfig::new(&path), sample_data());
        store.save().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\n  \"routes\""));
        assert!(contents.contains("Home → Terminal"));
        assert!(contents.contains("\"07:10\""));
    }

    #[test]
    fn missing_primary_and_seed_uses_default() {
        let dir = tempdir().unwrap();
        let config =
            StoreConfig::new(dir.path().join("data.json")).with_seed(dir.path().join("seed.json"));

        let (store, outcome) = RouteStore::load(config);

        assert_eq!(outcome, LoadOutcome::FellBackToDefault);
        assert_eq!(store.data(), &AppData::default());
        assert!(!dir.path().join("data.json").exists());
    }

    #[test]
    fn missing_primary_uses_seed_and_persists_it() {
        let dir = tempdir().unwrap();
        let seed_path = dir.path().join("seed.json");
        std::fs::write(&seed_path, serde_json::to_string(&sample_data()).unwrap()).unwrap();
        let primary = dir.path().join("data.json");

        let (store, outcome) = RouteStore::load(StoreConfig::new(&primary).with_seed(&seed_path));

        assert_eq!(outcome, LoadOutcome::FellBackToSeed);
        assert_eq!(store.data(), &sample_data());

        let (reloaded, outcome) = RouteStore::load(StoreConfig::new(&primary));
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(reloaded.data(), &sample_data());
    }

    #[test]
    fn corrupt_primary_falls_back() {
        let dir = tempdir().unwrap();
        let primary = dir.path().join("data.json");
        std::fs::write(&primary, "{ not json").unwrap();

        let (store, outcome) = RouteStore::load(StoreConfig::new(&primary));

        assert_eq!(outcome, LoadOutcome::FellBackToDefault);
        assert!(store.data().routes.is_empty());
    }

    #[test]
    fn bad_stored_time_keeps_rest_of_document() {
        let dir = tempdir().unwrap();
        let primary = dir.path().join("data.json");
        std::fs::write(
            &primary,
            r#"{"routes": {"Uni": {"line": "3", "times": ["25:99", "09:00"]}, "Gym": {"times": ["18:30"]}}}"#,
        )
        .unwrap();

        let (store, outcome) = RouteStore::load(StoreConfig::new(&primary));

        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(store.route("Uni").unwrap().times, vec![t(9, 0)]);
        assert_eq!(store.route("Gym").unwrap().times, vec![t(18, 30)]);
    }

    #[test]
    fn corrupt_seed_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let seed_path = dir.path().join("seed.json");
        std::fs::write(&seed_path, "42").unwrap();

        let (_, outcome) =
            RouteStore::load(StoreConfig::new(dir.path().join("data.json")).with_seed(&seed_path));

        assert_eq!(outcome, LoadOutcome::FellBackToDefault);
    }

    #[test]
    fn add_route_replaces_existing() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::new(dir.path().join("data.json"));
        let mut store = RouteStore::with_data(config.clone(), sample_data());

        store
            .add_route("Home → Terminal", Route::new("7", vec![t(12, 0)]))
            .unwrap();

        let (reloaded, _) = RouteStore::load(config);
        let route = reloaded.route("Home → Terminal").unwrap();
        assert_eq!(route.line, "7");
        assert_eq!(route.times, vec![t(12, 0)]);
    }

    #[test]
    fn delete_missing_route_is_noop() {
        let dir = tempdir().unwrap();
        let mut store = RouteStore::with_data(StoreConfig::new(dir.path().join("data.json")), sample_data());

        let (removed, saved) = store.delete_route("Nowhere");
        saved.unwrap();

        assert!(removed.is_none());
        assert_eq!(store.data(), &sample_data());
    }

    #[test]
    fn delete_existing_route_persists() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::new(dir.path().join("data.json"));
        let mut store = RouteStore::with_data(config.clone(), sample_data());

        let (removed, saved) = store.delete_route("Home → Terminal");
        saved.unwrap();
        assert_eq!(removed.unwrap().line, "11A");

        let (reloaded, _) = RouteStore::load(config);
        assert!(reloaded.data().routes.is_empty());
    }

    #[test]
    fn settings_and_image_persist() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::new(dir.path().join("data.json"));
        let mut store = RouteStore::with_data(config.clone(), AppData::default());

        store.set_theme(Theme::Light).unwrap();
        store.set_schedule_image("week_1.png").unwrap();

        let (reloaded, _) = RouteStore::load(config);
        assert_eq!(reloaded.data().settings.theme, Theme::Light);
        assert_eq!(reloaded.data().schedule_image_name, "week_1.png");
    }

    #[test]
    fn failed_save_keeps_memory_state() {
        let dir = tempdir().unwrap();
        // The primary path is a directory, so writing it fails
        let config = StoreConfig::new(dir.path());
        let mut store = RouteStore::with_data(config, AppData::default());

        let result = store.add_route("Uni", Route::new("3", vec![t(9, 0)]));

        assert!(matches!(result, Err(StoreError::Io { .. })));
        assert!(store.route("Uni").is_some());

        let (removed, saved) = store.delete_route("Uni");
        assert!(removed.is_some());
        assert!(saved.is_err());
        assert!(store.route("Uni").is_none());
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");
        let store = RouteStore::with_data(StoreConfig::new(&path), AppData::default());

        store.save().unwrap();
        assert!(path.exists());
    }
}

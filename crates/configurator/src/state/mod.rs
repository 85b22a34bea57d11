pub mod assets;
pub mod session;
pub mod settings;
pub mod tasks;

use std::path::PathBuf;

use tracing::{debug, info, warn};

use shared::catalog::Catalog;
use shared::{ConfigurationPayload, SavedConfiguration};

pub use assets::{AssetLibrary, AssetSlot};
pub use session::{AutosaveTimer, SessionState};
pub use settings::{AppSettings, Language};
pub use tasks::{TaskResult, TaskRunner, UploadTarget};

use crate::assets::AssetLookup;
use crate::cloud::CloudError;
use crate::dimensions;
use crate::measure::{measurement_source, MeasuredGeometry, MeasurementCache};
use crate::overlay::{DimensionOverlay, Footprint};
use crate::overrides::OverridePatch;
use crate::placement::PlacementController;
use crate::scene::{self, SceneLayout};

/// Notifications kept on screen at once
const MAX_NOTIFICATIONS: usize = 5;

/// Panel visibility flags
pub struct PanelVisibility {
    pub configuration: bool,
    pub admin: bool,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self {
            configuration: true,
            admin: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

/// User-facing message from a finished operation
#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
}

/// Saved-configuration dialogs
#[derive(Debug, Default)]
pub struct SavedConfigs {
    pub show_load: bool,
    pub show_save: bool,
    pub save_name: String,
    pub records: Vec<SavedConfiguration>,
    pub loading: bool,
}

/// Combined application state
pub struct AppState {
    pub session: SessionState,
    pub placement: PlacementController,
    pub measurement: MeasurementCache,
    pub assets: AssetLibrary,
    /// Background runtime; `None` when it could not be started
    pub tasks: Option<TaskRunner>,
    pub settings: AppSettings,
    pub catalog: Catalog,
    pub panels: PanelVisibility,
    pub show_dimensions: bool,
    pub show_settings_window: bool,
    pub saved: SavedConfigs,
    pub notifications: Vec<Notification>,
    /// Session version when the startup auto-load was requested
    auto_load_base: Option<u64>,
}

impl AppState {
    pub fn new(settings: AppSettings) -> Self {
        let tasks = match TaskRunner::new() {
            Ok(mut runner) => {
                runner.configure(&settings.cloud);
                Some(runner)
            }
            Err(e) => {
                warn!(error = %e, "Background runtime unavailable");
                None
            }
        };
        Self {
            session: SessionState::new(),
            placement: PlacementController::new(),
            measurement: MeasurementCache::new(),
            assets: AssetLibrary::new(),
            tasks,
            show_dimensions: settings.overlay.show_by_default,
            settings,
            catalog: Catalog::standard(),
            panels: PanelVisibility::default(),
            show_settings_window: false,
            saved: SavedConfigs::default(),
            notifications: Vec::new(),
            auto_load_base: None,
        }
    }

    /// Pick the starting session. A file given on the command line wins;
    /// otherwise a restored autosave; the newest cloud record is only
    /// fetched when there is no local work to keep.
    pub fn bootstrap(
        &mut self,
        initial: Option<ConfigurationPayload>,
        autosave: Option<ConfigurationPayload>,
    ) {
        if let Some(payload) = initial {
            self.session.apply_payload(payload);
        } else if let Some(payload) = autosave {
            self.session.apply_payload(payload);
            info!("Loaded autosave configuration");
        } else {
            self.auto_load();
        }
    }

    pub fn cloud_configured(&self) -> bool {
        self.tasks.as_ref().is_some_and(|t| t.cloud_configured())
    }

    /// Operations still in flight
    pub fn pending(&self) -> usize {
        self.tasks.as_ref().map_or(0, |t| t.pending())
    }

    /// Rebuild the cloud client after a settings change
    pub fn reconfigure_cloud(&mut self) {
        if let Some(tasks) = self.tasks.as_mut() {
            tasks.configure(&self.settings.cloud);
        }
    }

    // ── Derived scene ────────────────────────────────────────

    pub fn layout(&self) -> SceneLayout {
        scene::compose(&self.session.config, &self.session.overrides, &self.catalog)
    }

    /// Measured top footprint, or `None` to use nominal dimensions
    pub fn measured(&mut self) -> Option<MeasuredGeometry> {
        let source = measurement_source(&self.session.config, &self.session.overrides);
        let asset = source.as_ref().and_then(|s| self.assets.asset(&s.url));
        self.measurement.update(source.as_ref(), asset.as_deref())
    }

    pub fn overlay(&mut self) -> DimensionOverlay {
        let measured = self.measured();
        let dims = dimensions::resolve(&self.session.config);
        let origin = scene::overlay_origin(&self.session.config, &self.session.overrides);
        DimensionOverlay::build(origin, Footprint::resolve(&dims, measured))
    }

    /// Start loading any asset the layout references that was never requested
    pub fn request_assets(&mut self, layout: &SceneLayout) {
        let Some(tasks) = self.tasks.as_mut() else {
            return;
        };
        for url in layout.asset_urls() {
            if self.assets.request(url) {
                debug!(url, "Requesting asset");
                tasks.load_asset(url.to_string());
            }
        }
    }

    // ── Session-level actions ────────────────────────────────

    pub fn set_edit_mode(&mut self, on: bool) {
        self.placement.set_edit_mode(on);
    }

    /// Reset the configuration to defaults; overrides are kept
    pub fn reset(&mut self) {
        self.placement.deselect();
        self.session.reset();
    }

    /// Replace the session with a stored record
    pub fn load_saved(&mut self, record: &SavedConfiguration) -> bool {
        let Some(payload) = record.data.clone() else {
            self.notify_error(format!("Configuration \"{}\" has no data", record.name));
            return false;
        };
        self.placement.deselect();
        self.session.apply_payload(payload);
        info!(id = %record.id, name = %record.name, "Configuration loaded");
        self.notify_info(format!("Loaded \"{}\"", record.name));
        true
    }

    // ── Background operations ────────────────────────────────

    fn run<F>(&mut self, op: F)
    where
        F: FnOnce(&mut TaskRunner) -> Result<(), CloudError>,
    {
        let result = match self.tasks.as_mut() {
            Some(tasks) => op(tasks),
            None => Err(CloudError::NotConfigured),
        };
        if let Err(e) = result {
            self.notify_error(e.user_message());
        }
    }

    pub fn upload(&mut self, target: UploadTarget, path: PathBuf) {
        self.run(|t| t.upload(target, path));
    }

    pub fn save_to_cloud(&mut self) {
        let name = self.saved.save_name.trim().to_string();
        let payload = self.session.payload();
        self.run(|t| t.save(name, payload));
    }

    pub fn refresh_saved(&mut self) {
        let limit = self.settings.cloud.list_limit;
        self.saved.loading = true;
        self.run(|t| t.list_recent(limit));
        if self.pending() == 0 {
            self.saved.loading = false;
        }
    }

    /// Fetch the newest stored configuration if enabled. Silent on failure.
    pub fn auto_load(&mut self) {
        if !self.settings.cloud.auto_load {
            return;
        }
        self.auto_load_base = Some(self.session.version());
        if let Some(tasks) = self.tasks.as_mut() {
            if let Err(e) = tasks.auto_load() {
                debug!(error = %e, "Auto-load skipped");
            }
        }
    }

    /// Apply every finished background result
    pub fn poll(&mut self) -> usize {
        let done = match self.tasks.as_mut() {
            Some(tasks) => tasks.poll(),
            None => return 0,
        };
        let count = done.len();
        for result in done {
            self.apply_task_result(result);
        }
        count
    }

    /// Merge one background result. Failures leave the session untouched.
    pub fn apply_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Uploaded {
                target,
                file_name,
                result,
            } => match result {
                Ok(url) => {
                    self.apply_upload(target, &file_name, &url);
                    self.notify_info(format!("Uploaded {file_name}"));
                }
                Err(e) => self.notify_error(e.user_message()),
            },
            TaskResult::Saved { name, result } => match result {
                Ok(()) => {
                    self.saved.show_save = false;
                    self.saved.save_name.clear();
                    self.notify_info(format!("Saved \"{name}\""));
                }
                Err(e) => self.notify_error(e.user_message()),
            },
            TaskResult::Listed(result) => {
                self.saved.loading = false;
                match result {
                    Ok(records) => self.saved.records = records,
                    Err(e) => self.notify_error(e.user_message()),
                }
            }
            TaskResult::AutoLoaded(result) => match result {
                Ok(Some(_)) if self.session_edited_since_auto_load() => {
                    info!("Session edited before auto-load finished, keeping local edits");
                }
                Ok(Some(record)) => {
                    if let Some(payload) = record.data {
                        self.placement.deselect();
                        self.session.apply_payload(payload);
                        info!(name = %record.name, "Auto-loaded newest configuration");
                    }
                }
                Ok(None) => debug!("No stored configuration to auto-load"),
                Err(e) => warn!(error = %e, "Auto-load failed"),
            },
            TaskResult::AssetLoaded { url, result } => self.assets.finish(&url, result),
        }
    }

    fn session_edited_since_auto_load(&mut self) -> bool {
        self.auto_load_base
            .take()
            .is_some_and(|base| base != self.session.version())
    }

    fn apply_upload(&mut self, target: UploadTarget, file_name: &str, url: &str) {
        match target {
            UploadTarget::DeskModel => self.session.apply_desk_model(url),
            UploadTarget::FrameModel => self.session.apply_frame_model(url),
            UploadTarget::TopTexture => self.session.apply_top_texture(url),
            UploadTarget::Element => {
                self.session.add_element(file_name, url);
            }
            UploadTarget::AdminModel(id) => {
                self.session.set_override(&id, OverridePatch::model(url, file_name));
            }
            UploadTarget::AdminTexture(id) => {
                self.session.set_override(&id, OverridePatch::texture(url));
            }
        }
    }

    // ── Notifications ────────────────────────────────────────

    pub fn notify_info(&mut self, text: impl Into<String>) {
        self.push_notification(NotificationKind::Info, text.into());
    }

    pub fn notify_error(&mut self, text: impl Into<String>) {
        self.push_notification(NotificationKind::Error, text.into());
    }

    fn push_notification(&mut self, kind: NotificationKind, text: String) {
        self.notifications.push(Notification { kind, text });
        if self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.remove(0);
        }
    }

    pub fn dismiss_notification(&mut self, index: usize) {
        if index < self.notifications.len() {
            self.notifications.remove(index);
        }
    }
}

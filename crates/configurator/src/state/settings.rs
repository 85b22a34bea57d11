//! Application settings

use std::path::Path;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Environment variable replacing the stored service URL
pub const ENV_CLOUD_URL: &str = "DESK_CLOUD_URL";
/// Environment variable replacing the stored service key
pub const ENV_CLOUD_KEY: &str = "DESK_CLOUD_KEY";

/// Platform directories for settings and autosave
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "desk", "desk-configurator")
}

/// Interface language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Polish,
}

impl Language {
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Polish => "Polski",
        }
    }

    pub fn all() -> &'static [Language] {
        &[Language::English, Language::Polish]
    }
}

/// Configuration service connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudSettings {
    /// Service base URL
    pub url: String,
    /// Anonymous API key
    pub api_key: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Load the newest stored configuration at startup
    pub auto_load: bool,
    /// How many records the load dialog lists
    pub list_limit: usize,
}

impl Default for CloudSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            timeout_secs: 30,
            auto_load: true,
            list_limit: 10,
        }
    }
}

impl CloudSettings {
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.api_key.trim().is_empty()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Grid display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Show grid
    pub visible: bool,
    /// Grid cell size in centimeters
    pub size: f32,
    /// Number of grid lines in each direction from origin
    pub range: i32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            visible: true,
            size: 10.0,
            range: 15,
        }
    }
}

/// Viewport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    /// Background color RGB
    pub background_color: [u8; 3],
    /// Selection color RGB
    pub selection_color: [u8; 3],
    pub grid: GridSettings,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            background_color: [236, 238, 242],
            selection_color: [0, 150, 255],
            grid: GridSettings::default(),
        }
    }
}

/// Dimension overlay settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    /// Show dimensions when the application starts
    pub show_by_default: bool,
    /// Font size for dimension labels
    pub font_size: f32,
    /// Guide color RGB
    pub color: [u8; 3],
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            show_by_default: false,
            font_size: 14.0,
            color: [37, 99, 235],
        }
    }
}

/// UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Font size in points
    pub font_size: f32,
    pub language: Language,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            language: Language::default(),
        }
    }
}

/// All application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub cloud: CloudSettings,
    pub viewport: ViewportSettings,
    pub overlay: OverlaySettings,
    pub ui: UiSettings,
}

impl AppSettings {
    /// Load settings from file (defaults when missing or unreadable), then
    /// apply environment overrides
    pub fn load() -> Self {
        let path = project_dirs().map(|dirs| dirs.config_dir().join("settings.json"));
        let mut settings = Self::load_from(path.as_deref());
        settings.apply_env(|key| std::env::var(key).ok());
        settings
    }

    /// Read a settings file; defaults when absent or unparsable
    pub fn load_from(path: Option<&Path>) -> Self {
        path.and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|json| Self::from_json(&json))
            .unwrap_or_default()
    }

    fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str::<Self>(json) {
            Ok(s) => Some(s),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable settings file");
                None
            }
        }
    }

    /// Replace cloud URL/key from the environment when set and non-empty
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var(ENV_CLOUD_URL).filter(|v| !v.trim().is_empty()) {
            debug!("Cloud URL taken from environment");
            self.cloud.url = url;
        }
        if let Some(key) = var(ENV_CLOUD_KEY).filter(|v| !v.trim().is_empty()) {
            self.cloud.api_key = key;
        }
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(dirs) = project_dirs() {
            let config_dir = dirs.config_dir();
            if std::fs::create_dir_all(config_dir).is_ok() {
                let config_path = config_dir.join("settings.json");
                match serde_json::to_string_pretty(self) {
                    Ok(json) => {
                        if let Err(e) = std::fs::write(config_path, json) {
                            warn!(error = %e, "Failed to write settings");
                        }
                    }
                    Err(e) => warn!(error = %e, "Failed to serialize settings"),
                }
            }
        }
    }
}

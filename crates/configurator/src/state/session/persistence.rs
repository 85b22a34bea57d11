//! Local autosave and payload files

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use shared::ConfigurationPayload;
use tracing::{debug, warn};

use super::SessionState;
use crate::state::settings::project_dirs;

impl SessionState {
    /// Get autosave file path
    fn autosave_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.data_dir().join("autosave.json"))
    }

    /// Save the session payload to the autosave file
    pub fn autosave(&self) {
        if let Some(path) = Self::autosave_path() {
            if let Err(e) = self.save_to_file(&path) {
                warn!(error = %e, "Autosave failed");
            }
        }
    }

    /// Load the payload from the autosave file
    pub fn load_autosave() -> Option<ConfigurationPayload> {
        let path = Self::autosave_path()?;
        Self::load_from_file(&path).ok()
    }

    /// Write the session payload as pretty JSON
    pub fn save_to_file(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.payload())?;
        std::fs::write(path, json)?;
        debug!(path = %path.display(), "Session written");
        Ok(())
    }

    /// Read a payload JSON file
    pub fn load_from_file(path: &Path) -> std::io::Result<ConfigurationPayload> {
        let json = std::fs::read_to_string(path)?;
        let payload = serde_json::from_str(&json)?;
        Ok(payload)
    }
}

/// Debounces autosave writes. A changed session is written once it has
/// been quiet for `delay`, or after `max_wait` of continuous edits.
#[derive(Debug, Clone)]
pub struct AutosaveTimer {
    saved_version: u64,
    seen_version: u64,
    first_change: Option<Instant>,
    last_change: Option<Instant>,
    delay: Duration,
    max_wait: Duration,
}

impl AutosaveTimer {
    pub const DELAY: Duration = Duration::from_secs(1);
    pub const MAX_WAIT: Duration = Duration::from_secs(5);

    /// Start with `version` already on disk
    pub fn new(version: u64) -> Self {
        Self {
            saved_version: version,
            seen_version: version,
            first_change: None,
            last_change: None,
            delay: Self::DELAY,
            max_wait: Self::MAX_WAIT,
        }
    }

    /// Note the current session version; true when a write is due
    pub fn tick(&mut self, version: u64, now: Instant) -> bool {
        if version == self.saved_version {
            self.mark_saved(version);
            return false;
        }
        if version != self.seen_version {
            self.seen_version = version;
            self.last_change = Some(now);
            self.first_change.get_or_insert(now);
        }
        let quiet = self
            .last_change
            .is_some_and(|t| now.saturating_duration_since(t) >= self.delay);
        let overdue = self
            .first_change
            .is_some_and(|t| now.saturating_duration_since(t) >= self.max_wait);
        quiet || overdue
    }

    pub fn mark_saved(&mut self, version: u64) {
        self.saved_version = version;
        self.seen_version = version;
        self.first_change = None;
        self.last_change = None;
    }

    /// Unsaved changes are waiting for the quiet period
    pub fn is_pending(&self) -> bool {
        self.first_change.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overrides::OverridePatch;

    #[test]
    fn test_file_roundtrip() {
        let dir = std::env::temp_dir().join(format!("desk-session-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join("desk.json");

        let mut session = SessionState::new();
        session.toggle_addon("drawer");
        session.set_override("drawer", OverridePatch::model("https://cdn/d.stl", "d.stl"));
        session.save_to_file(&path).unwrap();

        let payload = SessionState::load_from_file(&path).unwrap();
        assert_eq!(payload, session.payload());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = std::env::temp_dir().join(format!("desk-session-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.json");
        std::fs::write(&path, r#"{"config": {"size": "huge"}}"#).unwrap();
        assert!(SessionState::load_from_file(&path).is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_autosave_waits_for_quiet_period() {
        let t0 = Instant::now();
        let ms = Duration::from_millis;
        let mut timer = AutosaveTimer::new(0);
        assert!(!timer.tick(0, t0));

        assert!(!timer.tick(1, t0));
        assert!(!timer.tick(2, t0 + ms(600)));
        assert!(timer.is_pending());
        // Quiet measured from the latest edit
        assert!(!timer.tick(2, t0 + ms(1200)));
        assert!(timer.tick(2, t0 + ms(1600)));

        timer.mark_saved(2);
        assert!(!timer.is_pending());
        assert!(!timer.tick(2, t0 + ms(5000)));
    }

    #[test]
    fn test_autosave_forced_during_continuous_edits() {
        let t0 = Instant::now();
        let mut timer = AutosaveTimer::new(0);
        let mut due = false;
        for step in 0..=10u64 {
            due = timer.tick(step + 1, t0 + Duration::from_millis(step * 500));
            if due {
                assert_eq!(step, 10);
            }
        }
        assert!(due);
    }

    #[test]
    fn test_autosave_reverting_to_saved_version_clears() {
        let t0 = Instant::now();
        let mut timer = AutosaveTimer::new(3);
        timer.tick(4, t0);
        assert!(timer.is_pending());
        assert!(!timer.tick(3, t0 + Duration::from_secs(2)));
        assert!(!timer.is_pending());
    }
}

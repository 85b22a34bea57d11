//! Interactive placement: edit-mode selection and drag commits.
//!
//! The controller is session-wide. While edit mode is on, clicking a part
//! selects it (orbit is disabled the whole time edit mode is on); clicking
//! empty space drops the selection. Releasing a drag converts the observed
//! absolute position back into the stored, anchor-relative offset.

use std::fmt;

use glam::DVec3;
use tracing::{debug, info};

use shared::{DeskConfig, Position};

use crate::anchor::{self, PartRef};
use crate::overrides::OverrideRegistry;
use crate::scene::SceneLayout;

/// Selection state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlacementState {
    #[default]
    Idle,
    Editing {
        part: PartRef,
        /// Live absolute position while a drag is in progress
        drag: Option<DVec3>,
    },
}

/// Notifications sent to subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementEvent {
    Selected(PartRef),
    Deselected(PartRef),
    Committed {
        part: PartRef,
        absolute: DVec3,
        offset: Position,
    },
}

/// Result of a drag release
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    pub part: PartRef,
    /// Rounded offset that was stored
    pub offset: Position,
}

type Observer = Box<dyn FnMut(&PlacementEvent) + Send>;

/// Edit-mode state machine
#[derive(Default)]
pub struct PlacementController {
    edit_mode: bool,
    state: PlacementState,
    observers: Vec<Observer>,
}

impl fmt::Debug for PlacementController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlacementController")
            .field("edit_mode", &self.edit_mode)
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl PlacementController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for selection and commit events
    pub fn subscribe(&mut self, observer: impl FnMut(&PlacementEvent) + Send + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn emit(&mut self, event: PlacementEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    /// Camera orbit and part editing never run at the same time
    pub fn orbit_enabled(&self) -> bool {
        !self.edit_mode
    }

    pub fn state(&self) -> &PlacementState {
        &self.state
    }

    pub fn selected(&self) -> Option<&PartRef> {
        match &self.state {
            PlacementState::Idle => None,
            PlacementState::Editing { part, .. } => Some(part),
        }
    }

    /// Absolute position of the part being dragged, if a drag is live
    pub fn drag_position(&self) -> Option<DVec3> {
        match &self.state {
            PlacementState::Editing { drag, .. } => *drag,
            PlacementState::Idle => None,
        }
    }

    /// Toggle edit mode; leaving it drops any selection
    pub fn set_edit_mode(&mut self, on: bool) {
        if self.edit_mode == on {
            return;
        }
        self.edit_mode = on;
        debug!(edit_mode = on, "Edit mode changed");
        if !on {
            self.deselect();
        }
    }

    /// Click on a part. Returns whether the part is now selected.
    pub fn click_part(&mut self, part: &PartRef) -> bool {
        if !self.edit_mode || !part.is_selectable() {
            return false;
        }
        if self.selected() == Some(part) {
            return true;
        }
        if let PlacementState::Editing { part: previous, .. } = std::mem::take(&mut self.state) {
            self.emit(PlacementEvent::Deselected(previous));
        }
        self.state = PlacementState::Editing {
            part: part.clone(),
            drag: None,
        };
        self.emit(PlacementEvent::Selected(part.clone()));
        true
    }

    /// Click that hit nothing
    pub fn pointer_missed(&mut self) {
        if self.edit_mode {
            self.deselect();
        }
    }

    pub fn deselect(&mut self) {
        if let PlacementState::Editing { part, .. } = std::mem::take(&mut self.state) {
            self.emit(PlacementEvent::Deselected(part));
        }
    }

    /// Drop the selection when the selected part left the scene
    pub fn sync(&mut self, layout: &SceneLayout) {
        let gone = self.selected().is_some_and(|p| layout.get(p).is_none());
        if gone {
            self.deselect();
        }
    }

    /// Track the gizmo's live absolute position
    pub fn drag_to(&mut self, absolute: DVec3) {
        if let PlacementState::Editing { drag, .. } = &mut self.state {
            *drag = Some(absolute);
        }
    }

    /// Drag released: commit the tracked position, if any
    pub fn release(&mut self, config: &mut DeskConfig, overrides: &mut OverrideRegistry) -> Option<Commit> {
        let absolute = match &mut self.state {
            PlacementState::Editing { drag, .. } => drag.take()?,
            PlacementState::Idle => return None,
        };
        self.commit(absolute, config, overrides)
    }

    /// Store the offset that reproduces `absolute` for the selected part.
    ///
    /// The anchor is re-derived from the current state. User uploads write
    /// into the configuration; catalog parts write into the registry,
    /// creating a stub record when needed. Stays in editing state.
    pub fn commit(
        &mut self,
        absolute: DVec3,
        config: &mut DeskConfig,
        overrides: &mut OverrideRegistry,
    ) -> Option<Commit> {
        let part = self.selected()?.clone();
        let offset = anchor::offset_for(&part, absolute, config, overrides);

        match &part {
            PartRef::UserTop => config.custom_desk_position = offset,
            PartRef::UserFrame => config.custom_frame_position = offset,
            PartRef::Element(_) => return None,
            catalog => {
                let id = catalog.registry_key()?;
                overrides.commit_position(id, offset);
            }
        }

        if let PlacementState::Editing { drag, .. } = &mut self.state {
            *drag = None;
        }
        info!(part = %part, ?offset, "Committed placement");
        self.emit(PlacementEvent::Committed {
            part: part.clone(),
            absolute,
            offset,
        });
        Some(Commit { part, offset })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn top() -> PartRef {
        PartRef::Top("140x70".into())
    }

    #[test]
    fn test_click_ignored_outside_edit_mode() {
        let mut ctl = PlacementController::new();
        assert!(!ctl.click_part(&top()));
        assert_eq!(ctl.state(), &PlacementState::Idle);
        assert!(ctl.orbit_enabled());
    }

    #[test]
    fn test_edit_mode_disables_orbit() {
        let mut ctl = PlacementController::new();
        ctl.set_edit_mode(true);
        assert!(!ctl.orbit_enabled());
        assert!(ctl.click_part(&top()));
        assert_eq!(ctl.selected(), Some(&top()));
    }

    #[test]
    fn test_pointer_missed_deselects() {
        let mut ctl = PlacementController::new();
        ctl.set_edit_mode(true);
        ctl.click_part(&top());
        ctl.pointer_missed();
        assert_eq!(ctl.selected(), None);
    }

    #[test]
    fn test_leaving_edit_mode_deselects() {
        let mut ctl = PlacementController::new();
        ctl.set_edit_mode(true);
        ctl.click_part(&PartRef::UserTop);
        ctl.set_edit_mode(false);
        assert_eq!(ctl.selected(), None);
        assert!(ctl.orbit_enabled());
    }

    #[test]
    fn test_elements_cannot_be_selected() {
        let mut ctl = PlacementController::new();
        ctl.set_edit_mode(true);
        assert!(!ctl.click_part(&PartRef::Element("e".into())));
    }

    #[test]
    fn test_commit_standard_top() {
        let mut config = DeskConfig::default();
        let mut reg = OverrideRegistry::new();
        let mut ctl = PlacementController::new();
        ctl.set_edit_mode(true);
        ctl.click_part(&top());

        let commit = ctl
            .commit(DVec3::new(0.0, 80.0, 0.0), &mut config, &mut reg)
            .unwrap();
        assert_eq!(commit.offset, [0.0, 5.0, 0.0]);
        assert_eq!(reg.position("140x70"), [0.0, 5.0, 0.0]);
        assert_eq!(anchor::world_position(&top(), &config, &reg).y, 80.0);
        assert_eq!(ctl.selected(), Some(&top()));
    }

    #[test]
    fn test_commit_user_top_uses_on_frame_anchor() {
        let mut config = DeskConfig {
            custom_desk_model_url: Some("top.obj".into()),
            custom_desk_on_frame: true,
            ..Default::default()
        };
        let mut reg = OverrideRegistry::new();
        let mut ctl = PlacementController::new();
        ctl.set_edit_mode(true);
        ctl.click_part(&PartRef::UserTop);
        ctl.commit(DVec3::new(3.2, 76.0, -1.0), &mut config, &mut reg);
        assert_eq!(config.custom_desk_position, [3.0, 1.0, -1.0]);
        assert!(reg.is_empty());
    }

    #[test]
    fn test_release_without_drag_is_noop() {
        let mut config = DeskConfig::default();
        let mut reg = OverrideRegistry::new();
        let mut ctl = PlacementController::new();
        ctl.set_edit_mode(true);
        ctl.click_part(&PartRef::Frame("electric".into()));
        assert!(ctl.release(&mut config, &mut reg).is_none());

        ctl.drag_to(DVec3::new(10.0, 0.0, 0.0));
        assert_eq!(ctl.drag_position(), Some(DVec3::new(10.0, 0.0, 0.0)));
        let commit = ctl.release(&mut config, &mut reg).unwrap();
        assert_eq!(commit.offset, [10.0, 0.0, 0.0]);
        assert_eq!(ctl.drag_position(), None);
    }

    #[test]
    fn test_observers_see_events_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let mut ctl = PlacementController::new();
        ctl.subscribe(move |e| {
            let tag = match e {
                PlacementEvent::Selected(p) => format!("select {p}"),
                PlacementEvent::Deselected(p) => format!("deselect {p}"),
                PlacementEvent::Committed { part, .. } => format!("commit {part}"),
            };
            sink.lock().unwrap().push(tag);
        });

        let mut config = DeskConfig::default();
        let mut reg = OverrideRegistry::new();
        ctl.set_edit_mode(true);
        ctl.click_part(&top());
        ctl.click_part(&PartRef::Addon("drawer".into()));
        ctl.commit(DVec3::new(0.0, 70.0, 0.0), &mut config, &mut reg);
        ctl.pointer_missed();

        assert_eq!(
            *log.lock().unwrap(),
            ["select 140x70", "deselect 140x70", "select drawer", "commit drawer", "deselect drawer"]
        );
        assert_eq!(reg.position("drawer"), [0.0, -5.0, 0.0]);
    }
}

//! 3D viewport panel painted with the egui painter

mod camera;
mod gizmo;
mod overlays;
mod renderer;

use egui::Ui;
use glam::DVec3;
use tracing::info;

use crate::i18n::t;
use crate::state::AppState;
use camera::ArcBallCamera;
use gizmo::{compute_drag_delta, gizmo_hit_test, GizmoState};
use renderer::PaintContext;

/// 3D viewport panel
pub struct ViewportPanel {
    camera: ArcBallCamera,
    gizmo_state: GizmoState,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self {
            camera: ArcBallCamera::new(),
            gizmo_state: GizmoState::default(),
        }
    }

    pub fn reset_camera(&mut self) {
        self.camera.reset();
    }

    /// Point the camera at the selected part
    pub fn focus_selected(&mut self, state: &AppState) {
        let layout = state.layout();
        if let Some(part) = state.placement.selected().and_then(|p| layout.get(p)) {
            self.camera.target = part.position.as_vec3();
        }
    }

    /// Abort a gizmo drag without committing
    pub fn cancel_drag(&mut self) {
        self.gizmo_state.end_drag();
    }

    pub fn show(&mut self, ui: &mut Ui, state: &mut AppState) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());

        let layout = state.layout();
        state.request_assets(&layout);
        state.placement.sync(&layout);
        if state.placement.selected().is_none() {
            self.gizmo_state.end_drag();
        }

        let gizmo_center = if state.placement.edit_mode() {
            state
                .placement
                .selected()
                .and_then(|p| layout.get(p))
                .map(|p| self.gizmo_state.live.unwrap_or(p.position))
        } else {
            None
        };

        self.handle_gizmo_and_camera(&response, ui, rect, state, gizmo_center);
        self.handle_selection(&response, rect, state, &layout, gizmo_center);

        // ── Scroll zoom ─────────────────────────────
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll.abs() > 0.1 {
                self.camera.zoom(scroll * 0.002);
            }
        }

        if !ui.is_rect_visible(rect) {
            return;
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, renderer::rgb(state.settings.viewport.background_color));

        let ctx = PaintContext {
            painter: &painter,
            camera: &self.camera,
            rect,
            assets: &state.assets,
            settings: &state.settings.viewport,
        };
        renderer::paint_grid(&ctx, &state.settings.viewport.grid);
        renderer::paint_scene(&ctx, &layout, state.placement.selected(), self.gizmo_state.live);
        overlays::draw_axis_labels(&painter, rect, &self.camera);

        if state.show_dimensions {
            let overlay = state.overlay();
            overlays::draw_dimensions(&painter, rect, &self.camera, &overlay, &state.settings.overlay);
        }

        if let Some(center) = self.gizmo_state.live.or(gizmo_center) {
            gizmo::paint(&painter, &self.camera, center, rect, self.gizmo_state.active_axis);
        }

        if state.placement.edit_mode() {
            overlays::draw_hint(&painter, rect, t("hint.edit_mode"));
        }
    }

    fn handle_gizmo_and_camera(
        &mut self,
        response: &egui::Response,
        ui: &Ui,
        rect: egui::Rect,
        state: &mut AppState,
        gizmo_center: Option<DVec3>,
    ) {
        // ── Gizmo drag handling ─────────────────────────────────
        if let Some(axis) = self.gizmo_state.active_axis {
            if response.dragged_by(egui::PointerButton::Primary) {
                if let Some(live) = self.gizmo_state.live {
                    let delta = compute_drag_delta(&self.camera, live, axis, response.drag_delta(), rect);
                    let next = live + delta;
                    self.gizmo_state.live = Some(next);
                    state.placement.drag_to(next);
                }
            }
            // Commit when the button is released
            if response.drag_stopped() || !response.dragged_by(egui::PointerButton::Primary) {
                self.gizmo_state.end_drag();
                if let Some(commit) = state.session.release_drag(&mut state.placement) {
                    info!(part = %commit.part, offset = ?commit.offset, "Part moved");
                }
            }
            return;
        }

        // ── Camera controls (orbit and pan only outside edit mode) ──
        let button = [
            egui::PointerButton::Primary,
            egui::PointerButton::Middle,
            egui::PointerButton::Secondary,
        ]
        .into_iter()
        .find(|b| response.dragged_by(*b));
        match button.and_then(|b| camera_drag(state.placement.orbit_enabled(), b)) {
            Some(CameraDrag::Orbit) => {
                let delta = response.drag_delta();
                self.camera.rotate(delta.x * 0.5, delta.y * 0.5);
            }
            Some(CameraDrag::Pan) => {
                let delta = self.camera.drag_delta(response.drag_delta(), rect);
                self.camera.pan(-delta.x, -delta.y);
            }
            None => {}
        }

        // ── Gizmo drag start on LMB drag ───────────────────
        if response.drag_started_by(egui::PointerButton::Primary) && !ui.input(|i| i.modifiers.alt) {
            let pointer = response.interact_pointer_pos().or_else(|| response.hover_pos());
            if let (Some(pos), Some(center)) = (pointer, gizmo_center) {
                if let Some(axis) = gizmo_hit_test(&self.camera, center, pos, rect) {
                    self.gizmo_state.begin_drag(axis, center);
                    state.placement.drag_to(center);
                }
            }
        }
    }

    fn handle_selection(
        &mut self,
        response: &egui::Response,
        rect: egui::Rect,
        state: &mut AppState,
        layout: &desk_configurator_lib::scene::SceneLayout,
        gizmo_center: Option<DVec3>,
    ) {
        if !response.clicked() || self.gizmo_state.dragging() || !state.placement.edit_mode() {
            return;
        }
        let Some(pos) = response.interact_pointer_pos() else {
            return;
        };

        // Clicks on the gizmo never pick through it
        if gizmo_center.is_some_and(|c| gizmo_hit_test(&self.camera, c, pos, rect).is_some()) {
            return;
        }

        let ray = self.camera.screen_ray(pos, rect);
        match layout.pick(&ray, &state.assets) {
            Some(part) => {
                state.placement.click_part(&part);
            }
            None => state.placement.pointer_missed(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CameraDrag {
    Orbit,
    Pan,
}

/// Camera motion for a pointer drag; none while parts are being edited
fn camera_drag(orbit_enabled: bool, button: egui::PointerButton) -> Option<CameraDrag> {
    if !orbit_enabled {
        return None;
    }
    match button {
        egui::PointerButton::Primary | egui::PointerButton::Middle => Some(CameraDrag::Orbit),
        egui::PointerButton::Secondary => Some(CameraDrag::Pan),
        _ => None,
    }
}

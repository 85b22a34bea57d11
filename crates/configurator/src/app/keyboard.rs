//! Keyboard shortcut handling

use eframe::egui;

use crate::state::AppState;
use crate::viewport::ViewportPanel;

/// Handle keyboard shortcuts for the application
pub fn handle_keyboard(ctx: &egui::Context, state: &mut AppState, viewport: &mut ViewportPanel) {
    // Don't handle shortcuts when a text field is focused
    if ctx.memory(|m| m.focused().is_some()) {
        return;
    }

    let (escape, toggle_edit, toggle_dims, focus, save) = ctx.input(|i| {
        (
            i.key_pressed(egui::Key::Escape),
            i.key_pressed(egui::Key::E) && !i.modifiers.command,
            i.key_pressed(egui::Key::D) && !i.modifiers.command,
            i.key_pressed(egui::Key::F) && !i.modifiers.command,
            i.modifiers.command && i.key_pressed(egui::Key::S),
        )
    });

    // Escape: drop the selection, then leave edit mode
    if escape {
        if state.placement.selected().is_some() {
            viewport.cancel_drag();
            state.placement.deselect();
        } else {
            state.set_edit_mode(false);
        }
    }
    if toggle_edit {
        let on = !state.placement.edit_mode();
        state.set_edit_mode(on);
    }
    if toggle_dims {
        state.show_dimensions = !state.show_dimensions;
    }
    if focus {
        viewport.focus_selected(state);
    }
    if save && state.cloud_configured() {
        state.saved.show_save = true;
    }
}

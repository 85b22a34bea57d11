//! Application menu bar and settings window

use eframe::egui;

use crate::i18n::{set_lang, t};
use crate::state::{AppState, Language, SessionState};
use crate::viewport::ViewportPanel;

/// Show the file menu
pub fn file_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.file"), |ui| {
        if ui.button(t("menu.new")).clicked() {
            state.reset();
            ui.close_menu();
        }
        if ui.button(t("menu.open")).clicked() {
            ui.close_menu();
            if let Some(path) = rfd::FileDialog::new()
                .set_title(t("menu.open_title"))
                .add_filter("JSON", &["json"])
                .pick_file()
            {
                match SessionState::load_from_file(&path) {
                    Ok(payload) => {
                        state.placement.deselect();
                        state.session.apply_payload(payload);
                        tracing::info!("Loaded configuration from {}", path.display());
                    }
                    Err(e) => {
                        tracing::error!("Failed to read configuration: {e}");
                        state.notify_error(format!("{}: {e}", t("msg.open_failed")));
                    }
                }
            }
        }
        if ui.button(t("menu.save")).clicked() {
            ui.close_menu();
            if let Some(path) = rfd::FileDialog::new()
                .set_title(t("menu.save_title"))
                .add_filter("JSON", &["json"])
                .set_file_name("desk.json")
                .save_file()
            {
                match state.session.save_to_file(&path) {
                    Ok(()) => tracing::info!("Saved configuration to {}", path.display()),
                    Err(e) => {
                        tracing::error!("Failed to write configuration: {e}");
                        state.notify_error(format!("{}: {e}", t("msg.save_failed")));
                    }
                }
            }
        }
        ui.separator();
        let cloud = state.cloud_configured();
        if ui
            .add_enabled(cloud, egui::Button::new(t("menu.cloud_save")))
            .clicked()
        {
            state.saved.show_save = true;
            ui.close_menu();
        }
        if ui
            .add_enabled(cloud, egui::Button::new(t("menu.cloud_load")))
            .clicked()
        {
            state.saved.show_load = true;
            state.refresh_saved();
            ui.close_menu();
        }
        ui.separator();
        if ui.button(t("menu.quit")).clicked() {
            ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
        }
    });
}

/// Show the view menu
pub fn view_menu(ui: &mut egui::Ui, state: &mut AppState, viewport: &mut ViewportPanel) {
    ui.menu_button(t("menu.view"), |ui| {
        ui.checkbox(&mut state.show_dimensions, t("menu.dimensions"));
        let mut edit = state.placement.edit_mode();
        if ui.checkbox(&mut edit, t("menu.edit_mode")).changed() {
            state.set_edit_mode(edit);
        }
        ui.separator();
        ui.checkbox(&mut state.panels.configuration, t("menu.configuration_panel"));
        ui.checkbox(&mut state.panels.admin, t("menu.admin_panel"));
        ui.separator();
        if ui.button(t("menu.reset_camera")).clicked() {
            viewport.reset_camera();
            ui.close_menu();
        }
        ui.separator();
        ui.menu_button(t("menu.language"), |ui| {
            for lang in Language::all() {
                if ui
                    .selectable_label(state.settings.ui.language == *lang, lang.display_name())
                    .clicked()
                {
                    state.settings.ui.language = *lang;
                    set_lang(*lang);
                    state.settings.save();
                    ui.close_menu();
                }
            }
        });
    });
}

/// Show the settings menu
pub fn settings_menu(ui: &mut egui::Ui, state: &mut AppState) {
    ui.menu_button(t("menu.settings"), |ui| {
        if ui.button(t("menu.preferences")).clicked() {
            state.show_settings_window = true;
            ui.close_menu();
        }
    });
}

pub fn settings_window(ctx: &egui::Context, state: &mut AppState) {
    let mut open = state.show_settings_window;
    egui::Window::new(t("settings.title"))
        .open(&mut open)
        .resizable(true)
        .default_width(420.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                show_cloud_settings(ui, state);
                show_viewport_settings(ui, state);
                show_overlay_settings(ui, state);
                show_ui_settings(ui, state);
                show_settings_buttons(ui, state);
            });
        });
    state.show_settings_window = open;
}

fn show_cloud_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.cloud"));
    egui::Grid::new("cloud_grid").num_columns(2).show(ui, |ui| {
        ui.label(t("settings.cloud_url"));
        ui.text_edit_singleline(&mut state.settings.cloud.url);
        ui.end_row();

        ui.label(t("settings.cloud_key"));
        ui.add(egui::TextEdit::singleline(&mut state.settings.cloud.api_key).password(true));
        ui.end_row();

        ui.label(t("settings.cloud_timeout"));
        ui.add(
            egui::DragValue::new(&mut state.settings.cloud.timeout_secs)
                .range(1..=300)
                .suffix(" s"),
        );
        ui.end_row();

        ui.label(t("settings.cloud_limit"));
        ui.add(egui::DragValue::new(&mut state.settings.cloud.list_limit).range(1..=100));
        ui.end_row();
    });
    ui.checkbox(&mut state.settings.cloud.auto_load, t("settings.cloud_auto_load"));
    let status = if state.cloud_configured() {
        t("settings.cloud_connected")
    } else {
        t("settings.cloud_missing")
    };
    ui.weak(status);
    ui.add_space(10.0);
}

fn show_viewport_settings(ui: &mut egui::Ui, state: &mut AppState) {
    let viewport = &mut state.settings.viewport;
    ui.heading(t("settings.viewport"));
    ui.horizontal(|ui| {
        ui.label(t("settings.bg_color"));
        ui.color_edit_button_srgb(&mut viewport.background_color);
    });
    ui.horizontal(|ui| {
        ui.label(t("settings.sel_color"));
        ui.color_edit_button_srgb(&mut viewport.selection_color);
    });
    ui.checkbox(&mut viewport.grid.visible, t("settings.grid_visible"));
    ui.horizontal(|ui| {
        ui.label(t("settings.grid_size"));
        ui.add(
            egui::DragValue::new(&mut viewport.grid.size)
                .speed(0.5)
                .range(1.0..=100.0)
                .suffix(" cm"),
        );
    });
    ui.horizontal(|ui| {
        ui.label(t("settings.grid_range"));
        ui.add(egui::DragValue::new(&mut viewport.grid.range).range(1..=100));
    });
    ui.add_space(10.0);
}

fn show_overlay_settings(ui: &mut egui::Ui, state: &mut AppState) {
    let overlay = &mut state.settings.overlay;
    ui.heading(t("settings.overlay"));
    ui.checkbox(&mut overlay.show_by_default, t("settings.overlay_default"));
    ui.horizontal(|ui| {
        ui.label(t("settings.overlay_font"));
        ui.add(egui::Slider::new(&mut overlay.font_size, 8.0..=32.0));
    });
    ui.horizontal(|ui| {
        ui.label(t("settings.overlay_color"));
        ui.color_edit_button_srgb(&mut overlay.color);
    });
    ui.add_space(10.0);
}

fn show_ui_settings(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading(t("settings.ui"));
    ui.horizontal(|ui| {
        ui.label(t("settings.font_size"));
        ui.add(egui::Slider::new(&mut state.settings.ui.font_size, 10.0..=24.0));
    });
    ui.add_space(10.0);
}

fn show_settings_buttons(ui: &mut egui::Ui, state: &mut AppState) {
    ui.separator();
    ui.horizontal(|ui| {
        if ui.button(t("settings.apply")).clicked() {
            state.settings.save();
            state.reconfigure_cloud();
        }
        if ui.button(t("settings.reset")).clicked() {
            state.settings = Default::default();
            state.reconfigure_cloud();
        }
        if ui.button(t("settings.close")).clicked() {
            state.settings.save();
            state.reconfigure_cloud();
            state.show_settings_window = false;
        }
    });
}

//! Cloud save / load dialogs

use eframe::egui;

use crate::i18n::t;
use crate::state::AppState;

pub fn save_window(ctx: &egui::Context, state: &mut AppState) {
    let mut open = state.saved.show_save;
    let mut submit = false;
    egui::Window::new(t("saved.save_title"))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(t("saved.name"));
            let response = ui.text_edit_singleline(&mut state.saved.save_name);
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submit = true;
            }
            ui.weak(format!(
                "{}: {}",
                t("steps.total"),
                crate::ui::steps::format_price(state.catalog.total_price(&state.session.config))
            ));
            ui.horizontal(|ui| {
                let has_name = !state.saved.save_name.trim().is_empty();
                if ui
                    .add_enabled(has_name, egui::Button::new(t("saved.save")))
                    .clicked()
                {
                    submit = true;
                }
            });
        });
    if submit {
        state.save_to_cloud();
    }
    // A successful save closes the dialog from the result handler
    state.saved.show_save = open && state.saved.show_save;
}

pub fn load_window(ctx: &egui::Context, state: &mut AppState) {
    let mut open = state.saved.show_load;
    let mut chosen = None;
    egui::Window::new(t("saved.load_title"))
        .open(&mut open)
        .default_width(380.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button(t("saved.refresh")).clicked() {
                    state.refresh_saved();
                }
                if state.saved.loading {
                    ui.spinner();
                }
            });
            ui.separator();

            if state.saved.records.is_empty() && !state.saved.loading {
                ui.weak(t("saved.empty"));
            }

            egui::ScrollArea::vertical().max_height(360.0).show(ui, |ui| {
                for (i, record) in state.saved.records.iter().enumerate() {
                    ui.horizontal(|ui| {
                        ui.vertical(|ui| {
                            ui.strong(&record.name);
                            ui.weak(short_date(&record.created_at));
                        });
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            let has_data = record.data.is_some();
                            if ui
                                .add_enabled(has_data, egui::Button::new(t("saved.load")))
                                .clicked()
                            {
                                chosen = Some(i);
                            }
                        });
                    });
                    ui.separator();
                }
            });
        });

    if let Some(record) = chosen.and_then(|i| state.saved.records.get(i).cloned()) {
        if state.load_saved(&record) {
            open = false;
        }
    }
    state.saved.show_load = open;
}

/// `2024-05-01T10:00:00.123Z` → `2024-05-01 10:00`
fn short_date(timestamp: &str) -> String {
    let trimmed: String = timestamp.chars().take(16).collect();
    trimmed.replacen('T', " ", 1)
}

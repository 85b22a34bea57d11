use egui::Ui;

use crate::i18n::t;
use crate::state::AppState;
use crate::ui::steps::format_price;

pub fn show(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui| {
        ui.strong(format!(
            "{}: {}",
            t("steps.total"),
            format_price(state.catalog.total_price(&state.session.config))
        ));

        ui.separator();

        match state.placement.selected() {
            Some(part) => {
                ui.label(format!("{}: {part}", t("status.selected")));
            }
            None if state.placement.edit_mode() => {
                ui.weak(t("status.edit_mode"));
            }
            None => {
                ui.weak(t("status.ready"));
            }
        }

        let pending = state.pending();
        if pending > 0 {
            ui.separator();
            ui.spinner();
            ui.weak(format!("{}: {pending}", t("status.pending")));
        }
        if state.assets.is_loading() {
            ui.separator();
            ui.weak(t("status.loading_models"));
        }
        let failed = state.assets.failures().count();
        if failed > 0 {
            ui.separator();
            ui.colored_label(
                egui::Color32::from_rgb(180, 40, 40),
                format!("{}: {failed}", t("status.failed_models")),
            );
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let cloud = if state.cloud_configured() {
                t("status.cloud_on")
            } else {
                t("status.cloud_off")
            };
            ui.weak(cloud);
        });
    });
}

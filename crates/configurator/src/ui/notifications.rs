//! Toast-style notifications for finished background operations

use eframe::egui;

use crate::state::{AppState, NotificationKind};

pub fn show(ctx: &egui::Context, state: &mut AppState) {
    if state.notifications.is_empty() {
        return;
    }
    let mut dismiss = None;
    egui::Area::new(egui::Id::new("notifications"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -36.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            for (i, note) in state.notifications.iter().enumerate() {
                let (fill, text) = match note.kind {
                    NotificationKind::Info => (egui::Color32::from_rgb(220, 240, 225), egui::Color32::from_rgb(20, 90, 40)),
                    NotificationKind::Error => (egui::Color32::from_rgb(252, 225, 225), egui::Color32::from_rgb(150, 30, 30)),
                };
                egui::Frame::popup(ui.style()).fill(fill).show(ui, |ui| {
                    ui.set_max_width(320.0);
                    ui.horizontal(|ui| {
                        ui.colored_label(text, &note.text);
                        if ui.small_button("✕").clicked() {
                            dismiss = Some(i);
                        }
                    });
                });
            }
        });
    if let Some(i) = dismiss {
        state.dismiss_notification(i);
    }
}

//! Admin panel: per-part model overrides for the catalog

use egui::Ui;

use shared::catalog::Category;
use shared::Axis;

use crate::i18n::t;
use crate::state::{AppState, UploadTarget};

fn category_title(category: Category) -> &'static str {
    match category {
        Category::Size => t("admin.sizes"),
        Category::FrameType => t("admin.frames"),
        Category::Accessory => t("steps.accessories"),
        Category::Addon => t("steps.addons"),
        Category::TopColor | Category::FrameColor => "",
    }
}

pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.heading(t("admin.title"));
    if !state.cloud_configured() {
        ui.weak(t("steps.cloud_required"));
    }
    ui.add_space(4.0);

    for category in Category::OVERRIDABLE {
        egui::CollapsingHeader::new(category_title(category))
            .default_open(category == Category::Size)
            .show(ui, |ui| {
                let options = state.catalog.options(category).to_vec();
                for option in &options {
                    part_row(ui, state, &option.id, &option.label);
                    ui.add_space(2.0);
                }
            });
    }
}

fn part_row(ui: &mut Ui, state: &mut AppState, id: &str, label: &str) {
    let record = state.session.overrides.get(id).cloned();
    let enabled = state.cloud_configured();

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.strong(label);
            ui.weak(id);
            if let Some(rec) = &record {
                let status = if rec.is_active() {
                    t("admin.active")
                } else {
                    t("admin.position_only")
                };
                ui.weak(format!("· {status}"));
            }
        });

        ui.horizontal(|ui| {
            ui.add_enabled_ui(enabled, |ui| {
                if ui.small_button(t("admin.upload_model")).clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("3D", &["fbx", "stl", "obj"])
                        .pick_file()
                    {
                        state.upload(UploadTarget::AdminModel(id.to_string()), path);
                    }
                }
                if ui.small_button(t("admin.upload_texture")).clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Image", &["png", "jpg", "jpeg", "webp"])
                        .pick_file()
                    {
                        state.upload(UploadTarget::AdminTexture(id.to_string()), path);
                    }
                }
            });
            if record.is_some() && ui.small_button(t("admin.remove")).clicked() {
                state.session.remove_override(id);
            }
        });

        let Some(rec) = record else {
            return;
        };

        if !rec.file_name.is_empty() {
            ui.weak(&rec.file_name);
        }
        if let Some(texture) = &rec.texture_url {
            ui.weak(format!("{}: {}", t("admin.texture"), texture));
        }

        let mut scale = rec.scale;
        ui.horizontal(|ui| {
            ui.label(t("steps.scale"));
            if ui
                .add(egui::DragValue::new(&mut scale).speed(0.01).range(0.001..=100.0))
                .changed()
            {
                if let Err(e) = state.session.update_override_scale(id, scale) {
                    state.notify_error(e.to_string());
                }
            }
        });

        ui.horizontal(|ui| {
            ui.label(t("steps.position"));
            for axis in Axis::ALL {
                let mut v = rec.position[axis.index()];
                if ui
                    .add(egui::DragValue::new(&mut v).speed(0.5).prefix(format!("{} ", axis.label())))
                    .changed()
                {
                    if let Err(e) = state.session.update_override_axis(id, axis, v) {
                        state.notify_error(e.to_string());
                    }
                }
            }
        });
    });
}

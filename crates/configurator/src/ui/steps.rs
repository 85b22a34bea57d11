//! Configuration steps panel

use egui::Ui;

use shared::catalog::{Category, ProductOption};
use shared::{Axis, DeskSize, CUSTOM_DEPTH_RANGE, CUSTOM_WIDTH_RANGE};

use crate::i18n::t;
use crate::state::{AppState, UploadTarget};

const MODEL_EXTENSIONS: &[&str] = &["fbx", "stl", "obj"];
const TEXTURE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

pub fn show(ui: &mut Ui, state: &mut AppState) {
    ui.heading(t("steps.title"));
    ui.add_space(4.0);

    size_step(ui, state);
    color_step(ui, state);
    frame_step(ui, state);
    extras_step(ui, state, Category::Accessory, "steps.accessories");
    extras_step(ui, state, Category::Addon, "steps.addons");
    uploads_step(ui, state);

    ui.separator();
    ui.horizontal(|ui| {
        ui.strong(t("steps.total"));
        ui.heading(format_price(state.catalog.total_price(&state.session.config)));
    });
}

pub fn format_price(amount: i64) -> String {
    format!("{amount} zł")
}

fn price_tag(option: &ProductOption) -> String {
    match option.price {
        0 => String::new(),
        p if p > 0 => format!("+{}", format_price(p)),
        p => format_price(p),
    }
}

fn size_step(ui: &mut Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(t("steps.size"))
        .default_open(true)
        .show(ui, |ui| {
            let current = state.session.config.size.id();
            let options = state.catalog.options(Category::Size).to_vec();
            for option in &options {
                let label = format!("{}  {}", option.label, price_tag(option));
                if ui.radio(current == option.id, label).clicked() {
                    match option.id.parse::<DeskSize>() {
                        Ok(size) => state.session.select_size(size),
                        Err(e) => tracing::warn!(error = %e, "Catalog size id rejected"),
                    }
                }
            }

            if state.session.config.size.is_custom() {
                ui.add_space(4.0);
                let mut width = state.session.config.custom_width;
                let mut depth = state.session.config.custom_depth;
                let (wmin, wmax) = CUSTOM_WIDTH_RANGE;
                let (dmin, dmax) = CUSTOM_DEPTH_RANGE;
                if ui
                    .add(egui::Slider::new(&mut width, wmin..=wmax).text(t("steps.width")).suffix(" cm"))
                    .changed()
                {
                    state.session.set_custom_width(width.round());
                }
                if ui
                    .add(egui::Slider::new(&mut depth, dmin..=dmax).text(t("steps.depth")).suffix(" cm"))
                    .changed()
                {
                    state.session.set_custom_depth(depth.round());
                }
                ui.weak(format!(
                    "{}: {}",
                    t("steps.size_price"),
                    format_price(state.catalog.size_price(&state.session.config))
                ));
            }
        });
}

fn swatch(ui: &mut Ui, option: &ProductOption, selected: bool) -> bool {
    let color = option
        .rgb()
        .map(|[r, g, b]| egui::Color32::from_rgb(r, g, b))
        .unwrap_or(egui::Color32::GRAY);
    let (rect, response) = ui.allocate_exact_size(egui::vec2(28.0, 28.0), egui::Sense::click());
    let painter = ui.painter();
    painter.rect_filled(rect, 4.0, color);
    if selected {
        painter.rect_stroke(
            rect.expand(2.0),
            5.0,
            egui::Stroke::new(2.0, ui.visuals().selection.bg_fill),
            egui::StrokeKind::Outside,
        );
    }
    response
        .on_hover_text(format!("{} {}", option.label, price_tag(option)))
        .clicked()
}

fn color_step(ui: &mut Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(t("steps.top_color"))
        .default_open(true)
        .show(ui, |ui| {
            let options = state.catalog.options(Category::TopColor).to_vec();
            ui.horizontal_wrapped(|ui| {
                for option in &options {
                    let selected = state.session.config.top_color == option.id;
                    if swatch(ui, option, selected) && !selected {
                        state.session.select_top_color(&option.id);
                    }
                }
            });
            ui.weak(state.catalog.label(Category::TopColor, &state.session.config.top_color));
        });
}

fn frame_step(ui: &mut Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(t("steps.frame"))
        .default_open(true)
        .show(ui, |ui| {
            let types = state.catalog.options(Category::FrameType).to_vec();
            for option in &types {
                let selected = state.session.config.frame_type == option.id;
                let label = format!("{}  {}", option.label, price_tag(option));
                if ui.radio(selected, label).clicked() && !selected {
                    state.session.select_frame_type(&option.id);
                }
            }
            ui.add_space(4.0);
            ui.label(t("steps.frame_color"));
            let colors = state.catalog.options(Category::FrameColor).to_vec();
            ui.horizontal_wrapped(|ui| {
                for option in &colors {
                    let selected = state.session.config.frame_color == option.id;
                    if swatch(ui, option, selected) && !selected {
                        state.session.select_frame_color(&option.id);
                    }
                }
            });
        });
}

fn extras_step(ui: &mut Ui, state: &mut AppState, category: Category, title: &str) {
    egui::CollapsingHeader::new(t(title))
        .default_open(true)
        .show(ui, |ui| {
            let options = state.catalog.options(category).to_vec();
            for option in &options {
                let list = match category {
                    Category::Accessory => &state.session.config.accessories,
                    _ => &state.session.config.addons,
                };
                let mut on = list.contains(&option.id);
                let label = format!("{}  {}", option.label, price_tag(option));
                let response = ui.checkbox(&mut on, label);
                if let Some(description) = &option.description {
                    response.clone().on_hover_text(description);
                }
                if response.changed() {
                    match category {
                        Category::Accessory => state.session.toggle_accessory(&option.id),
                        _ => state.session.toggle_addon(&option.id),
                    };
                }
            }
        });
}

fn pick_file(title: &str, extensions: &[&str]) -> Option<std::path::PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter(title, extensions)
        .pick_file()
}

/// Editable position row; returns the changed axis and value
fn position_row(ui: &mut Ui, position: [f64; 3]) -> Option<(Axis, f64)> {
    let mut changed = None;
    ui.horizontal(|ui| {
        ui.label(t("steps.position"));
        for axis in Axis::ALL {
            let mut v = position[axis.index()];
            if ui
                .add(egui::DragValue::new(&mut v).speed(0.5).prefix(format!("{} ", axis.label())))
                .changed()
            {
                changed = Some((axis, v));
            }
        }
    });
    changed
}

fn scale_row(ui: &mut Ui, scale: f64) -> Option<f64> {
    let mut v = scale;
    ui.horizontal(|ui| {
        ui.label(t("steps.scale"));
        ui.add(egui::DragValue::new(&mut v).speed(0.01).range(0.001..=100.0))
            .changed()
    })
    .inner
    .then_some(v)
}

fn uploads_step(ui: &mut Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(t("steps.custom"))
        .default_open(false)
        .show(ui, |ui| {
            if !state.cloud_configured() {
                ui.weak(t("steps.cloud_required"));
            }
            let enabled = state.cloud_configured();

            // ── Custom top ──
            ui.strong(t("steps.custom_top"));
            ui.add_enabled_ui(enabled, |ui| {
                if ui.button(t("steps.upload_model")).clicked() {
                    if let Some(path) = pick_file(t("steps.upload_model"), MODEL_EXTENSIONS) {
                        state.upload(UploadTarget::DeskModel, path);
                    }
                }
            });
            if state.session.config.custom_desk_url().is_some() {
                let config = &state.session.config;
                let (scale, position, mut on_frame) =
                    (config.custom_desk_scale, config.custom_desk_position, config.custom_desk_on_frame);
                if let Some(v) = scale_row(ui, scale) {
                    state.session.set_custom_desk_scale(v);
                }
                if let Some((axis, v)) = position_row(ui, position) {
                    state.session.set_custom_desk_axis(axis, v);
                }
                if ui.checkbox(&mut on_frame, t("steps.on_frame")).changed() {
                    state.session.set_custom_desk_on_frame(on_frame);
                }
                if ui.button(t("steps.remove")).clicked() {
                    state.session.clear_custom_desk();
                }
            }

            ui.horizontal(|ui| {
                ui.add_enabled_ui(enabled, |ui| {
                    if ui.button(t("steps.upload_texture")).clicked() {
                        if let Some(path) = pick_file(t("steps.upload_texture"), TEXTURE_EXTENSIONS) {
                            state.upload(UploadTarget::TopTexture, path);
                        }
                    }
                });
                if state.session.config.custom_texture_url.is_some()
                    && ui.button(t("steps.clear_texture")).clicked()
                {
                    state.session.clear_top_texture();
                }
            });

            ui.separator();

            // ── Custom frame ──
            ui.strong(t("steps.custom_frame"));
            ui.add_enabled_ui(enabled, |ui| {
                if ui.button(t("steps.upload_model")).clicked() {
                    if let Some(path) = pick_file(t("steps.upload_model"), MODEL_EXTENSIONS) {
                        state.upload(UploadTarget::FrameModel, path);
                    }
                }
            });
            if state.session.config.custom_frame_model_url().is_some() {
                let (scale, position) = (
                    state.session.config.custom_frame_scale,
                    state.session.config.custom_frame_position,
                );
                if let Some(v) = scale_row(ui, scale) {
                    state.session.set_custom_frame_scale(v);
                }
                if let Some((axis, v)) = position_row(ui, position) {
                    state.session.set_custom_frame_axis(axis, v);
                }
                if ui.button(t("steps.remove")).clicked() {
                    state.session.clear_custom_frame();
                }
            }

            ui.separator();

            // ── Decorative elements ──
            ui.strong(t("steps.elements"));
            ui.add_enabled_ui(enabled, |ui| {
                if ui.button(t("steps.add_element")).clicked() {
                    if let Some(path) = pick_file(t("steps.add_element"), MODEL_EXTENSIONS) {
                        state.upload(UploadTarget::Element, path);
                    }
                }
            });
            let elements: Vec<(String, String)> = state
                .session
                .config
                .custom_elements
                .iter()
                .map(|e| (e.id.clone(), e.name.clone()))
                .collect();
            for (id, name) in elements {
                ui.horizontal(|ui| {
                    ui.label(&name);
                    if ui.small_button("✕").clicked() {
                        state.session.remove_element(&id);
                    }
                });
            }
        });
}

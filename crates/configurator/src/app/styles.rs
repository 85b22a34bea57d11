//! Light storefront theme

use eframe::egui;
use egui::{Color32, CornerRadius, FontId, TextStyle};

const ACCENT: Color32 = Color32::from_rgb(37, 99, 235);
const PANEL_FILL: Color32 = Color32::from_rgb(248, 250, 252);

/// Install the theme and the initial font size
pub fn configure_styles(ctx: &egui::Context, font_size: f32) {
    let mut style = (*ctx.style()).clone();

    let mut visuals = egui::Visuals::light();
    visuals.panel_fill = PANEL_FILL;
    visuals.selection.bg_fill = ACCENT;
    visuals.hyperlink_color = ACCENT;
    visuals.window_corner_radius = CornerRadius::same(8);
    visuals.menu_corner_radius = CornerRadius::same(6);
    for widget in [
        &mut visuals.widgets.noninteractive,
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
        &mut visuals.widgets.open,
    ] {
        widget.corner_radius = CornerRadius::same(4);
    }
    style.visuals = visuals;

    style.spacing.item_spacing = egui::vec2(6.0, 5.0);
    style.spacing.button_padding = egui::vec2(8.0, 4.0);
    style.spacing.interact_size.y = 22.0;

    set_font_sizes(&mut style, font_size);
    ctx.set_style(style);
}

/// Change only the font size, keeping the rest of the theme
pub fn apply_font_size(ctx: &egui::Context, font_size: f32) {
    let mut style = (*ctx.style()).clone();
    set_font_sizes(&mut style, font_size);
    ctx.set_style(style);
}

fn set_font_sizes(style: &mut egui::Style, size: f32) {
    let sizes = [
        (TextStyle::Small, FontId::proportional(size * 0.85)),
        (TextStyle::Body, FontId::proportional(size)),
        (TextStyle::Button, FontId::proportional(size)),
        (TextStyle::Heading, FontId::proportional(size * 1.35)),
        (TextStyle::Monospace, FontId::monospace(size)),
    ];
    style.text_styles.extend(sizes);
}

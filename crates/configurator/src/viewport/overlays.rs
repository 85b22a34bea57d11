//! Viewport overlay drawing (dimension guides, axis labels, hints)

use egui::{Align2, Color32, FontId, Painter, Stroke};
use glam::DVec3;

use desk_configurator_lib::overlay::DimensionOverlay;
use desk_configurator_lib::state::settings::OverlaySettings;

use super::camera::ArcBallCamera;
use super::renderer::rgb;

/// Draw the width and depth guides with their labels
pub fn draw_dimensions(
    painter: &Painter,
    rect: egui::Rect,
    camera: &ArcBallCamera,
    overlay: &DimensionOverlay,
    settings: &OverlaySettings,
) {
    let color = rgb(settings.color);
    let stroke = Stroke::new(1.5, color);
    for seg in overlay.segments() {
        if let (Some(a), Some(b)) = (camera.project(seg.start, rect), camera.project(seg.end, rect)) {
            painter.line_segment([a, b], stroke);
        }
    }

    for guide in [&overlay.width, &overlay.depth] {
        let Some(pos) = camera.project(guide.label_position, rect) else {
            continue;
        };
        if !rect.contains(pos) {
            continue;
        }
        let galley = painter.layout_no_wrap(
            guide.label.clone(),
            FontId::proportional(settings.font_size),
            color,
        );
        let bg = Align2::CENTER_CENTER
            .anchor_size(pos, galley.size())
            .expand(3.0);
        painter.rect_filled(bg, 3.0, Color32::from_white_alpha(220));
        painter.galley(bg.min + egui::vec2(3.0, 3.0), galley, color);
    }
}

/// Draw axis labels near the origin
pub fn draw_axis_labels(painter: &Painter, rect: egui::Rect, camera: &ArcBallCamera) {
    let labels = [
        (DVec3::new(40.0, 0.0, 0.0), "X", Color32::from_rgb(220, 70, 70)),
        (DVec3::new(0.0, 40.0, 0.0), "Y", Color32::from_rgb(70, 200, 70)),
        (DVec3::new(0.0, 0.0, 40.0), "Z", Color32::from_rgb(70, 110, 220)),
    ];

    for (pos, label, color) in labels {
        if let Some(screen) = camera.project(pos, rect) {
            if rect.contains(screen) {
                painter.text(screen, Align2::LEFT_BOTTOM, label, FontId::monospace(12.0), color);
            }
        }
    }
}

/// Short hint in the top-left corner
pub fn draw_hint(painter: &Painter, rect: egui::Rect, text: &str) {
    painter.text(
        rect.left_top() + egui::vec2(10.0, 10.0),
        Align2::LEFT_TOP,
        text,
        FontId::proportional(13.0),
        Color32::from_gray(90),
    );
}

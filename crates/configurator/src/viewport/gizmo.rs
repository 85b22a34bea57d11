use glam::DVec3;

use shared::Axis;

use super::camera::ArcBallCamera;

/// Handle length in world units (cm)
pub const AXIS_LENGTH: f64 = 30.0;
/// Pick tolerance around a projected handle, in pixels
const HIT_TOLERANCE: f32 = 8.0;

/// State of the translate gizmo
#[derive(Default)]
pub struct GizmoState {
    /// Currently dragged axis
    pub active_axis: Option<Axis>,
    /// Live absolute position of the dragged part
    pub live: Option<DVec3>,
}

impl GizmoState {
    pub fn dragging(&self) -> bool {
        self.active_axis.is_some()
    }

    pub fn begin_drag(&mut self, axis: Axis, start: DVec3) {
        self.active_axis = Some(axis);
        self.live = Some(start);
    }

    pub fn end_drag(&mut self) -> Option<DVec3> {
        self.active_axis = None;
        self.live.take()
    }
}

pub fn axis_dir(axis: Axis) -> DVec3 {
    match axis {
        Axis::X => DVec3::X,
        Axis::Y => DVec3::Y,
        Axis::Z => DVec3::Z,
    }
}

pub fn axis_color(axis: Axis) -> egui::Color32 {
    match axis {
        Axis::X => egui::Color32::from_rgb(230, 50, 50),
        Axis::Y => egui::Color32::from_rgb(50, 200, 50),
        Axis::Z => egui::Color32::from_rgb(50, 80, 230),
    }
}

/// Which handle, if any, lies under a screen position
pub fn gizmo_hit_test(
    camera: &ArcBallCamera,
    center: DVec3,
    pointer: egui::Pos2,
    rect: egui::Rect,
) -> Option<Axis> {
    let p0 = camera.project(center, rect)?;
    let mut best: Option<(Axis, f32)> = None;
    for axis in Axis::ALL {
        let Some(p1) = camera.project(center + axis_dir(axis) * AXIS_LENGTH, rect) else {
            continue;
        };
        let dist = segment_distance(pointer, p0, p1);
        if dist < HIT_TOLERANCE && best.is_none_or(|(_, d)| dist < d) {
            best = Some((axis, dist));
        }
    }
    best.map(|(axis, _)| axis)
}

/// World-space translation for a screen drag along one axis
pub fn compute_drag_delta(
    camera: &ArcBallCamera,
    center: DVec3,
    axis: Axis,
    screen_delta: egui::Vec2,
    rect: egui::Rect,
) -> DVec3 {
    let dir = axis_dir(axis);
    let (Some(p0), Some(p1)) = (camera.project(center, rect), camera.project(center + dir, rect)) else {
        return DVec3::ZERO;
    };

    let screen_axis = p1 - p0;
    let len = screen_axis.length();
    if len < 1e-3 {
        return DVec3::ZERO;
    }

    // One world unit spans `len` pixels along the projected axis
    let projected = screen_delta.dot(screen_axis / len);
    dir * f64::from(projected / len)
}

/// Draw the three handles with arrowheads
pub fn paint(
    painter: &egui::Painter,
    camera: &ArcBallCamera,
    center: DVec3,
    rect: egui::Rect,
    active: Option<Axis>,
) {
    let Some(origin) = camera.project(center, rect) else {
        return;
    };
    for axis in Axis::ALL {
        let Some(tip) = camera.project(center + axis_dir(axis) * AXIS_LENGTH, rect) else {
            continue;
        };
        let width = if active == Some(axis) { 4.0 } else { 2.5 };
        let stroke = egui::Stroke::new(width, axis_color(axis));
        painter.arrow(origin, tip - origin, stroke);
    }
    painter.circle_filled(origin, 3.5, egui::Color32::WHITE);
}

fn segment_distance(p: egui::Pos2, a: egui::Pos2, b: egui::Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq < 1e-6 {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

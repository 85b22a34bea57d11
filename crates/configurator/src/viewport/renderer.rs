//! Wireframe painting of the composed scene

use egui::{Color32, Painter, Rect, Stroke};
use glam::DVec3;

use desk_configurator_lib::anchor::PartRef;
use desk_configurator_lib::assets::AssetLookup;
use desk_configurator_lib::scene::{PartSource, PlacedPart, Primitive, SceneLayout};
use desk_configurator_lib::state::settings::{GridSettings, ViewportSettings};
use desk_configurator_lib::viewport::picking::Aabb;

use super::camera::ArcBallCamera;

/// Triangle edges drawn per model before falling back to its bounds
const MAX_WIRE_TRIANGLES: usize = 20_000;
const CYLINDER_SEGMENTS: usize = 20;

pub fn rgb(c: [u8; 3]) -> Color32 {
    Color32::from_rgb(c[0], c[1], c[2])
}

/// Everything the scene pass needs besides the layout
pub struct PaintContext<'a> {
    pub painter: &'a Painter,
    pub camera: &'a ArcBallCamera,
    pub rect: Rect,
    pub assets: &'a dyn AssetLookup,
    pub settings: &'a ViewportSettings,
}

impl PaintContext<'_> {
    fn segment(&self, a: DVec3, b: DVec3, stroke: Stroke) {
        if let (Some(pa), Some(pb)) = (self.camera.project(a, self.rect), self.camera.project(b, self.rect)) {
            self.painter.line_segment([pa, pb], stroke);
        }
    }

    fn aabb(&self, aabb: &Aabb, stroke: Stroke) {
        for [a, b] in aabb.edges() {
            self.segment(a, b, stroke);
        }
    }
}

/// Paint every part. `live` replaces the position of the part being dragged.
pub fn paint_scene(
    ctx: &PaintContext<'_>,
    layout: &SceneLayout,
    selected: Option<&PartRef>,
    live: Option<DVec3>,
) {
    for part in &layout.parts {
        let is_selected = selected == Some(&part.part);
        let position = if is_selected { live.unwrap_or(part.position) } else { part.position };
        let color = if is_selected {
            rgb(ctx.settings.selection_color)
        } else {
            rgb(part.color)
        };
        let stroke = Stroke::new(if is_selected { 1.8 } else { 1.0 }, color);
        paint_part(ctx, part, position, stroke);
    }
}

fn paint_part(ctx: &PaintContext<'_>, part: &PlacedPart, position: DVec3, stroke: Stroke) {
    match &part.source {
        PartSource::Standard(prims) => {
            for prim in prims {
                paint_primitive(ctx, prim, position, stroke);
            }
        }
        PartSource::AdminOverride(asset_ref) | PartSource::UserUpload(asset_ref) => {
            // Not loaded yet, or failed: nothing to draw
            let Some(asset) = ctx.assets.asset(&asset_ref.url) else {
                return;
            };
            let scale = asset_ref.scale;
            if asset.triangle_count() > MAX_WIRE_TRIANGLES {
                let b = asset.bounds();
                if !b.is_empty() {
                    ctx.aabb(&Aabb::new(b.min * scale, b.max * scale).translated(position), stroke);
                }
                return;
            }
            for [a, b, c] in asset.triangles() {
                let (a, b, c) = (a * scale + position, b * scale + position, c * scale + position);
                ctx.segment(a, b, stroke);
                ctx.segment(b, c, stroke);
                ctx.segment(c, a, stroke);
            }
        }
    }
}

fn paint_primitive(ctx: &PaintContext<'_>, prim: &Primitive, position: DVec3, stroke: Stroke) {
    match *prim {
        Primitive::Box { .. } => ctx.aabb(&prim.aabb().translated(position), stroke),
        Primitive::Cylinder { center, radius, height } => {
            let c = center + position;
            let ring = |y: f64| -> Vec<DVec3> {
                (0..=CYLINDER_SEGMENTS)
                    .map(|i| {
                        let a = i as f64 * std::f64::consts::TAU / CYLINDER_SEGMENTS as f64;
                        DVec3::new(c.x + radius * a.cos(), y, c.z + radius * a.sin())
                    })
                    .collect()
            };
            let bottom = ring(c.y - height / 2.0);
            let top = ring(c.y + height / 2.0);
            for w in bottom.windows(2).chain(top.windows(2)) {
                ctx.segment(w[0], w[1], stroke);
            }
            for i in (0..CYLINDER_SEGMENTS).step_by(CYLINDER_SEGMENTS / 4) {
                ctx.segment(bottom[i], top[i], stroke);
            }
        }
    }
}

/// Floor grid on y = 0
pub fn paint_grid(ctx: &PaintContext<'_>, grid: &GridSettings) {
    if !grid.visible || grid.size <= 0.0 {
        return;
    }
    let step = f64::from(grid.size);
    let extent = step * f64::from(grid.range);
    let minor = Stroke::new(0.5, Color32::from_gray(200));
    let axis = Stroke::new(1.0, Color32::from_gray(160));
    for i in -grid.range..=grid.range {
        let v = f64::from(i) * step;
        let stroke = if i == 0 { axis } else { minor };
        ctx.segment(DVec3::new(v, 0.0, -extent), DVec3::new(v, 0.0, extent), stroke);
        ctx.segment(DVec3::new(-extent, 0.0, v), DVec3::new(extent, 0.0, v), stroke);
    }
}

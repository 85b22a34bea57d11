//! Configuration mutations

use shared::{Axis, CustomElement, DeskConfig, DeskSize, PartId, CUSTOM_DEPTH_RANGE, CUSTOM_WIDTH_RANGE};

use super::SessionState;

/// Add `id` when absent, remove it when present; keeps selection order
fn toggle(list: &mut Vec<PartId>, id: &str) -> bool {
    if let Some(pos) = list.iter().position(|x| x == id) {
        list.remove(pos);
        false
    } else {
        list.push(id.to_string());
        true
    }
}

impl SessionState {
    pub fn select_size(&mut self, size: DeskSize) {
        self.config.size = size;
        self.version += 1;
    }

    pub fn select_top_color(&mut self, id: &str) {
        self.config.top_color = id.to_string();
        self.version += 1;
    }

    pub fn select_frame_type(&mut self, id: &str) {
        self.config.frame_type = id.to_string();
        self.version += 1;
    }

    pub fn select_frame_color(&mut self, id: &str) {
        self.config.frame_color = id.to_string();
        self.version += 1;
    }

    /// Set the custom width, clamped to the allowed range.
    /// Ignored unless the custom size is selected.
    pub fn set_custom_width(&mut self, width: f64) -> bool {
        if !self.config.size.is_custom() {
            return false;
        }
        let (min, max) = CUSTOM_WIDTH_RANGE;
        self.config.custom_width = if width.is_nan() { min } else { width.clamp(min, max) };
        self.version += 1;
        true
    }

    /// Set the custom depth, clamped to the allowed range.
    /// Ignored unless the custom size is selected.
    pub fn set_custom_depth(&mut self, depth: f64) -> bool {
        if !self.config.size.is_custom() {
            return false;
        }
        let (min, max) = CUSTOM_DEPTH_RANGE;
        self.config.custom_depth = if depth.is_nan() { min } else { depth.clamp(min, max) };
        self.version += 1;
        true
    }

    /// Returns whether the accessory is selected afterwards
    pub fn toggle_accessory(&mut self, id: &str) -> bool {
        self.version += 1;
        toggle(&mut self.config.accessories, id)
    }

    /// Returns whether the add-on is selected afterwards
    pub fn toggle_addon(&mut self, id: &str) -> bool {
        self.version += 1;
        toggle(&mut self.config.addons, id)
    }

    // ── User-uploaded top ──

    /// Use an uploaded model as the desk top, at unit scale and no offset
    pub fn apply_desk_model(&mut self, url: &str) {
        self.config.custom_desk_model_url = Some(url.to_string());
        self.config.custom_desk_scale = 1.0;
        self.config.custom_desk_position = [0.0; 3];
        self.version += 1;
    }

    pub fn set_custom_desk_scale(&mut self, scale: f64) {
        self.config.custom_desk_scale = scale;
        self.version += 1;
    }

    pub fn set_custom_desk_axis(&mut self, axis: Axis, value: f64) {
        self.config.custom_desk_position[axis.index()] = value;
        self.version += 1;
    }

    pub fn set_custom_desk_on_frame(&mut self, on_frame: bool) {
        self.config.custom_desk_on_frame = on_frame;
        self.version += 1;
    }

    /// Drop the uploaded top reference; scale/offset are kept
    pub fn clear_custom_desk(&mut self) {
        self.config.custom_desk_model_url = None;
        self.version += 1;
    }

    pub fn apply_top_texture(&mut self, url: &str) {
        self.config.custom_texture_url = Some(url.to_string());
        self.version += 1;
    }

    pub fn clear_top_texture(&mut self) {
        self.config.custom_texture_url = None;
        self.version += 1;
    }

    // ── User-uploaded frame ──

    /// Use an uploaded model as the frame, at unit scale and no offset
    pub fn apply_frame_model(&mut self, url: &str) {
        self.config.custom_frame_url = Some(url.to_string());
        self.config.custom_frame_scale = 1.0;
        self.config.custom_frame_position = [0.0; 3];
        self.version += 1;
    }

    pub fn set_custom_frame_scale(&mut self, scale: f64) {
        self.config.custom_frame_scale = scale;
        self.version += 1;
    }

    pub fn set_custom_frame_axis(&mut self, axis: Axis, value: f64) {
        self.config.custom_frame_position[axis.index()] = value;
        self.version += 1;
    }

    /// Drop the uploaded frame reference; scale/offset are kept
    pub fn clear_custom_frame(&mut self) {
        self.config.custom_frame_url = None;
        self.version += 1;
    }

    // ── Decorative elements ──

    /// Append a decorative element and return its id
    pub fn add_element(&mut self, name: &str, url: &str) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.config.custom_elements.push(CustomElement {
            id: id.clone(),
            name: name.to_string(),
            url: url.to_string(),
        });
        self.version += 1;
        id
    }

    /// Returns whether an element was removed
    pub fn remove_element(&mut self, id: &str) -> bool {
        let before = self.config.custom_elements.len();
        self.config.custom_elements.retain(|e| e.id != id);
        let removed = self.config.custom_elements.len() != before;
        if removed {
            self.version += 1;
        }
        removed
    }

    /// Back to the default configuration. The override registry is kept.
    pub fn reset(&mut self) {
        self.config = DeskConfig::default();
        self.version += 1;
    }
}

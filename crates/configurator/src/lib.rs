// Library crate: the configurator core, exposed for integration tests and the
// JSON command interface. Windowing, panels, and painting stay in the binary.

pub mod anchor;
pub mod assets;
pub mod cloud;
pub mod command;
pub mod dimensions;
pub mod fixtures;
pub mod harness;
pub mod measure;
pub mod overlay;
pub mod overrides;
pub mod placement;
pub mod scene;
pub mod state;

/// Ray casting and bounds shared by scene picking and the viewport.
/// Camera, gizmo, and painting stay in the binary crate.
pub mod viewport {
    pub mod picking;
}

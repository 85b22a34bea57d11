//! End-to-end scenarios on the headless configurator harness.
//!
//! Each test drives the same session/placement/measurement pipeline the
//! desktop app runs, with in-memory meshes standing in for downloads.

use glam::DVec3;

use desk_configurator_lib::anchor::PartRef;
use desk_configurator_lib::fixtures;
use desk_configurator_lib::harness::ConfiguratorHarness;
use desk_configurator_lib::overrides::OverridePatch;
use desk_configurator_lib::scene::PartSource;
use desk_configurator_lib::viewport::picking::Ray;
use shared::DeskSize;

#[test]
fn test_nominal_size_dimensions() {
    let h = ConfiguratorHarness::with_payload(fixtures::payload(fixtures::sized_config(140, 70), vec![]));
    let d = h.dimensions();
    assert_eq!(d.width, 140.0);
    assert_eq!(d.depth, 70.0);
    assert_eq!(d.height, 75.0);
    assert_eq!(d.top_thickness, 2.5);
}

#[test]
fn test_custom_size_price() {
    let h = ConfiguratorHarness::with_payload(fixtures::payload(fixtures::custom_size_config(180.0, 90.0), vec![]));
    assert_eq!(h.catalog.size_price(&h.session.config), 1460);
    assert_eq!(h.dimensions().width, 180.0);
    assert_eq!(h.dimensions().depth, 90.0);
}

#[test]
fn test_grommet_anchored_on_top_surface() {
    let h = ConfiguratorHarness::with_payload(fixtures::payload(
        fixtures::equipped_config(&["grommet"], &[]),
        vec![],
    ));
    let grommet = h.part("grommet").unwrap();
    assert_eq!(grommet.anchor, DVec3::new(0.0, 77.5, 0.0));
    assert_eq!(grommet.position.y, 77.5);

    let PartSource::Standard(prims) = &grommet.source else {
        panic!("grommet without override should use the mock");
    };
    // embedded in the top: center half a thickness below the surface
    assert_eq!(grommet.position.y + prims[0].center().y, 76.25);
}

#[test]
fn test_addon_hangs_under_top() {
    let h = ConfiguratorHarness::with_payload(fixtures::payload(
        fixtures::equipped_config(&[], &["drawer"]),
        vec![],
    ));
    assert_eq!(h.position_of("drawer"), Some(DVec3::new(0.0, 75.0, 0.0)));
}

#[test]
fn test_drag_top_commits_relative_offset() {
    let mut h = ConfiguratorHarness::new();
    h.set_edit_mode(true);

    let commit = h.drag("140x70", DVec3::new(0.0, 80.0, 0.0)).unwrap();
    assert_eq!(commit.part, PartRef::Top("140x70".into()));
    assert_eq!(commit.offset, [0.0, 5.0, 0.0]);
    assert_eq!(h.position_of("140x70").unwrap().y, 80.0);

    // The committed record is a position-only stub
    let record = h.session.overrides.get("140x70").unwrap();
    assert_eq!(record.file_name, "Manual edit");
    assert!(!record.is_active());

    // Reloading the same payload reproduces the absolute position
    let reloaded = ConfiguratorHarness::with_payload(h.session.payload());
    assert_eq!(reloaded.position_of("140x70").unwrap().y, 80.0);
}

#[test]
fn test_offset_survives_size_switch_back() {
    let mut h = ConfiguratorHarness::new();
    h.set_edit_mode(true);
    h.drag("140x70", DVec3::new(10.0, 75.0, 0.0)).unwrap();

    h.select_size(DeskSize::nominal(160, 80));
    assert_eq!(h.position_of("160x80"), Some(DVec3::new(0.0, 75.0, 0.0)));

    h.select_size(DeskSize::nominal(140, 70));
    assert_eq!(h.position_of("140x70"), Some(DVec3::new(10.0, 75.0, 0.0)));
}

#[test]
fn test_remove_frame_override_reverts_to_standard() {
    let mut h = ConfiguratorHarness::new();
    h.session.set_override(
        "electric",
        OverridePatch {
            position: Some([0.0, 3.0, 0.0]),
            ..OverridePatch::model("https://cdn/electric.stl", "electric.stl")
        },
    );

    let frame = h.part("electric").unwrap();
    assert!(matches!(frame.source, PartSource::AdminOverride(_)));
    assert_eq!(frame.anchor, DVec3::ZERO);
    assert_eq!(frame.position.y, 3.0);

    assert!(h.session.remove_override("electric").is_some());
    let frame = h.part("electric").unwrap();
    assert!(matches!(frame.source, PartSource::Standard(_)));
    assert_eq!(frame.anchor, DVec3::ZERO);
    assert_eq!(frame.position, DVec3::ZERO);
}

#[test]
fn test_admin_top_override_trusts_model_height() {
    let mut h = ConfiguratorHarness::with_payload(fixtures::payload(
        fixtures::default_config(),
        vec![("140x70", fixtures::model_override("https://cdn/top.stl"))],
    ));
    let top = h.part("140x70").unwrap();
    assert!(matches!(top.source, PartSource::AdminOverride(_)));
    assert_eq!(top.position, DVec3::ZERO);
    // the overlay stays at frame height
    assert_eq!(h.overlay().width.line.start.y, 80.0);
}

#[test]
fn test_scaled_off_center_top_recenters_overlay() {
    let mut h = ConfiguratorHarness::with_payload(fixtures::payload(
        fixtures::user_top_config("mem://top.stl", 2.0, true),
        vec![],
    ));
    h.insert_asset("mem://top.stl", fixtures::off_center_slab());

    let m = h.measured().unwrap();
    assert_eq!(m.center_offset, [60.0, -20.0]);
    assert_eq!(m.width, 200.0);
    assert_eq!(m.depth, 120.0);

    let overlay = h.overlay();
    assert_eq!(overlay.width.label, "200 cm");
    assert_eq!(overlay.depth.label, "120 cm");
    // width guide spans the measured footprint around the shifted center
    assert_eq!(overlay.width.line.start.x, -40.0);
    assert_eq!(overlay.width.line.end.x, 160.0);
    // depth guide centered on z = -20
    let mid_z = (overlay.depth.line.start.z + overlay.depth.line.end.z) / 2.0;
    assert_eq!(mid_z, -20.0);
}

#[test]
fn test_overlay_uses_nominal_size_until_asset_loads() {
    let mut h = ConfiguratorHarness::with_payload(fixtures::payload(
        fixtures::user_top_config("mem://top.stl", 1.0, false),
        vec![],
    ));
    let overlay = h.overlay();
    assert_eq!(overlay.width.value, 140.0);
    assert_eq!(overlay.depth.value, 70.0);

    h.insert_asset("mem://top.stl", fixtures::slab_mesh(120.0, 3.0, 60.0));
    assert_eq!(h.overlay().width.value, 120.0);
}

#[test]
fn test_measurement_memoized_per_asset_and_scale() {
    let mut h = ConfiguratorHarness::with_payload(fixtures::payload(
        fixtures::user_top_config("mem://top.stl", 1.0, true),
        vec![],
    ));
    h.insert_asset("mem://top.stl", fixtures::off_center_slab());

    h.measured();
    h.measured();
    h.overlay();
    assert_eq!(h.measurement_count(), 1);

    h.session.set_custom_desk_scale(1.5);
    assert_eq!(h.measured().unwrap().width, 150.0);
    assert_eq!(h.measurement_count(), 2);
}

#[test]
fn test_user_top_on_frame_toggle() {
    let mut h = ConfiguratorHarness::with_payload(fixtures::payload(
        fixtures::user_top_config("mem://top.stl", 1.0, false),
        vec![],
    ));
    assert_eq!(h.position_of("user-desk"), Some(DVec3::ZERO));
    assert!(h.part("140x70").is_none());

    h.session.set_custom_desk_on_frame(true);
    assert_eq!(h.position_of("user-desk"), Some(DVec3::new(0.0, 75.0, 0.0)));
}

#[test]
fn test_drag_user_top_writes_config() {
    let mut h = ConfiguratorHarness::with_payload(fixtures::payload(
        fixtures::user_top_config("mem://top.stl", 1.0, true),
        vec![],
    ));
    h.set_edit_mode(true);
    h.drag("user-desk", DVec3::new(12.4, 76.0, -3.6)).unwrap();
    assert_eq!(h.session.config.custom_desk_position, [12.0, 1.0, -4.0]);
    assert!(h.session.overrides.is_empty());
}

#[test]
fn test_elements_sit_in_a_row_and_cannot_be_selected() {
    let mut h = ConfiguratorHarness::new();
    let first = h.session.add_element("vase.stl", "mem://vase.stl");
    let second = h.session.add_element("lamp.stl", "mem://lamp.stl");
    assert_ne!(first, second);

    let a = h.position_of(&format!("element:{first}")).unwrap();
    let b = h.position_of(&format!("element:{second}")).unwrap();
    assert_eq!(a, DVec3::new(30.0, 0.0, 30.0));
    assert_eq!(b, DVec3::new(60.0, 0.0, 30.0));

    h.set_edit_mode(true);
    assert!(!h.click(&format!("element:{first}")));
}

#[test]
fn test_ray_pick_prefers_top_over_frame() {
    let mut h = ConfiguratorHarness::new();
    h.set_edit_mode(true);
    let ray = Ray {
        origin: DVec3::new(0.0, 200.0, 0.0),
        direction: DVec3::new(0.0, -1.0, 0.0),
    };
    assert_eq!(h.click_ray(&ray), Some(PartRef::Top("140x70".into())));
    assert_eq!(h.placement.selected(), Some(&PartRef::Top("140x70".into())));

    let miss = Ray {
        origin: DVec3::new(500.0, 200.0, 500.0),
        direction: DVec3::new(0.0, -1.0, 0.0),
    };
    assert_eq!(h.click_ray(&miss), None);
    assert!(h.placement.selected().is_none());
}

#[test]
fn test_leaving_edit_mode_drops_selection() {
    let mut h = ConfiguratorHarness::new();
    h.set_edit_mode(true);
    assert!(h.click("electric"));
    h.set_edit_mode(false);
    assert!(h.placement.selected().is_none());
    assert!(h.placement.orbit_enabled());
}

#[test]
fn test_deselected_accessory_drops_selection() {
    let mut h = ConfiguratorHarness::with_payload(fixtures::payload(
        fixtures::equipped_config(&["grommet"], &[]),
        vec![],
    ));
    h.set_edit_mode(true);
    assert!(h.click("grommet"));
    h.session.toggle_accessory("grommet");
    h.sync_selection();
    assert!(h.placement.selected().is_none());
}

//! Integration tests for scene state and persistence.

use doodle_engine::command::parse_command_simple;
use doodle_engine::dispatch::dispatch;
use doodle_engine::error::SceneError;
use doodle_engine::fixtures::*;
use doodle_engine::molecule::{find_molecule, instantiate_molecule};
use doodle_engine::scene::SceneState;
use shared::{ObjectPatch, SceneFile};

fn counter(prefix: &'static str) -> impl FnMut() -> String {
    let mut n = 0;
    move || {
        n += 1;
        format!("{prefix}{n}")
    }
}

#[test]
fn test_save_load_round_trip_every_kind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.json");

    let original = SceneState::from_scene_file(full_scene_file()).unwrap();
    original.save_to_path(&path).unwrap();
    let first = std::fs::read_to_string(&path).unwrap();

    let loaded = SceneState::load_from_path(&path).unwrap();
    assert_eq!(loaded.scene(), original.scene());
    loaded.save_to_path(&path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), first);

    let kinds: Vec<&str> = loaded.objects().iter().map(|o| o.kind_name()).collect();
    for kind in [
        "cube", "sphere", "cylinder", "cone", "torus", "pyramid", "plane", "text3d", "atom",
        "bond", "custom_drawing",
    ] {
        assert!(kinds.contains(&kind), "missing {kind}");
    }
}

#[test]
fn test_scene_file_format() {
    let state = SceneState::from_scene_file(full_scene_file()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&state.to_json().unwrap()).unwrap();
    let settings = value["settings"].as_object().unwrap();
    let mut keys: Vec<&str> = settings.keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, ["backgroundColor", "cameraMode", "showAxes", "showGrid"]);

    let file: SceneFile = serde_json::from_value(value).unwrap();
    assert_eq!(file, full_scene_file());
}

#[test]
fn test_two_molecules_stay_independent() {
    let water = find_molecule("water").unwrap();
    let mut ids = counter("w");
    let mut scene = SceneState::new();
    scene
        .add_objects(instantiate_molecule(water, [0.0; 3], &mut ids).into_objects())
        .unwrap();
    scene
        .add_objects(instantiate_molecule(water, [5.0, 0.0, 0.0], &mut ids).into_objects())
        .unwrap();
    assert_eq!(scene.len(), 10);

    // Removing the first oxygen takes its two bonds; the second molecule is untouched
    let removed = scene.remove_object("w1").unwrap();
    assert_eq!(removed, ["w1", "w4", "w5"]);
    assert_eq!(scene.len(), 7);
    assert_eq!(scene.objects_of_kind("bond").count(), 2);

    assert!(scene.undo());
    assert_eq!(scene.len(), 10);
}

#[test]
fn test_rejected_edits_do_not_change_version() {
    let mut scene = SceneState::new();
    scene.add_object(cube_object("c")).unwrap();
    let version = scene.version();

    let err = scene.add_object(cube_object("c")).unwrap_err();
    assert!(matches!(err, SceneError::DuplicateId(_)));

    let err = scene.add_object(bond_object("b", "c", "c")).unwrap_err();
    assert!(matches!(err, SceneError::DanglingReference { .. }));

    let mut bad = scene.get_object("c").unwrap().material.clone();
    bad.roughness = 2.0;
    let err = scene
        .update_object("c", ObjectPatch { material: Some(bad), ..Default::default() })
        .unwrap_err();
    assert!(matches!(err, SceneError::InvalidMaterial { .. }));

    assert_eq!(scene.version(), version);
}

#[test]
fn test_overflowing_commands_keep_scene_reloadable() {
    let mut scene = SceneState::new();
    let huge = "9".repeat(320);
    let cmd = parse_command_simple(&format!("create a cube at {huge}, 0, 0"));
    let outcome = dispatch(&cmd, &mut scene).unwrap();
    assert_eq!(outcome.created.len(), 1);
    assert_eq!(scene.objects()[0].position, [0.0, 0.0, 0.0]);

    // Finite size whose row spacing or plane width overflows
    let big = "9".repeat(308);
    let version = scene.version();
    let cmd = parse_command_simple(&format!("create 5 cubes in a row size {big}"));
    let err = dispatch(&cmd, &mut scene).unwrap_err();
    assert!(matches!(err, SceneError::NonFiniteTransform { field: "position", .. }));
    let cmd = parse_command_simple(&format!("create a plane size {big}"));
    let err = dispatch(&cmd, &mut scene).unwrap_err();
    assert!(matches!(err, SceneError::NonFiniteGeometry { kind: "plane", .. }));
    assert_eq!(scene.version(), version);

    let reloaded = SceneState::from_json(&scene.to_json().unwrap()).unwrap();
    assert_eq!(reloaded.scene(), scene.scene());
}

#[test]
fn test_autosave_tracks_undo() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("autosave.json");

    let mut scene = SceneState::restore_autosave(path.clone());
    scene.add_object(cube_object("a")).unwrap();
    scene.add_object(cube_object("b")).unwrap();
    scene.undo();

    let restored = SceneState::restore_autosave(path);
    assert_eq!(restored.object_ids(), ["a"]);
    assert!(!restored.can_undo());
}

//! Applying parsed commands to a scene.

use std::f64::consts::TAU;

use shared::{
    Arrangement, CommandAction, CommandProperties, CommandTarget, ObjectId, ObjectPatch, Object3D,
    ParsedCommand,
};

use crate::error::SceneResult;
use crate::factory::{create_primitive, PrimitiveKind, PrimitiveParams};
use crate::molecule::{find_molecule, instantiate_molecule};
use crate::scene::SceneState;

/// Upper bound on copies created by one command.
pub const MAX_COUNT: u32 = 20;

/// Spacing between copies, relative to their size.
const SPACING: f64 = 1.5;

const MIN_CIRCLE_RADIUS: f64 = 2.0;

/// What a command did to the scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchOutcome {
    pub created: Vec<Object3D>,
    pub updated: Vec<Object3D>,
    pub removed: Vec<ObjectId>,
    /// Why nothing happened, when nothing did.
    pub note: Option<String>,
}

impl DispatchOutcome {
    fn note(message: impl Into<String>) -> Self {
        Self {
            note: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_noop(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

/// Positions for `count` copies around `base`.
///
/// Lines run along x, circles lie in the XZ plane, grids fill rows along x
/// then z. A single copy always sits at `base`.
pub fn layout_positions(
    base: [f64; 3],
    count: usize,
    size: f64,
    arrangement: Arrangement,
) -> Vec<[f64; 3]> {
    if count <= 1 {
        return vec![base; count];
    }
    let [bx, by, bz] = base;
    let spacing = SPACING * size;
    let centered = |i: usize, n: usize| (i as f64 - (n as f64 - 1.0) / 2.0) * spacing;

    match arrangement {
        Arrangement::Line => (0..count).map(|i| [bx + centered(i, count), by, bz]).collect(),
        Arrangement::Circle => {
            let radius = (count as f64 * size * 0.4).max(MIN_CIRCLE_RADIUS);
            (0..count)
                .map(|i| {
                    let angle = TAU * i as f64 / count as f64;
                    [bx + radius * angle.cos(), by, bz + radius * angle.sin()]
                })
                .collect()
        }
        Arrangement::Grid => {
            let cols = (count as f64).sqrt().ceil() as usize;
            let rows = count.div_ceil(cols);
            (0..count)
                .map(|i| [bx + centered(i % cols, cols), by, bz + centered(i / cols, rows)])
                .collect()
        }
    }
}

/// Apply `command` to `scene` with fresh uuid ids.
pub fn dispatch(command: &ParsedCommand, scene: &mut SceneState) -> SceneResult<DispatchOutcome> {
    dispatch_with_ids(command, scene, crate::new_object_id)
}

/// Apply `command` to `scene`, drawing ids for new objects from `next_id`.
pub fn dispatch_with_ids(
    command: &ParsedCommand,
    scene: &mut SceneState,
    mut next_id: impl FnMut() -> ObjectId,
) -> SceneResult<DispatchOutcome> {
    let empty = CommandProperties::default();
    let props = command.properties.as_ref().unwrap_or(&empty);

    let outcome = match command.action {
        CommandAction::Create => {
            let objects = match plan_create(command.object_kind, props, &mut next_id) {
                Ok(objects) => objects,
                Err(note) => return Ok(DispatchOutcome::note(note)),
            };
            scene.add_objects(objects.clone())?;
            DispatchOutcome {
                created: objects,
                ..DispatchOutcome::default()
            }
        }
        CommandAction::Delete => delete_last(command.object_kind, scene)?,
        CommandAction::Modify => modify_last(command.object_kind, props, scene)?,
        CommandAction::Clear => DispatchOutcome {
            removed: scene.clear(),
            ..DispatchOutcome::default()
        },
        CommandAction::Unknown => DispatchOutcome::note(
            command
                .error
                .clone()
                .unwrap_or_else(|| "Command not understood".to_string()),
        ),
    };

    tracing::debug!(
        action = ?command.action,
        created = outcome.created.len(),
        updated = outcome.updated.len(),
        removed = outcome.removed.len(),
        "Dispatched command"
    );
    Ok(outcome)
}

/// Objects a create command would add, or a note explaining why none.
pub fn plan_create(
    target: Option<CommandTarget>,
    props: &CommandProperties,
    next_id: &mut impl FnMut() -> ObjectId,
) -> Result<Vec<Object3D>, String> {
    let target = target.ok_or_else(|| "Nothing to create".to_string())?;
    let base = props.position.unwrap_or_default();

    let Some(kind) = PrimitiveKind::from_target(target) else {
        let name = props
            .molecule_name
            .as_deref()
            .ok_or_else(|| "Molecule not found".to_string())?;
        let template = find_molecule(name).map_err(|e| e.to_string())?;
        return Ok(instantiate_molecule(template, base, next_id).into_objects());
    };

    let size = props.size.filter(|s| s.is_finite() && *s > 0.0).unwrap_or(1.0);
    let count = props.count.unwrap_or(1).clamp(1, MAX_COUNT) as usize;
    let arrangement = props.arrangement.unwrap_or(Arrangement::Line);
    let hints = props.material_hints.unwrap_or_default();

    let objects = layout_positions(base, count, size, arrangement)
        .into_iter()
        .enumerate()
        .map(|(i, position)| {
            let params = PrimitiveParams {
                size,
                color: props.color.clone(),
                position,
                text: props.text.clone(),
                ..PrimitiveParams::default()
            };
            let mut obj = create_primitive(next_id(), kind, &params);
            hints.apply(&mut obj.material);
            if count > 1 {
                obj.name = format!("{} {}", obj.name, i + 1);
            }
            obj
        })
        .collect();
    Ok(objects)
}

fn kind_name(target: CommandTarget) -> &'static str {
    match target {
        CommandTarget::Molecule => "atom",
        other => other.as_str(),
    }
}

fn pick_last(target: Option<CommandTarget>, scene: &SceneState) -> Option<ObjectId> {
    match target {
        Some(target) => scene.last_object_of_kind(kind_name(target)),
        None => scene.last_object(),
    }
    .map(|o| o.id.clone())
}

fn describe(target: Option<CommandTarget>) -> &'static str {
    target.map(|t| t.as_str()).unwrap_or("object")
}

fn delete_last(target: Option<CommandTarget>, scene: &mut SceneState) -> SceneResult<DispatchOutcome> {
    let Some(id) = pick_last(target, scene) else {
        return Ok(DispatchOutcome::note(format!("No {} to delete", describe(target))));
    };
    Ok(DispatchOutcome {
        removed: scene.remove_object(&id)?,
        ..DispatchOutcome::default()
    })
}

fn modify_last(
    target: Option<CommandTarget>,
    props: &CommandProperties,
    scene: &mut SceneState,
) -> SceneResult<DispatchOutcome> {
    let Some(id) = pick_last(target, scene) else {
        return Ok(DispatchOutcome::note(format!("No {} to modify", describe(target))));
    };
    let Some(current) = scene.get_object(&id) else {
        return Ok(DispatchOutcome::note(format!("No {} to modify", describe(target))));
    };

    let hints = props.material_hints.unwrap_or_default();
    let material = (props.color.is_some() || !hints.is_empty()).then(|| {
        let mut material = current.material.clone();
        if let Some(color) = &props.color {
            material.color = color.clone();
        }
        hints.apply(&mut material);
        material
    });

    let patch = ObjectPatch {
        position: props.position,
        scale: props.size.map(|s| [s, s, s]),
        material,
        ..ObjectPatch::default()
    };
    let updated = scene.update_object(&id, patch)?;
    Ok(DispatchOutcome {
        updated: vec![updated],
        ..DispatchOutcome::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::parse_command_simple;
    use shared::{MaterialKind, ObjectKind};

    fn counter() -> impl FnMut() -> ObjectId {
        let mut n = 0;
        move || {
            n += 1;
            format!("id{n}")
        }
    }

    fn run(scene: &mut SceneState, text: &str) -> DispatchOutcome {
        dispatch_with_ids(&parse_command_simple(text), scene, counter()).unwrap()
    }

    fn approx(a: [f64; 3], b: [f64; 3]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn test_line_layout_is_centered() {
        let positions = layout_positions([0.0, 1.0, 0.0], 3, 2.0, Arrangement::Line);
        assert_eq!(positions, [[-3.0, 1.0, 0.0], [0.0, 1.0, 0.0], [3.0, 1.0, 0.0]]);
    }

    #[test]
    fn test_circle_layout_radius() {
        let small = layout_positions([0.0; 3], 4, 1.0, Arrangement::Circle);
        assert!(approx(small[0], [2.0, 0.0, 0.0]));
        assert!(approx(small[1], [0.0, 0.0, 2.0]));

        let large = layout_positions([0.0; 3], 10, 1.0, Arrangement::Circle);
        assert!(approx(large[0], [4.0, 0.0, 0.0]));
    }

    #[test]
    fn test_grid_layout() {
        let positions = layout_positions([0.0; 3], 5, 1.0, Arrangement::Grid);
        assert_eq!(positions.len(), 5);
        assert_eq!(positions[0], [-1.5, 0.0, -0.75]);
        assert_eq!(positions[2], [1.5, 0.0, -0.75]);
        assert_eq!(positions[3], [-1.5, 0.0, 0.75]);
    }

    #[test]
    fn test_single_copy_at_base() {
        for arrangement in [Arrangement::Line, Arrangement::Circle, Arrangement::Grid] {
            assert_eq!(layout_positions([1.0, 2.0, 3.0], 1, 1.0, arrangement), [[1.0, 2.0, 3.0]]);
        }
    }

    #[test]
    fn test_create_red_sphere() {
        let mut scene = SceneState::new();
        let outcome = run(&mut scene, "create a red sphere");
        assert_eq!(outcome.created.len(), 1);
        let sphere = scene.get_object("id1").unwrap();
        assert_eq!(sphere.material.color, "#FF0000");
        assert_eq!(sphere.kind, ObjectKind::Sphere { radius: 0.5, segments: 32 });
    }

    #[test]
    fn test_count_is_clamped() {
        let mut scene = SceneState::new();
        let outcome = run(&mut scene, "create 50 cubes in a grid");
        assert_eq!(outcome.created.len(), MAX_COUNT as usize);
        assert_eq!(scene.len(), 20);
        assert_eq!(outcome.created[0].name, "Cube 1");
    }

    #[test]
    fn test_material_hints_after_color() {
        let mut scene = SceneState::new();
        let outcome = run(&mut scene, "create a glowing metallic gold torus");
        let material = &outcome.created[0].material;
        assert_eq!(material.color, "#FFD700");
        assert_eq!(material.emissive, "#FFD700");
        assert_eq!(material.emissive_intensity, 0.5);
        assert_eq!(material.kind, MaterialKind::Metallic);
        assert_eq!(material.metalness, 1.0);
    }

    #[test]
    fn test_create_molecule() {
        let mut scene = SceneState::new();
        let outcome = run(&mut scene, "create a methane molecule to the right");
        assert_eq!(outcome.created.len(), 9);
        assert_eq!(scene.objects_of_kind("atom").count(), 5);
        assert_eq!(scene.objects_of_kind("bond").count(), 4);
        assert_eq!(scene.get_object("id1").unwrap().position, [3.0, 0.0, 0.0]);
    }

    #[test]
    fn test_delete_last_of_kind() {
        let mut scene = SceneState::new();
        run(&mut scene, "create a sphere");
        dispatch_with_ids(&parse_command_simple("create a cube"), &mut scene, || "cube".into()).unwrap();
        let outcome = run(&mut scene, "delete the sphere");
        assert_eq!(outcome.removed, ["id1"]);
        assert_eq!(scene.object_ids(), ["cube"]);

        let outcome = run(&mut scene, "delete the sphere");
        assert!(outcome.is_noop());
        assert_eq!(outcome.note.as_deref(), Some("No sphere to delete"));
    }

    #[test]
    fn test_delete_molecule_atom_cascades() {
        let mut scene = SceneState::new();
        run(&mut scene, "create a water molecule");
        let outcome = dispatch_with_ids(
            &ParsedCommand {
                object_kind: Some(CommandTarget::Molecule),
                ..ParsedCommand::new(CommandAction::Delete)
            },
            &mut scene,
            counter(),
        )
        .unwrap();
        // Last atom is the second hydrogen, bound to the oxygen by the last bond
        assert_eq!(outcome.removed, ["id3", "id5"]);
    }

    #[test]
    fn test_modify_last() {
        let mut scene = SceneState::new();
        run(&mut scene, "create a cube");
        let outcome = run(&mut scene, "make it huge and blue");
        let cube = &outcome.updated[0];
        assert_eq!(cube.scale, [3.0, 3.0, 3.0]);
        assert_eq!(cube.material.color, "#0000FF");

        let outcome = run(&mut scene, "move it to the left");
        assert_eq!(outcome.updated[0].position, [-3.0, 0.0, 0.0]);
        assert_eq!(outcome.updated[0].material.color, "#0000FF");
    }

    #[test]
    fn test_modify_empty_scene() {
        let mut scene = SceneState::new();
        let outcome = run(&mut scene, "make it red");
        assert_eq!(outcome.note.as_deref(), Some("No object to modify"));
    }

    #[test]
    fn test_clear_and_unknown() {
        let mut scene = SceneState::new();
        run(&mut scene, "create 3 spheres");
        let outcome = run(&mut scene, "clear");
        assert_eq!(outcome.removed.len(), 3);
        assert!(scene.is_empty());

        let outcome = run(&mut scene, "dance wildly");
        assert!(outcome.is_noop());
        assert!(outcome.note.unwrap().contains("Unrecognized command"));
    }

    #[test]
    fn test_missing_molecule_is_a_note() {
        let mut scene = SceneState::new();
        let command = ParsedCommand {
            object_kind: Some(CommandTarget::Molecule),
            properties: Some(CommandProperties {
                molecule_name: Some("caffeine".into()),
                ..Default::default()
            }),
            ..ParsedCommand::new(CommandAction::Create)
        };
        let outcome = dispatch_with_ids(&command, &mut scene, counter()).unwrap();
        assert_eq!(outcome.note.as_deref(), Some("Molecule not found: caffeine"));
        assert!(scene.is_empty());
    }
}

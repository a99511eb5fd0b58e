use bevy::prelude::*;

use analysis::massing::{self, MassingSnapshot, FLOOR_HEIGHT};
use analysis::progress::OptimizationRun;
use analysis::site::BuildingSpec;

/// Edge thickness in the unit cube's local space. Children inherit the body
/// scale, so the frame thickens in proportion to the envelope.
const EDGE_THICKNESS: f32 = 0.015;

/// Floor slab lines overhang the body slightly so they stay visible.
const FLOOR_OVERHANG: f32 = 1.01;
const FLOOR_LINE_HEIGHT: f32 = 0.06;

const BODY_ALPHA: f32 = 0.92;

/// Marker for the single massing cuboid.
#[derive(Component)]
pub struct MassingBody;

/// Marker for the twelve edge segments parented to the body.
#[derive(Component)]
pub struct MassingEdge;

/// Marker for one horizontal slab line. Lines are respawned whenever the
/// floor count changes, so the index is always in 1..=floor_count.
#[derive(Component)]
pub struct FloorLine {
    pub index: u32,
}

/// Caches the shared unit mesh and the three materials so progress updates
/// mutate materials in place instead of allocating new ones.
#[derive(Resource)]
pub struct MassingAssets {
    pub unit_cube: Handle<Mesh>,
    pub body_material: Handle<StandardMaterial>,
    pub edge_material: Handle<StandardMaterial>,
    pub floor_material: Handle<StandardMaterial>,
}

fn body_transform(spec: &BuildingSpec, snapshot: &MassingSnapshot) -> Transform {
    Transform::from_xyz(0.0, snapshot.current_height / 2.0, 0.0).with_scale(Vec3::new(
        spec.width,
        snapshot.current_height,
        spec.depth,
    ))
}

fn floor_line_transform(spec: &BuildingSpec, index: u32) -> Transform {
    Transform::from_xyz(0.0, index as f32 * FLOOR_HEIGHT, 0.0).with_scale(Vec3::new(
        spec.width * FLOOR_OVERHANG,
        FLOOR_LINE_HEIGHT,
        spec.depth * FLOOR_OVERHANG,
    ))
}

/// Local transforms for the twelve edges of a unit cube. Four run along each
/// axis; the other two coordinates sit on the cube's faces at ±0.5.
fn unit_edge_transforms() -> Vec<Transform> {
    let t = EDGE_THICKNESS;
    let mut edges = Vec::with_capacity(12);
    for a in [-0.5, 0.5] {
        for b in [-0.5, 0.5] {
            edges.push(Transform::from_xyz(0.0, a, b).with_scale(Vec3::new(1.0, t, t)));
            edges.push(Transform::from_xyz(a, 0.0, b).with_scale(Vec3::new(t, 1.0, t)));
            edges.push(Transform::from_xyz(a, b, 0.0).with_scale(Vec3::new(t, t, 1.0)));
        }
    }
    edges
}

pub fn setup_massing(
    mut commands: Commands,
    spec: Res<BuildingSpec>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let snapshot = massing::compute(&spec, 0.0);

    let unit_cube = meshes.add(Cuboid::new(1.0, 1.0, 1.0));

    let body_material = materials.add(StandardMaterial {
        base_color: Color::srgba(
            snapshot.color[0],
            snapshot.color[1],
            snapshot.color[2],
            BODY_ALPHA,
        ),
        alpha_mode: AlphaMode::Blend,
        perceptual_roughness: 0.55,
        metallic: 0.1,
        ..default()
    });

    // Unlit so the frame reads as self-lit against the body.
    let edge_material = materials.add(StandardMaterial {
        base_color: Color::srgb(
            snapshot.edge_color[0],
            snapshot.edge_color[1],
            snapshot.edge_color[2],
        ),
        unlit: true,
        ..default()
    });

    let floor_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.08, 0.09, 0.12),
        unlit: true,
        ..default()
    });

    let body = commands
        .spawn((
            MassingBody,
            Mesh3d(unit_cube.clone()),
            MeshMaterial3d(body_material.clone()),
            body_transform(&spec, &snapshot),
            Visibility::default(),
        ))
        .id();

    for edge in unit_edge_transforms() {
        commands
            .spawn((
                MassingEdge,
                Mesh3d(unit_cube.clone()),
                MeshMaterial3d(edge_material.clone()),
                edge,
                Visibility::default(),
            ))
            .set_parent(body);
    }

    commands.insert_resource(MassingAssets {
        unit_cube,
        body_material,
        edge_material,
        floor_material,
    });
}

/// Recomputes the massing snapshot and pushes it into the body transform and
/// the shared materials. Skips frames where neither progress nor spec moved.
pub fn update_massing_visuals(
    run: Res<OptimizationRun>,
    spec: Res<BuildingSpec>,
    assets: Res<MassingAssets>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut body: Query<&mut Transform, With<MassingBody>>,
) {
    if !run.is_changed() && !spec.is_changed() {
        return;
    }
    let snapshot = massing::compute(&spec, run.value);

    let Ok(mut transform) = body.get_single_mut() else {
        return;
    };
    *transform = body_transform(&spec, &snapshot);

    if let Some(material) = materials.get_mut(&assets.body_material) {
        material.base_color = Color::srgba(
            snapshot.color[0],
            snapshot.color[1],
            snapshot.color[2],
            BODY_ALPHA,
        );
    }
    if let Some(material) = materials.get_mut(&assets.edge_material) {
        material.base_color = Color::srgb(
            snapshot.edge_color[0],
            snapshot.edge_color[1],
            snapshot.edge_color[2],
        );
    }
}

/// Keeps one slab line per completed floor. Entities are respawned only when
/// the floor count changes; dimension changes just rewrite transforms.
pub fn sync_floor_lines(
    mut commands: Commands,
    run: Res<OptimizationRun>,
    spec: Res<BuildingSpec>,
    assets: Res<MassingAssets>,
    mut lines: Query<(Entity, &FloorLine, &mut Transform)>,
) {
    if !run.is_changed() && !spec.is_changed() {
        return;
    }
    let snapshot = massing::compute(&spec, run.value);

    if lines.iter().count() as u32 != snapshot.floor_count {
        for (entity, _, _) in &lines {
            commands.entity(entity).despawn();
        }
        for index in 1..=snapshot.floor_count {
            commands.spawn((
                FloorLine { index },
                Mesh3d(assets.unit_cube.clone()),
                MeshMaterial3d(assets.floor_material.clone()),
                floor_line_transform(&spec, index),
                Visibility::default(),
            ));
        }
        return;
    }

    for (_, line, mut transform) in &mut lines {
        *transform = floor_line_transform(&spec, line.index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_sits_on_the_ground() {
        let spec = BuildingSpec::new(20.0, 20.0, 50.0);
        let snapshot = massing::compute(&spec, 0.0);
        let transform = body_transform(&spec, &snapshot);

        assert_eq!(transform.translation.y, snapshot.current_height / 2.0);
        assert_eq!(transform.scale.x, 20.0);
        assert_eq!(transform.scale.y, snapshot.current_height);
    }

    #[test]
    fn floor_lines_stay_inside_the_envelope() {
        let spec = BuildingSpec::new(20.0, 20.0, 50.0);
        for progress in [0.0, 0.5, 1.0] {
            let snapshot = massing::compute(&spec, progress);
            for index in 1..=snapshot.floor_count {
                let transform = floor_line_transform(&spec, index);
                assert!(transform.translation.y <= snapshot.current_height + 1e-4);
                assert!(transform.translation.y > 0.0);
            }
        }
    }

    #[test]
    fn twelve_distinct_edges() {
        let edges = unit_edge_transforms();
        assert_eq!(edges.len(), 12);
        for (i, a) in edges.iter().enumerate() {
            for b in edges.iter().skip(i + 1) {
                assert!(a.translation != b.translation || a.scale != b.scale);
            }
        }
    }
}

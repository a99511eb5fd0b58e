use std::f32::consts::{FRAC_PI_4, FRAC_PI_6};

use bevy::prelude::*;

use analysis::site::BuildingSpec;

/// Stage radius as a multiple of the largest envelope dimension.
const STAGE_FACTOR: f32 = 3.0;
/// Never shrink below this, even for sheds.
const MIN_HALF_EXTENT: f32 = 30.0;
const GRID_SPACING: f32 = 5.0;

#[derive(Component)]
pub struct StageGround;

fn stage_half_extent(spec: &BuildingSpec) -> f32 {
    (spec.max_dimension() * STAGE_FACTOR).max(MIN_HALF_EXTENT)
}

/// Dark ground slab under the massing. A unit plane scaled by transform so
/// re-framing only rewrites the scale.
pub fn setup_stage(
    mut commands: Commands,
    spec: Res<BuildingSpec>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let extent = stage_half_extent(&spec) * 2.0;
    commands.spawn((
        StageGround,
        Mesh3d(meshes.add(Plane3d::default().mesh().size(1.0, 1.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.10, 0.11, 0.14),
            perceptual_roughness: 0.95,
            ..default()
        })),
        // Slightly below grade so the grid lines at y=0 stay visible.
        Transform::from_xyz(0.0, -0.02, 0.0).with_scale(Vec3::new(extent, 1.0, extent)),
        Visibility::default(),
    ));
}

pub fn setup_lighting(mut commands: Commands) {
    commands.insert_resource(ClearColor(Color::srgb(0.02, 0.025, 0.045)));
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.9, 0.9, 1.0),
        brightness: 300.0,
    });

    commands.spawn((
        DirectionalLight {
            illuminance: 10_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -FRAC_PI_4, FRAC_PI_6, 0.0)),
    ));
}

/// Grow the ground along with the envelope when a report lands.
pub fn resize_stage(
    spec: Res<BuildingSpec>,
    mut ground: Query<&mut Transform, With<StageGround>>,
) {
    if !spec.is_changed() {
        return;
    }
    let Ok(mut transform) = ground.get_single_mut() else {
        return;
    };
    let extent = stage_half_extent(&spec) * 2.0;
    transform.scale = Vec3::new(extent, 1.0, extent);
}

/// Immediate-mode reference grid at grade, redrawn each frame so it tracks
/// the stage extent without bookkeeping.
pub fn draw_stage_grid(mut gizmos: Gizmos, spec: Res<BuildingSpec>) {
    let half = stage_half_extent(&spec);
    let steps = (half / GRID_SPACING).floor() as i32;
    let color = Color::srgba(0.35, 0.40, 0.50, 0.25);

    for i in -steps..=steps {
        let offset = i as f32 * GRID_SPACING;
        gizmos.line(
            Vec3::new(-half, 0.0, offset),
            Vec3::new(half, 0.0, offset),
            color,
        );
        gizmos.line(
            Vec3::new(offset, 0.0, -half),
            Vec3::new(offset, 0.0, half),
            color,
        );
    }
}

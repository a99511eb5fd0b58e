use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use analysis::site::BuildingSpec;

/// Fixed seed so the backdrop scatter is identical across launches.
const SCATTER_SEED: u64 = 42;
const MIN_MOTES: usize = 60;
const MAX_MOTES: usize = 240;
const BOB_AMPLITUDE: f32 = 0.8;

/// One drifting light mote in the backdrop. Motion is a pure function of
/// elapsed time, so motes never accumulate error.
#[derive(Component)]
pub struct AmbientMote {
    pub base: Vec3,
    pub bob_phase: f32,
    pub bob_speed: f32,
}

fn mote_position(mote: &AmbientMote, elapsed: f32) -> Vec3 {
    mote.base + Vec3::Y * (elapsed * mote.bob_speed + mote.bob_phase).sin() * BOB_AMPLITUDE
}

/// Denser backdrop for larger envelopes, within fixed bounds.
fn mote_count(reach: f32) -> usize {
    ((reach * 4.0) as usize).clamp(MIN_MOTES, MAX_MOTES)
}

/// Scatters dim unlit motes in an annulus around the stage. Placement uses a
/// seeded generator, not world randomness, so screenshots are reproducible.
pub fn setup_ambient(
    mut commands: Commands,
    spec: Res<BuildingSpec>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut rng = ChaCha8Rng::seed_from_u64(SCATTER_SEED);

    let mesh = meshes.add(Sphere::new(0.25));
    let palette = [
        materials.add(StandardMaterial {
            base_color: Color::srgb(0.25, 0.55, 0.65),
            unlit: true,
            ..default()
        }),
        materials.add(StandardMaterial {
            base_color: Color::srgb(0.45, 0.40, 0.70),
            unlit: true,
            ..default()
        }),
        materials.add(StandardMaterial {
            base_color: Color::srgb(0.55, 0.50, 0.35),
            unlit: true,
            ..default()
        }),
    ];

    let reach = spec.max_dimension();
    for i in 0..mote_count(reach) {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let radius = rng.gen_range(reach * 1.2..reach * 3.0);
        let height = rng.gen_range(1.0..reach * 1.4);
        let base = Vec3::new(angle.cos() * radius, height, angle.sin() * radius);

        commands.spawn((
            AmbientMote {
                base,
                bob_phase: rng.gen_range(0.0..std::f32::consts::TAU),
                bob_speed: rng.gen_range(0.3..0.9),
            },
            Mesh3d(mesh.clone()),
            MeshMaterial3d(palette[i % palette.len()].clone()),
            Transform::from_translation(base),
            Visibility::default(),
        ));
    }
}

pub fn drift_ambient(time: Res<Time>, mut motes: Query<(&AmbientMote, &mut Transform)>) {
    let elapsed = time.elapsed_secs();
    for (mote, mut transform) in &mut motes {
        transform.translation = mote_position(mote, elapsed);
    }
}

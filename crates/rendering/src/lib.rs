use bevy::prelude::*;

pub mod ambient;
pub mod camera;
pub mod massing_render;
pub mod stage;

use camera::{AutoRotate, OrbitDragState};

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitDragState>()
            .init_resource::<AutoRotate>()
            .add_systems(
                Startup,
                (
                    camera::setup_camera,
                    stage::setup_lighting,
                    stage::setup_stage,
                    massing_render::setup_massing,
                    ambient::setup_ambient,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    camera::camera_orbit_drag,
                    camera::camera_zoom,
                    camera::update_rotation_rate,
                    camera::auto_rotate,
                    camera::reframe_on_spec_change,
                    camera::apply_orbit_camera,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    massing_render::update_massing_visuals,
                    massing_render::sync_floor_lines,
                    stage::resize_stage,
                    stage::draw_stage_grid,
                    ambient::drift_ambient,
                ),
            );
    }
}

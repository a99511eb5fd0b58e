use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use analysis::progress::{PhaseChanged, RunPhase};
use analysis::site::BuildingSpec;

const DEG: f32 = std::f32::consts::TAU / 360.0;

/// Tilt band keeping the view above grade and off the zenith.
const PITCH_MIN: f32 = 5.0 * DEG;
const PITCH_MAX: f32 = 80.0 * DEG;

const NEAR_LIMIT: f32 = 8.0;
const FAR_LIMIT: f32 = 600.0;

const DRAG_SENSITIVITY: f32 = 0.005;
const ZOOM_STEP: f32 = 0.15;

/// Multiplier on the largest envelope dimension when framing the massing.
const FRAME_FACTOR: f32 = 2.2;

/// Fraction of the envelope height the look-at point sits at.
const FOCUS_FRACTION: f32 = 0.35;

/// Showcase spin while waiting for input, radians per second.
pub const IDLE_RATE: f32 = 0.1;
/// Faster spin while a run is in flight.
pub const RUN_RATE: f32 = 0.5;

/// Orbit rig aimed at the massing. The look-at point rides the envelope's
/// vertical axis, so the whole rig is four scalars.
#[derive(Resource)]
pub struct OrbitCamera {
    pub focus_height: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

impl OrbitCamera {
    fn framed(spec: &BuildingSpec) -> Self {
        Self {
            focus_height: spec.height * FOCUS_FRACTION,
            yaw: 0.65,
            pitch: 28.0 * DEG,
            distance: frame_distance(spec),
        }
    }

    fn focus(&self) -> Vec3 {
        Vec3::Y * self.focus_height
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::framed(&BuildingSpec::default())
    }
}

/// Right-button drag in progress.
#[derive(Resource, Default)]
pub struct OrbitDragState {
    pub active: bool,
    pub last_cursor: Vec2,
}

/// Continuous yaw drift applied on top of manual input.
#[derive(Resource)]
pub struct AutoRotate {
    /// Radians per second
    pub rate: f32,
}

impl Default for AutoRotate {
    fn default() -> Self {
        Self { rate: IDLE_RATE }
    }
}

fn frame_distance(spec: &BuildingSpec) -> f32 {
    (spec.max_dimension() * FRAME_FACTOR).clamp(NEAR_LIMIT, FAR_LIMIT)
}

/// Auto-rotation rate implied by a phase transition. `None` keeps the
/// current rate.
fn rate_for_phase(phase: RunPhase) -> Option<f32> {
    match phase {
        RunPhase::Initializing => Some(RUN_RATE),
        RunPhase::Idle | RunPhase::Complete => Some(IDLE_RATE),
        _ => None,
    }
}

/// Applies a cursor delta: horizontal orbits, vertical tilts, with the tilt
/// held inside the pitch band.
fn drag_orbit(orbit: &mut OrbitCamera, delta: Vec2) {
    orbit.yaw += delta.x * DRAG_SENSITIVITY;
    orbit.pitch = (orbit.pitch - delta.y * DRAG_SENSITIVITY).clamp(PITCH_MIN, PITCH_MAX);
}

/// One zoom step toward or away from the focus. `dy` is in wheel lines.
fn apply_zoom(distance: f32, dy: f32) -> f32 {
    (distance * (1.0 - dy * ZOOM_STEP)).clamp(NEAR_LIMIT, FAR_LIMIT)
}

/// True when egui owns the pointer. Camera input skips those frames so
/// scrolling the log or dragging a slider never moves the view.
fn egui_wants_pointer(contexts: &mut EguiContexts) -> bool {
    let ctx = contexts.ctx_mut();
    ctx.wants_pointer_input() || ctx.is_pointer_over_area()
}

/// Transform looking at the focus from the rig's spherical position.
fn orbit_transform(orbit: &OrbitCamera) -> Transform {
    let rotation = Quat::from_euler(EulerRot::YXZ, orbit.yaw, -orbit.pitch, 0.0);
    let eye = orbit.focus() + rotation * (Vec3::Z * orbit.distance);
    Transform::from_translation(eye).looking_at(orbit.focus(), Vec3::Y)
}

pub fn setup_camera(mut commands: Commands, spec: Res<BuildingSpec>) {
    let orbit = OrbitCamera::framed(&spec);
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 45.0 * DEG,
            ..default()
        }),
        orbit_transform(&orbit),
    ));
    commands.insert_resource(orbit);
}

/// Writes the rig state to the camera entity whenever it moved.
pub fn apply_orbit_camera(
    orbit: Res<OrbitCamera>,
    mut cameras: Query<&mut Transform, With<Camera3d>>,
) {
    if !orbit.is_changed() {
        return;
    }
    let Ok(mut transform) = cameras.get_single_mut() else {
        return;
    };
    *transform = orbit_transform(&orbit);
}

/// Right-button drag orbits the rig. Presses that land on a panel stay with
/// egui.
pub fn camera_orbit_drag(
    mut contexts: EguiContexts,
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    mut drag: ResMut<OrbitDragState>,
    mut orbit: ResMut<OrbitCamera>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };

    if buttons.just_pressed(MouseButton::Right) && !egui_wants_pointer(&mut contexts) {
        if let Some(cursor) = window.cursor_position() {
            drag.active = true;
            drag.last_cursor = cursor;
        }
    }
    if buttons.just_released(MouseButton::Right) {
        drag.active = false;
    }

    if !drag.active {
        return;
    }
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    drag_orbit(&mut orbit, cursor - drag.last_cursor);
    drag.last_cursor = cursor;
}

/// Wheel zoom, one multiplicative step per frame.
pub fn camera_zoom(
    mut contexts: EguiContexts,
    mut wheel: EventReader<MouseWheel>,
    mut orbit: ResMut<OrbitCamera>,
) {
    if egui_wants_pointer(&mut contexts) {
        wheel.clear();
        return;
    }
    let dy: f32 = wheel
        .read()
        .map(|event| match event.unit {
            MouseScrollUnit::Line => event.y,
            MouseScrollUnit::Pixel => event.y / 100.0,
        })
        .sum();
    if dy != 0.0 {
        orbit.distance = apply_zoom(orbit.distance, dy);
    }
}

/// Slow showcase spin. Manual orbit input stacks on top of it.
pub fn auto_rotate(time: Res<Time>, rotate: Res<AutoRotate>, mut orbit: ResMut<OrbitCamera>) {
    orbit.yaw += rotate.rate * time.delta_secs();
}

/// Speed the spin up when a run starts and settle it back once the run
/// completes or resets.
pub fn update_rotation_rate(
    mut events: EventReader<PhaseChanged>,
    mut rotate: ResMut<AutoRotate>,
) {
    for event in events.read() {
        if let Some(rate) = rate_for_phase(event.phase) {
            rotate.rate = rate;
        }
    }
}

/// Re-frame the view whenever the envelope dimensions change, so a report
/// for a much larger plot never leaves the massing off screen.
pub fn reframe_on_spec_change(spec: Res<BuildingSpec>, mut orbit: ResMut<OrbitCamera>) {
    if !spec.is_changed() {
        return;
    }
    orbit.focus_height = spec.height * FOCUS_FRACTION;
    orbit.distance = frame_distance(&spec);
}

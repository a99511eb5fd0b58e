//! Pure massing geometry: the renderable form of the proposed building as a
//! function of run progress.
//!
//! Everything here is deterministic math over plain values so the rendering
//! layer can recompute a snapshot every tick and tests can pin exact numbers.

use crate::site::BuildingSpec;

/// Meters of height per structural floor line.
pub const FLOOR_HEIGHT: f32 = 3.0;

/// Fraction of the target height shown at progress 0. The massing starts as
/// a 30% stub and grows linearly to full height.
pub const BASE_HEIGHT_FRACTION: f32 = 0.3;

/// Channel multiplier for the emissive edge frame, clamped to display range.
pub const EDGE_GLOW: f32 = 1.8;

// Color ramp anchors: steel grey while data streams in, indigo mid-run,
// cyan at the optimum.
const ANCHOR_INGEST: [f32; 3] = [0.45, 0.48, 0.55];
const ANCHOR_OPTIMIZE: [f32; 3] = [0.31, 0.275, 0.898];
const ANCHOR_OPTIMAL: [f32; 3] = [0.133, 0.827, 0.933];

/// Derived massing state for one frame. Recomputed per tick, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassingSnapshot {
    pub current_height: f32,
    pub floor_count: u32,
    pub color: [f32; 3],
    pub edge_color: [f32; 3],
}

/// Computes the massing for `spec` at `progress`. Progress outside [0, 1] is
/// clamped; spec dimensions are positive by construction, so there is no
/// error path.
pub fn compute(spec: &BuildingSpec, progress: f32) -> MassingSnapshot {
    let progress = progress.clamp(0.0, 1.0);

    let growth = BASE_HEIGHT_FRACTION + progress * (1.0 - BASE_HEIGHT_FRACTION);
    let current_height = spec.height * growth;
    let floor_count = ((current_height / FLOOR_HEIGHT) as u32).max(1);

    let color = ramp_color(progress);
    let edge_color = [
        (color[0] * EDGE_GLOW).clamp(0.0, 1.0),
        (color[1] * EDGE_GLOW).clamp(0.0, 1.0),
        (color[2] * EDGE_GLOW).clamp(0.0, 1.0),
    ];

    MassingSnapshot {
        current_height,
        floor_count,
        color,
        edge_color,
    }
}

/// Piecewise-linear ramp over the three anchors, split at progress 0.5.
fn ramp_color(progress: f32) -> [f32; 3] {
    if progress < 0.5 {
        color_lerp(ANCHOR_INGEST, ANCHOR_OPTIMIZE, progress / 0.5)
    } else {
        color_lerp(ANCHOR_OPTIMIZE, ANCHOR_OPTIMAL, (progress - 0.5) / 0.5)
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn color_lerp(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        lerp(a[0], b[0], t),
        lerp(a[1], b[1], t),
        lerp(a[2], b[2], t),
    ]
}

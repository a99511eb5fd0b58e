//! The optimization run state machine.
//!
//! A run walks Idle → Initializing → Ingesting → Running → Finalizing →
//! Complete. Progress advances by a constant step on a fixed cadence, so the
//! phase sequence is a pure function of accumulated progress; wall-clock
//! jitter can stretch a run but never skip or reorder phases.

use bevy::prelude::*;
use std::time::Duration;

use crate::site::CaseRequest;

/// Cadence of the progress tick.
pub const TICK_INTERVAL: Duration = Duration::from_millis(30);

/// Progress added per tick. A full run takes ceil(1 / 0.015) = 67 ticks,
/// roughly two seconds at the fixed cadence.
pub const PROGRESS_STEP: f32 = 0.015;

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Ordered phases for run-control systems in `Update`, configured as a chain:
/// `Control` → `Reaction`.
///
/// `Control` owns the [`OptimizationRun`] resource and turns UI requests into
/// run events. `Reaction` holds systems that consume those events in the same
/// frame, so a run start and its side effects (feed clear, report clear)
/// always land together.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum RunSet {
    Control,
    Reaction,
}

// ---------------------------------------------------------------------------
// Phases
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPhase {
    #[default]
    Idle,
    /// Between `start()` and the first tick.
    Initializing,
    Ingesting,
    Running,
    Finalizing,
    /// Terminal until an explicit reset.
    Complete,
}

impl RunPhase {
    /// Status-bar label.
    pub fn label(self) -> &'static str {
        match self {
            RunPhase::Idle => "IDLE",
            RunPhase::Initializing => "INITIALIZING",
            RunPhase::Ingesting => "INGESTING DATA",
            RunPhase::Running => "OPTIMIZING",
            RunPhase::Finalizing => "FINALIZING",
            RunPhase::Complete => "OPTIMAL",
        }
    }
}

/// Phase implied by a progress value once ticking has begun.
fn phase_for_value(value: f32) -> RunPhase {
    if value < 0.3 {
        RunPhase::Ingesting
    } else if value < 0.7 {
        RunPhase::Running
    } else if value < 1.0 {
        RunPhase::Finalizing
    } else {
        RunPhase::Complete
    }
}

// ---------------------------------------------------------------------------
// OptimizationRun resource
// ---------------------------------------------------------------------------

/// Single owner of run progress. All mutation goes through [`start`],
/// [`reset`], and [`tick`]; everything else reads.
///
/// [`start`]: OptimizationRun::start
/// [`reset`]: OptimizationRun::reset
/// [`tick`]: OptimizationRun::tick
#[derive(Resource, Debug, Clone)]
pub struct OptimizationRun {
    pub value: f32,
    pub phase: RunPhase,
    pub playing: bool,
    generation: u64,
}

impl Default for OptimizationRun {
    fn default() -> Self {
        Self {
            value: 0.0,
            phase: RunPhase::Idle,
            playing: false,
            generation: 0,
        }
    }
}

impl OptimizationRun {
    /// Counter bumped by every successful `start`; stamps scripted-feed
    /// schedules so entries from a superseded run are discarded unfired.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Begins a new run. No-op while a run is already playing.
    /// Returns whether a run actually started.
    pub fn start(&mut self) -> bool {
        if self.playing {
            return false;
        }
        self.value = 0.0;
        self.phase = RunPhase::Initializing;
        self.playing = true;
        self.generation += 1;
        true
    }

    /// Returns to Idle. Only valid once a run has completed; a reset request
    /// while playing (or while already idle) is a no-op.
    pub fn reset(&mut self) -> bool {
        if self.playing || self.phase != RunPhase::Complete {
            return false;
        }
        self.value = 0.0;
        self.phase = RunPhase::Idle;
        true
    }

    /// Advances one step. Returns the new phase when the step crossed a
    /// phase boundary. Clamps to exactly 1.0 and stops playing on completion.
    pub fn tick(&mut self) -> Option<RunPhase> {
        if !self.playing {
            return None;
        }
        self.value = (self.value + PROGRESS_STEP).min(1.0);
        let next = phase_for_value(self.value);
        if next == RunPhase::Complete {
            self.playing = false;
        }
        if next != self.phase {
            self.phase = next;
            Some(next)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Request from the UI to begin a run with the submitted case.
#[derive(Event, Debug, Clone)]
pub struct RunRequested {
    pub request: CaseRequest,
}

/// Fired once per accepted run request, after the driver flipped to
/// Initializing. Consumers key their per-run state off `generation`.
#[derive(Event, Debug, Clone)]
pub struct RunStarted {
    pub generation: u64,
    pub case_id: String,
}

/// Request from the UI to return a completed run to Idle.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ResetRequested;

/// Fired on every phase transition, including Initializing on start and
/// Idle on reset.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChanged {
    pub phase: RunPhase,
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

fn start_runs(
    mut requests: EventReader<RunRequested>,
    mut run: ResMut<OptimizationRun>,
    mut started: EventWriter<RunStarted>,
    mut phases: EventWriter<PhaseChanged>,
) {
    for request in requests.read() {
        if !run.start() {
            continue;
        }
        let case = &request.request;
        info!("Processing case {} for project {}.", case.case_id, case.project_id);
        if let Ok(payload) = serde_json::to_string(case) {
            debug!("case payload: {payload}");
        }
        started.send(RunStarted {
            generation: run.generation(),
            case_id: case.case_id.clone(),
        });
        phases.send(PhaseChanged {
            phase: RunPhase::Initializing,
        });
    }
}

fn apply_resets(
    mut requests: EventReader<ResetRequested>,
    mut run: ResMut<OptimizationRun>,
    mut phases: EventWriter<PhaseChanged>,
) {
    if requests.read().next().is_none() {
        return;
    }
    if run.reset() {
        phases.send(PhaseChanged {
            phase: RunPhase::Idle,
        });
    }
}

fn advance_run(mut run: ResMut<OptimizationRun>, mut phases: EventWriter<PhaseChanged>) {
    if !run.playing {
        return;
    }
    if let Some(phase) = run.tick() {
        phases.send(PhaseChanged { phase });
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct ProgressPlugin;

impl Plugin for ProgressPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OptimizationRun>()
            .add_event::<RunRequested>()
            .add_event::<RunStarted>()
            .add_event::<ResetRequested>()
            .add_event::<PhaseChanged>()
            .insert_resource(Time::<Fixed>::from_duration(TICK_INTERVAL))
            .configure_sets(Update, (RunSet::Control, RunSet::Reaction).chain())
            .add_systems(Update, (start_runs, apply_resets).in_set(RunSet::Control))
            .add_systems(FixedUpdate, advance_run);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_completion(run: &mut OptimizationRun) -> Vec<RunPhase> {
        let mut transitions = Vec::new();
        let mut guard = 0;
        while run.playing {
            if let Some(phase) = run.tick() {
                transitions.push(phase);
            }
            guard += 1;
            assert!(guard < 1000, "run never completed");
        }
        transitions
    }

    #[test]
    fn phases_visit_in_strict_order() {
        let mut run = OptimizationRun::default();
        assert!(run.start());
        assert_eq!(run.phase, RunPhase::Initializing);

        let transitions = run_to_completion(&mut run);
        assert_eq!(
            transitions,
            vec![
                RunPhase::Ingesting,
                RunPhase::Running,
                RunPhase::Finalizing,
                RunPhase::Complete,
            ]
        );
        assert_eq!(run.value, 1.0);
        assert!(!run.playing);
    }

    #[test]
    fn value_is_monotone_and_clamped() {
        let mut run = OptimizationRun::default();
        run.start();
        let mut previous = run.value;
        while run.playing {
            run.tick();
            assert!(run.value >= previous);
            assert!(run.value <= 1.0);
            previous = run.value;
        }
        assert_eq!(run.value, 1.0);
    }

    #[test]
    fn full_run_takes_expected_tick_count() {
        let mut run = OptimizationRun::default();
        run.start();
        let mut ticks = 0;
        while run.playing {
            run.tick();
            ticks += 1;
        }
        // ceil(1.0 / 0.015)
        assert_eq!(ticks, 67);
    }

    #[test]
    fn start_while_playing_is_noop() {
        let mut run = OptimizationRun::default();
        assert!(run.start());
        let generation = run.generation();
        run.tick();
        let value = run.value;

        assert!(!run.start());
        assert_eq!(run.generation(), generation);
        assert_eq!(run.value, value);
    }

    #[test]
    fn reset_only_valid_from_complete() {
        let mut run = OptimizationRun::default();
        // Idle: nothing to reset.
        assert!(!run.reset());

        run.start();
        run.tick();
        // Playing: no-op, value untouched.
        let value = run.value;
        assert!(!run.reset());
        assert_eq!(run.value, value);
        assert!(run.playing);

        run_to_completion(&mut run);
        assert_eq!(run.phase, RunPhase::Complete);
        assert!(run.reset());
        assert_eq!(run.value, 0.0);
        assert_eq!(run.phase, RunPhase::Idle);
    }

    #[test]
    fn restart_after_reset_bumps_generation() {
        let mut run = OptimizationRun::default();
        run.start();
        let first = run.generation();
        run_to_completion(&mut run);
        run.reset();
        run.start();
        assert_eq!(run.generation(), first + 1);
    }

    #[test]
    fn tick_sequence_is_deterministic() {
        let mut a = OptimizationRun::default();
        let mut b = OptimizationRun::default();
        a.start();
        b.start();
        while a.playing {
            a.tick();
            b.tick();
            assert_eq!(a.value, b.value);
            assert_eq!(a.phase, b.phase);
        }
        assert!(!b.playing);
    }

    #[test]
    fn phase_boundaries() {
        assert_eq!(phase_for_value(0.0), RunPhase::Ingesting);
        assert_eq!(phase_for_value(0.299), RunPhase::Ingesting);
        assert_eq!(phase_for_value(0.3), RunPhase::Running);
        assert_eq!(phase_for_value(0.699), RunPhase::Running);
        assert_eq!(phase_for_value(0.7), RunPhase::Finalizing);
        assert_eq!(phase_for_value(0.999), RunPhase::Finalizing);
        assert_eq!(phase_for_value(1.0), RunPhase::Complete);
    }

    #[test]
    fn labels_are_distinct() {
        let labels = [
            RunPhase::Idle.label(),
            RunPhase::Initializing.label(),
            RunPhase::Ingesting.label(),
            RunPhase::Running.label(),
            RunPhase::Finalizing.label(),
            RunPhase::Complete.label(),
        ];
        for i in 0..labels.len() {
            for j in (i + 1)..labels.len() {
                assert_ne!(labels[i], labels[j]);
            }
        }
    }
}

//! Run-lifecycle scenario tests driving the core structs directly.
//!
//! These walk a full optimization run the way the app does, one tick at a
//! time, and check that massing, scheduling, and reset behavior hold up
//! across restarts:
//! - massing growth stays monotone from 30% of final height to full height
//! - an abandoned run's scripted lines never leak into the next run
//! - a reset run replays identically
//!
//! Run: cargo test -p analysis --test run_scenarios

use analysis::feed::scripted::{default_timeline, ScriptTimeline};
use analysis::feed::{LogBuffer, LogCategory, RUN_SEED_LINE};
use analysis::massing::{compute, BASE_HEIGHT_FRACTION};
use analysis::progress::{OptimizationRun, RunPhase};
use analysis::site::BuildingSpec;

// ---------------------------------------------------------------------------
// 1. Massing tracks a full run of the demo building
// ---------------------------------------------------------------------------

#[test]
fn demo_building_massing_tracks_full_run() {
    let spec = BuildingSpec::new(20.0, 20.0, 50.0);
    let mut run = OptimizationRun::default();
    assert!(run.start());

    let mut previous = compute(&spec, run.value);
    assert_eq!(previous.current_height, BASE_HEIGHT_FRACTION * 50.0);
    assert_eq!(previous.floor_count, 5);

    let mut ticks = 0;
    while run.playing {
        run.tick();
        ticks += 1;
        assert!(ticks < 1000, "run never completed");

        let snapshot = compute(&spec, run.value);
        assert!(
            snapshot.current_height >= previous.current_height,
            "height regressed at tick {ticks}"
        );
        assert!(snapshot.floor_count >= 1);
        previous = snapshot;
    }

    assert_eq!(run.phase, RunPhase::Complete);
    assert_eq!(previous.current_height, 50.0);
    assert_eq!(previous.floor_count, 16);
}

// ---------------------------------------------------------------------------
// 2. Abandoning a run mid-script leaks nothing into the next run
// ---------------------------------------------------------------------------

#[test]
fn abandoned_script_never_leaks_into_next_run() {
    let mut buffer = LogBuffer::default();
    let mut timeline = ScriptTimeline::default();

    // First run fires only its earliest lines before being superseded.
    buffer.push(LogCategory::System, RUN_SEED_LINE);
    timeline.begin(1, 0.0, default_timeline("case_first"));
    for (category, text) in timeline.take_due(0.5) {
        buffer.push(category, text);
    }
    assert!(buffer.events().iter().any(|e| e.text.contains("case_first")));
    let last_seq = buffer.events().last().map(|e| e.sequence).unwrap_or(0);

    // Second run: buffer cleared, schedule rebuilt.
    buffer.clear();
    buffer.push(LogCategory::System, RUN_SEED_LINE);
    timeline.begin(2, 0.6, default_timeline("case_second"));
    for (category, text) in timeline.take_due(60.0) {
        buffer.push(category, text);
    }

    let events = buffer.events();
    assert_eq!(events.len(), 8);
    for event in events {
        assert!(
            !event.text.contains("case_first"),
            "stale line survived: {}",
            event.text
        );
    }
    // Ordering keys stay monotone across the clear.
    assert!(events[0].sequence > last_seq);
    for pair in events.windows(2) {
        assert!(pair[0].sequence < pair[1].sequence);
    }
}

// ---------------------------------------------------------------------------
// 3. Reset and rerun replays the identical progression
// ---------------------------------------------------------------------------

#[test]
fn reset_and_rerun_replays_identically() {
    let spec = BuildingSpec::default();

    let trace = |run: &mut OptimizationRun| {
        assert!(run.start());
        let mut points = vec![(run.value, run.phase, compute(&spec, run.value))];
        while run.playing {
            run.tick();
            points.push((run.value, run.phase, compute(&spec, run.value)));
        }
        points
    };

    let mut run = OptimizationRun::default();
    let first = trace(&mut run);

    assert!(run.reset());
    assert_eq!(run.phase, RunPhase::Idle);
    let second = trace(&mut run);

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.0, b.0);
        assert_eq!(a.1, b.1);
        assert_eq!(a.2, b.2);
    }
}

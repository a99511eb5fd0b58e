//! Built-in feed backend: a fixed timeline of log lines replayed on each run.

use bevy::prelude::*;

use super::{FeedConfig, LogBuffer, LogCategory};
use crate::progress::RunStarted;
use crate::site::PROJECT_ID;

/// One line of a scripted run, offset from the run's start.
#[derive(Debug, Clone)]
pub struct ScriptEntry {
    pub delay_secs: f32,
    pub category: LogCategory,
    pub text: String,
}

impl ScriptEntry {
    fn new(delay_secs: f32, category: LogCategory, text: impl Into<String>) -> Self {
        Self {
            delay_secs,
            category,
            text: text.into(),
        }
    }
}

#[derive(Debug)]
struct PendingEntry {
    fire_at: f64,
    category: LogCategory,
    text: String,
}

/// Replayed schedule for the current run. `begin` replaces the whole
/// schedule, so lines from an abandoned run can never fire late.
#[derive(Resource, Debug, Default)]
pub struct ScriptTimeline {
    pending: Vec<PendingEntry>,
    generation: u64,
}

impl ScriptTimeline {
    pub fn begin(&mut self, generation: u64, now: f64, entries: Vec<ScriptEntry>) {
        self.generation = generation;
        self.pending = entries
            .into_iter()
            .map(|e| PendingEntry {
                fire_at: now + f64::from(e.delay_secs),
                category: e.category,
                text: e.text,
            })
            .collect();
        self.pending.sort_by(|a, b| a.fire_at.total_cmp(&b.fire_at));
    }

    /// Removes and returns every entry due at `now`, earliest first.
    pub fn take_due(&mut self, now: f64) -> Vec<(LogCategory, String)> {
        let due = self.pending.partition_point(|e| e.fire_at <= now);
        self.pending
            .drain(..due)
            .map(|e| (e.category, e.text))
            .collect()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Timeline mirroring the analysis pipeline's own log output.
pub fn default_timeline(case_id: &str) -> Vec<ScriptEntry> {
    vec![
        ScriptEntry::new(
            0.15,
            LogCategory::System,
            format!("Processing case {case_id} for project {PROJECT_ID}."),
        ),
        ScriptEntry::new(
            0.45,
            LogCategory::Retrieval,
            format!("Querying MCP for rules for case {case_id}..."),
        ),
        ScriptEntry::new(
            0.80,
            LogCategory::Retrieval,
            "VectorDB returned 4 matching entitlement rules.",
        ),
        ScriptEntry::new(
            1.10,
            LogCategory::Inference,
            format!("Executing LLM agent to generate expert report for {case_id}..."),
        ),
        ScriptEntry::new(
            1.50,
            LogCategory::Inference,
            format!("LLM expert report complete for {case_id}."),
        ),
        ScriptEntry::new(
            1.70,
            LogCategory::Policy,
            "RL Policy evaluation: OPTIMAL ACTION: 2 (confidence 0.84)",
        ),
        ScriptEntry::new(
            1.95,
            LogCategory::Success,
            "Case analysis complete. Report compiled.",
        ),
    ]
}

pub(super) fn schedule_on_run_start(
    mut events: EventReader<RunStarted>,
    config: Res<FeedConfig>,
    time: Res<Time>,
    mut timeline: ResMut<ScriptTimeline>,
) {
    if config.is_live() {
        events.clear();
        return;
    }
    for started in events.read() {
        timeline.begin(
            started.generation,
            time.elapsed_secs_f64(),
            default_timeline(&started.case_id),
        );
    }
}

pub(super) fn dispatch_due(
    config: Res<FeedConfig>,
    time: Res<Time>,
    mut timeline: ResMut<ScriptTimeline>,
    mut buffer: ResMut<LogBuffer>,
) {
    if config.is_live() || timeline.is_idle() {
        return;
    }
    for (category, text) in timeline.take_due(time.elapsed_secs_f64()) {
        buffer.push(category, text);
    }
}

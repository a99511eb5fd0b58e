//! Log feed: categorized pipeline messages from either a scripted timeline
//! or a live TCP stream of newline-delimited JSON.
//!
//! Both backends converge on [`LogBuffer`]; consumers never see which one
//! produced a line.

pub mod live;
pub mod scripted;

use bevy::prelude::*;
use serde::Deserialize;

use crate::progress::{RunSet, RunStarted};

/// Line appended to the buffer whenever a run begins.
pub const RUN_SEED_LINE: &str = ">> Initialization Sequence Started...";

// ---------------------------------------------------------------------------
// Categories and wire decoding
// ---------------------------------------------------------------------------

/// Pipeline stage a log line belongs to. Drives panel styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    System,
    Retrieval,
    Inference,
    Policy,
    Success,
}

impl LogCategory {
    /// Maps the wire `type` field. Unknown kinds degrade to `System`.
    pub fn from_wire(kind: &str) -> Self {
        match kind {
            "rag" => Self::Retrieval,
            "llm" => Self::Inference,
            "rl" => Self::Policy,
            "success" => Self::Success,
            _ => Self::System,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::System => "SYSTEM",
            Self::Retrieval => "RETRIEVAL",
            Self::Inference => "INFERENCE",
            Self::Policy => "POLICY",
            Self::Success => "SUCCESS",
        }
    }
}

/// One message as serialized by the analysis service. Extra fields such as
/// `timestamp` are ignored.
#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: String,
}

/// Decodes one feed line. Malformed or empty lines are dropped with a warning
/// so one bad message never stalls the stream.
pub fn decode_line(line: &str) -> Option<(LogCategory, String)> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<WireMessage>(trimmed) {
        Ok(msg) => Some((LogCategory::from_wire(&msg.kind), msg.text)),
        Err(e) => {
            warn!("feed: dropping malformed line: {e}");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub category: LogCategory,
    pub text: String,
    /// Monotone across the session, including over `clear` boundaries.
    pub sequence: u64,
}

/// Append-only message buffer. Cleared at run start, never trimmed; the
/// panel renders a bounded tail.
#[derive(Resource, Debug, Default)]
pub struct LogBuffer {
    events: Vec<LogEvent>,
    next_sequence: u64,
}

impl LogBuffer {
    pub fn push(&mut self, category: LogCategory, text: impl Into<String>) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.events.push(LogEvent {
            category,
            text: text.into(),
            sequence,
        });
        sequence
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    pub fn tail(&self, n: usize) -> &[LogEvent] {
        let start = self.events.len().saturating_sub(n);
        &self.events[start..]
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Connection state and backend selection
// ---------------------------------------------------------------------------

#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connected,
    Error,
}

impl ConnectionStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Disconnected => "Disconnected",
            Self::Connected => "Connected",
            Self::Error => "Error",
        }
    }
}

/// Env var selecting the feed backend: unset or `scripted` for the built-in
/// timeline, `host:port` for a live stream.
pub const FEED_ENV: &str = "MASSFORM_FEED";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeedBackend {
    #[default]
    Scripted,
    Live {
        addr: String,
    },
}

#[derive(Resource, Debug, Clone, Default)]
pub struct FeedConfig {
    pub backend: FeedBackend,
}

impl FeedConfig {
    pub fn from_env() -> Self {
        let Ok(value) = std::env::var(FEED_ENV) else {
            return Self::default();
        };
        Self {
            backend: parse_backend(&value),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self.backend, FeedBackend::Live { .. })
    }
}

fn parse_backend(value: &str) -> FeedBackend {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("scripted") {
        return FeedBackend::Scripted;
    }
    if value.contains(':') {
        return FeedBackend::Live {
            addr: value.to_string(),
        };
    }
    warn!("{FEED_ENV}={value}: expected `scripted` or host:port, using scripted feed");
    FeedBackend::Scripted
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Resets the buffer when a run begins. The seed line marks the new run so
/// the panel never shows a dead-empty frame.
fn clear_on_run_start(mut events: EventReader<RunStarted>, mut buffer: ResMut<LogBuffer>) {
    if events.read().next().is_none() {
        return;
    }
    buffer.clear();
    buffer.push(LogCategory::System, RUN_SEED_LINE);
}

pub struct FeedPlugin;

impl Plugin for FeedPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FeedConfig>()
            .init_resource::<LogBuffer>()
            .init_resource::<ConnectionStatus>()
            .init_resource::<scripted::ScriptTimeline>()
            .add_systems(Startup, live::connect_live_feed)
            .add_systems(
                Update,
                (
                    clear_on_run_start,
                    scripted::schedule_on_run_start,
                    scripted::dispatch_due,
                    live::drain_live_feed,
                )
                    .chain()
                    .in_set(RunSet::Reaction),
            )
            .add_systems(Last, live::shutdown_on_exit);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

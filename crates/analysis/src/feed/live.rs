//! Live feed backend: a background reader thread streaming newline-delimited
//! JSON from the analysis service over TCP.
//!
//! The thread owns the socket; the app side only drains a channel. Connection
//! failures degrade to status changes, never to a stalled frame.

use std::io::{BufRead, BufReader, ErrorKind};
use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use bevy::app::AppExit;
use bevy::prelude::*;
use crossbeam_channel::{unbounded, Receiver, Sender};

use super::{decode_line, ConnectionStatus, FeedBackend, FeedConfig, LogBuffer, LogCategory};

/// Line appended when the live stream comes up.
pub const CONNECT_LINE: &str = ">> Connected to analysis core";

/// Read timeout on the socket; bounds how long shutdown takes to observe.
pub const READ_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq)]
pub enum FeedSignal {
    Event { category: LogCategory, text: String },
    Status(ConnectionStatus),
}

/// Channel end of the reader thread. Lives for the whole session; runs only
/// clear the log buffer, never this connection.
#[derive(Resource)]
pub struct LiveFeedHandle {
    receiver: Receiver<FeedSignal>,
    shutdown: Arc<AtomicBool>,
    _thread: JoinHandle<()>,
}

impl LiveFeedHandle {
    /// Spawns the reader thread. Failures surface through the status channel
    /// rather than blocking startup.
    pub fn connect(addr: String) -> Self {
        let (sender, receiver) = unbounded();
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);
        let thread = thread::spawn(move || reader_loop(&addr, &sender, &flag));
        Self {
            receiver,
            shutdown,
            _thread: thread,
        }
    }
}

fn reader_loop(addr: &str, sender: &Sender<FeedSignal>, shutdown: &AtomicBool) {
    let stream = match TcpStream::connect(addr) {
        Ok(s) => s,
        Err(e) => {
            warn!("feed {addr}: connect failed: {e}");
            let _ = sender.send(FeedSignal::Status(ConnectionStatus::Error));
            return;
        }
    };
    if let Err(e) = stream.set_read_timeout(Some(READ_TIMEOUT)) {
        warn!("feed {addr}: set_read_timeout failed: {e}");
    }
    let _ = sender.send(FeedSignal::Status(ConnectionStatus::Connected));
    let _ = sender.send(FeedSignal::Event {
        category: LogCategory::System,
        text: CONNECT_LINE.to_string(),
    });

    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    while !shutdown.load(Ordering::Relaxed) {
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("feed {addr}: stream closed");
                let _ = sender.send(FeedSignal::Status(ConnectionStatus::Disconnected));
                return;
            }
            Ok(_) => {
                if let Some((category, text)) = decode_line(&line) {
                    let _ = sender.send(FeedSignal::Event { category, text });
                }
                line.clear();
            }
            // Timeout means no complete line yet; keep the partial buffer.
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
            Err(e) => {
                warn!("feed {addr}: read failed: {e}");
                let _ = sender.send(FeedSignal::Status(ConnectionStatus::Error));
                return;
            }
        }
    }
    let _ = sender.send(FeedSignal::Status(ConnectionStatus::Disconnected));
}

pub(super) fn connect_live_feed(mut commands: Commands, config: Res<FeedConfig>) {
    let FeedBackend::Live { addr } = &config.backend else {
        return;
    };
    info!("feed: connecting to {addr}");
    commands.insert_resource(LiveFeedHandle::connect(addr.clone()));
}

pub(super) fn drain_live_feed(
    handle: Option<Res<LiveFeedHandle>>,
    mut buffer: ResMut<LogBuffer>,
    mut status: ResMut<ConnectionStatus>,
) {
    let Some(handle) = handle else {
        return;
    };
    for signal in handle.receiver.try_iter() {
        match signal {
            FeedSignal::Event { category, text } => {
                buffer.push(category, text);
            }
            FeedSignal::Status(next) => {
                if *status != next {
                    info!("feed: {}", next.label());
                    *status = next;
                }
            }
        }
    }
}

pub(super) fn shutdown_on_exit(
    mut events: EventReader<AppExit>,
    handle: Option<Res<LiveFeedHandle>>,
) {
    if events.read().next().is_none() {
        return;
    }
    if let Some(handle) = handle {
        handle.shutdown.store(true, Ordering::Relaxed);
    }
}

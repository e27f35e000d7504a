//! Event sources for the interactive watch loop.
//!
//! Three producers feed one channel consumed by the main thread: a signal
//! thread (SIGINT/SIGTERM/SIGHUP), a stdin reader thread, and the recompute
//! workers of [`crate::session::Session`].

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM},
    iterator::Signals,
};
use std::io::{self, BufRead};
use std::sync::mpsc::Sender;
use std::thread;

use crate::logger::Log;

/// Unified event type for the watch loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A line typed by the user
    Input(String),
    /// A recompute result with this ticket was stored
    Published(u64),
    /// Signal received or stdin closed
    Shutdown,
}

/// Forward termination signals as [`WatchEvent::Shutdown`].
pub fn spawn_signal_listener(events: Sender<WatchEvent>) -> Result<()> {
    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])
        .context("Failed to register signal handlers")?;

    thread::spawn(move || {
        if let Some(signal) = signals.forever().next() {
            Log::log_debug(&format!("Shutdown signal received: {}", signal));
            let _ = events.send(WatchEvent::Shutdown);
        }
    });

    Ok(())
}

/// Forward stdin lines as [`WatchEvent::Input`], then Shutdown at end of input.
pub fn spawn_input_reader(events: Sender<WatchEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if events.send(WatchEvent::Input(line)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    Log::log_debug(&format!("Failed to read input: {}", e));
                    break;
                }
            }
        }
        let _ = events.send(WatchEvent::Shutdown);
    });
}

//! Implementation of the --watch interactive loop.
//!
//! The main thread consumes [`WatchEvent`]s from one channel. Lines typed on
//! stdin become commands, every recompute runs on a worker thread, and a
//! result is shown only if it is still the newest one when it arrives.

use anyhow::{Context, Result};
use std::sync::mpsc::{self, Receiver};

use crate::args::RunOptions;
use crate::commands::run::RunSetup;
use crate::logger::Log;
use crate::session::Session;
use crate::signals::{WatchEvent, spawn_input_reader, spawn_signal_listener};
use crate::timings::{AladhanClient, TimingsSource};

/// A parsed line of watch-mode input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchCommand {
    /// Empty line or `r`
    Recompute,
    /// `m HH:MM` sets the Maghrib override, bare `m` clears it
    SetMaghrib(Option<String>),
    /// `f HH:MM` sets the Fajr override, bare `f` clears it
    SetFajr(Option<String>),
    /// `q`
    Quit,
    Unknown(String),
}

/// Parse one input line. Override values are not checked here; a bad value
/// shows up as the failure message on the next computation.
pub fn parse_watch_command(line: &str) -> WatchCommand {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    let value = (!rest.is_empty()).then(|| rest.to_string());

    match head.to_ascii_lowercase().as_str() {
        "" | "r" if value.is_none() => WatchCommand::Recompute,
        "m" => WatchCommand::SetMaghrib(value),
        "f" => WatchCommand::SetFajr(value),
        "q" if value.is_none() => WatchCommand::Quit,
        _ => WatchCommand::Unknown(line.to_string()),
    }
}

/// Whether the loop keeps going after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// React to one event. Recomputes are started, never waited for.
pub fn handle_event<S>(session: &mut Session<S>, event: WatchEvent) -> Flow
where
    S: TimingsSource + Send + Sync + 'static,
{
    match event {
        WatchEvent::Shutdown => Flow::Stop,
        WatchEvent::Published(ticket) => {
            // A newer result may already have replaced this one
            if let Some((latest, text)) = session.slot().latest() {
                if latest == ticket {
                    Log::log_pipe();
                    Log::log_multiline(&text);
                }
            }
            Flow::Continue
        }
        WatchEvent::Input(line) => match parse_watch_command(&line) {
            WatchCommand::Recompute => {
                session.request();
                Flow::Continue
            }
            WatchCommand::SetMaghrib(value) => {
                describe_override("Maghrib", value.as_deref());
                session.overrides.maghrib = value;
                session.request();
                Flow::Continue
            }
            WatchCommand::SetFajr(value) => {
                describe_override("Fajr", value.as_deref());
                session.overrides.fajr = value;
                session.request();
                Flow::Continue
            }
            WatchCommand::Quit => Flow::Stop,
            WatchCommand::Unknown(input) => {
                Log::log_warning(&format!("Unknown command: {}", input));
                print_commands();
                Flow::Continue
            }
        },
    }
}

fn describe_override(name: &str, value: Option<&str>) {
    match value {
        Some(value) => Log::log_decorated(&format!("{} override set to {}", name, value)),
        None => Log::log_decorated(&format!("{} override cleared", name)),
    }
}

fn print_commands() {
    Log::log_indented("<enter> or r     recompute");
    Log::log_indented("m HH:MM / m      set / clear the Maghrib override");
    Log::log_indented("f HH:MM / f      set / clear the Fajr override");
    Log::log_indented("q                quit");
}

/// Consume events until a stop condition or until every sender is gone.
pub fn run_event_loop<S>(session: &mut Session<S>, events: &Receiver<WatchEvent>)
where
    S: TimingsSource + Send + Sync + 'static,
{
    while let Ok(event) = events.recv() {
        if handle_event(session, event) == Flow::Stop {
            break;
        }
    }
}

/// Handle `--watch`: compute immediately, then recompute on demand.
pub fn handle_watch_command(options: &RunOptions) -> Result<()> {
    Log::log_version();

    let setup = RunSetup::load(options)?;
    setup.log_query();

    let client = AladhanClient::new(&setup.config).context("Failed to create HTTP client")?;

    let (tx, rx) = mpsc::channel();
    spawn_signal_listener(tx.clone())?;
    spawn_input_reader(tx.clone());

    let mut session = Session::new(
        client,
        setup.query,
        setup.overrides,
        setup.config.language(),
    )
    .with_events(tx);

    Log::log_block_start("Watching for commands");
    print_commands();

    session.request();
    run_event_loop(&mut session, &rx);

    Log::log_block_start("Stopping");
    Log::log_end();
    Ok(())
}

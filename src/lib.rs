//! # lastthird
//!
//! Computes when the last third of the night begins, from the Maghrib
//! (sunset) and Fajr (pre-dawn) prayer times of a location.
//!
//! Both anchors are fetched from the Aladhan timings service unless they are
//! given manually. The night runs from Maghrib to Fajr, crossing midnight when
//! Fajr is numerically earlier, and its final third starts two thirds of the
//! way through.
//!
//! ## Architecture
//!
//! - **night**: Time-of-day parsing, minute arithmetic and the last-third calculation
//! - **summary**: Anchor resolution and the rendered result or failure message
//! - **timings**: The remote timings source and its HTTP client
//! - **session**: Repeated recomputation where the newest request wins
//! - **cities**: Reference locations and city name lookup
//! - **config**: Configuration loading, validation, and default generation
//! - **args**: Command-line parsing
//! - **commands**: One-shot run, watch loop, and city listing
//! - **signals**: Event sources for the watch loop
//! - **logger**: Structured logging with visual formatting
//! - **constants**: Application-wide constants and defaults
//! - **error**: Typed computation errors
//! - **utils**: Small display helpers

pub mod args;
pub mod cities;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod logger;
pub mod night;
pub mod session;
pub mod signals;
pub mod summary;
pub mod timings;
pub mod utils;

// Re-export important types for easier access
pub use config::{Config, Language};
pub use error::NightError;
pub use logger::{Log, LogLevel};
pub use night::{LastThird, TimeOfDay, last_third, night_duration, parse_time_of_day};
pub use summary::{NightSummary, Overrides, compute_summary, run_once};
pub use timings::{AladhanClient, RemoteTimings, TimingsQuery, TimingsSource};

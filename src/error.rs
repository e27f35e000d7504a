//! Error types for the night-interval computation.
//!
//! Every failure between fetching the timings and rendering the summary is
//! one of these variants. They are collapsed into a single user-facing
//! message by [`crate::summary::render_outcome`].

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NightError {
    /// Transport failure or non-success status from the timings service.
    #[error("Failed to reach timings service: {message}")]
    Fetch { message: String, transient: bool },

    /// Response arrived but `data.timings.Maghrib` / `data.timings.Fajr` are unusable.
    #[error("Unexpected timings response: {0}")]
    ResponseShape(String),

    /// A time string is not in `HH:MM` form.
    #[error("Invalid time '{0}', expected HH:MM")]
    Parse(String),

    /// Anchors do not describe a night of positive length.
    #[error("Degenerate night interval from {start} to {end}")]
    DegenerateInterval { start: String, end: String },
}

impl NightError {
    pub fn fetch(message: impl Into<String>, transient: bool) -> Self {
        NightError::Fetch {
            message: message.into(),
            transient,
        }
    }

    /// Whether retrying the same request might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, NightError::Fetch { transient: true, .. })
    }
}

pub type Result<T> = std::result::Result<T, NightError>;

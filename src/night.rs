//! Night-interval arithmetic on minute-of-day values.
//!
//! Times are held as minutes since local midnight. The night runs from the
//! Maghrib anchor to the Fajr anchor of the following morning, so whenever
//! Fajr is numerically at or before Maghrib it is moved forward one day
//! (+1440) before any subtraction happens.
//!
//! ## Key Functionality
//! - **Parsing**: strict `HH:MM` to [`TimeOfDay`]
//! - **Rollover**: [`night_duration`] applies the next-day correction
//! - **Last third**: [`last_third`] keeps the boundary fractional until formatting
//! - **Formatting**: [`format_minutes`] normalizes out-of-range values first

use chrono::{NaiveTime, Timelike};
use std::fmt;
use std::str::FromStr;

use crate::constants::MINUTES_PER_DAY;
use crate::error::{NightError, Result};

/// A wall-clock time as minutes since midnight, always in `[0, 1440)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Build from any minute count, reducing it into the canonical range.
    pub fn from_minutes(minutes: i64) -> Self {
        TimeOfDay(normalize_minutes(minutes) as u16)
    }

    pub fn minutes(self) -> i64 {
        i64::from(self.0)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for TimeOfDay {
    type Err = NightError;

    fn from_str(s: &str) -> Result<Self> {
        parse_time_of_day(s)
    }
}

/// Parse an `HH:MM` string (hours 0-23, minutes 0-59).
///
/// Surrounding whitespace is ignored. Anything else that does not match the
/// pattern, including a trailing seconds field, is rejected with
/// [`NightError::Parse`] carrying the original input.
pub fn parse_time_of_day(raw: &str) -> Result<TimeOfDay> {
    let time = NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| NightError::Parse(raw.to_string()))?;
    Ok(TimeOfDay((time.hour() * 60 + time.minute()) as u16))
}

/// Reduce a minute count into `[0, 1440)`, also for negative inputs.
pub fn normalize_minutes(minutes: i64) -> i64 {
    minutes.rem_euclid(MINUTES_PER_DAY)
}

/// Format a minute count as zero-padded 24-hour `HH:MM` after normalizing it.
pub fn format_minutes(minutes: i64) -> String {
    TimeOfDay::from_minutes(minutes).to_string()
}

/// Format a fractional minute count, rounding to the nearest whole minute.
///
/// Rounding happens here and nowhere earlier so that intermediate results
/// never accumulate rounding error. For nights shorter than two minutes the
/// rounded boundary can land on the end minute itself (00:00 to 00:01 gives
/// a boundary of 00:01).
pub fn format_fractional_minutes(minutes: f64) -> String {
    format_minutes(minutes.round() as i64)
}

/// End anchor moved onto the following day when it does not come after `start`.
fn adjusted_end(start: TimeOfDay, end: TimeOfDay) -> i64 {
    if end <= start {
        end.minutes() + MINUTES_PER_DAY
    } else {
        end.minutes()
    }
}

/// Length of the night in minutes, with next-day rollover applied.
///
/// # Returns
/// - `(end + 1440) - start` when `end <= start`
/// - `end - start` otherwise
/// - [`NightError::DegenerateInterval`] when both anchors are the same minute
pub fn night_duration(start: TimeOfDay, end: TimeOfDay) -> Result<i64> {
    // Equal anchors would otherwise roll over into a 24 hour night
    if start == end {
        return Err(degenerate(start, end));
    }

    let duration = adjusted_end(start, end) - start.minutes();
    if duration <= 0 {
        return Err(degenerate(start, end));
    }

    Ok(duration)
}

fn degenerate(start: TimeOfDay, end: TimeOfDay) -> NightError {
    NightError::DegenerateInterval {
        start: start.to_string(),
        end: end.to_string(),
    }
}

/// The last third of a night, kept in unnormalized form until formatted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LastThird {
    pub start: TimeOfDay,
    /// End anchor in minutes, possibly `>= 1440` after rollover.
    pub end_adjusted: i64,
    pub duration: i64,
    /// `end_adjusted - duration / 3`, not yet rounded.
    pub boundary_raw: f64,
}

impl LastThird {
    /// Boundary rounded to the nearest minute and normalized.
    pub fn boundary(&self) -> TimeOfDay {
        TimeOfDay::from_minutes(self.boundary_raw.round() as i64)
    }

    pub fn end(&self) -> TimeOfDay {
        TimeOfDay::from_minutes(self.end_adjusted)
    }

    pub fn boundary_text(&self) -> String {
        format_fractional_minutes(self.boundary_raw)
    }

    pub fn end_text(&self) -> String {
        format_minutes(self.end_adjusted)
    }
}

/// Compute where the last third of the night starts and where it ends.
///
/// # Arguments
/// * `start` - Maghrib anchor
/// * `end` - Fajr anchor (same day or next day, decided by rollover)
///
/// # Example
/// 18:00 to 05:00: end becomes 1740, duration 660, boundary 1740 - 220 = 1520,
/// which normalizes to 80 minutes, "01:20".
pub fn last_third(start: TimeOfDay, end: TimeOfDay) -> Result<LastThird> {
    let duration = night_duration(start, end)?;
    let end_adjusted = adjusted_end(start, end);
    let boundary_raw = end_adjusted as f64 - duration as f64 / 3.0;

    Ok(LastThird {
        start,
        end_adjusted,
        duration,
        boundary_raw,
    })
}

//! Result assembly: resolve anchors, compute the last third, render text.
//!
//! This is the boundary where every [`NightError`](crate::error::NightError)
//! stops. Callers get either the full four-value summary or one fixed failure
//! message, never a partial result.
//!
//! ## Error precedence
//! 1. A non-empty override that is not `HH:MM` fails first, before any request.
//! 2. With both overrides present the timings service is not contacted at all.
//! 3. Otherwise fetch and response-shape errors win over parse errors on the
//!    fetched values, since the latter can only be seen after a fetch.

use std::fmt;

use crate::config::Language;
use crate::error::Result;
use crate::logger::Log;
use crate::night::{last_third, parse_time_of_day};
use crate::timings::{RemoteTimings, TimingsQuery, TimingsSource};

/// Manually entered anchors. Blank strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub maghrib: Option<String>,
    pub fajr: Option<String>,
}

impl Overrides {
    pub fn new(maghrib: Option<String>, fajr: Option<String>) -> Self {
        Self {
            maghrib: non_blank(maghrib),
            fajr: non_blank(fajr),
        }
    }

    /// Fill fields missing in `self` from `fallback`.
    pub fn or(self, fallback: &Overrides) -> Overrides {
        Overrides {
            maghrib: self.maghrib.or_else(|| fallback.maghrib.clone()),
            fajr: self.fajr.or_else(|| fallback.fajr.clone()),
        }
    }

    /// Both anchors are given, no remote value is needed.
    pub fn is_complete(&self) -> bool {
        self.maghrib.is_some() && self.fajr.is_some()
    }

    fn validate(&self) -> Result<()> {
        for raw in [&self.maghrib, &self.fajr].into_iter().flatten() {
            parse_time_of_day(raw)?;
        }
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The effective pair of anchor strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchors {
    pub maghrib: String,
    pub fajr: String,
}

/// Pick each anchor from the overrides when present, else from the remote response.
pub fn resolve_anchors(remote: &RemoteTimings, overrides: &Overrides) -> Anchors {
    Anchors {
        maghrib: overrides
            .maghrib
            .clone()
            .unwrap_or_else(|| remote.maghrib.clone()),
        fajr: overrides.fajr.clone().unwrap_or_else(|| remote.fajr.clone()),
    }
}

/// A successful computation, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NightSummary {
    pub maghrib: String,
    pub fajr: String,
    pub boundary: String,
    pub end: String,
}

impl NightSummary {
    /// Multi-line text with one labeled value per line.
    pub fn render(&self, language: Language) -> String {
        let labels = Labels::for_language(language);
        format!(
            "{}: {}\n{}: {}\n\n{}\n{}\n{}\n{}",
            labels.maghrib,
            self.maghrib,
            labels.fajr,
            self.fajr,
            labels.begins,
            self.boundary,
            labels.ends,
            self.end
        )
    }
}

impl fmt::Display for NightSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Language::En))
    }
}

struct Labels {
    maghrib: &'static str,
    fajr: &'static str,
    begins: &'static str,
    ends: &'static str,
    failure: &'static str,
}

impl Labels {
    fn for_language(language: Language) -> &'static Labels {
        match language {
            Language::En => &ENGLISH,
            Language::Ar => &ARABIC,
        }
    }
}

static ENGLISH: Labels = Labels {
    maghrib: "Maghrib",
    fajr: "Fajr",
    begins: "Last third begins at",
    ends: "and ends at",
    failure: "Failed to fetch prayer times",
};

static ARABIC: Labels = Labels {
    maghrib: "المغرب",
    fajr: "الفجر",
    begins: "يبدأ الثلث الأخير عند",
    ends: "وينتهي عند",
    failure: "حدث خطأ في جلب البيانات",
};

/// The single message shown for any failure.
pub fn failure_message(language: Language) -> &'static str {
    Labels::for_language(language).failure
}

/// Compute the summary from already resolved anchors. Pure.
pub fn summarize(anchors: &Anchors) -> Result<NightSummary> {
    let start = parse_time_of_day(&anchors.maghrib)?;
    let end = parse_time_of_day(&anchors.fajr)?;
    let third = last_third(start, end)?;

    Ok(NightSummary {
        maghrib: anchors.maghrib.clone(),
        fajr: anchors.fajr.clone(),
        boundary: third.boundary_text(),
        end: third.end_text(),
    })
}

/// Resolve anchors (fetching only if needed) and compute the summary.
pub fn compute_summary<S>(
    source: &S,
    query: &TimingsQuery,
    overrides: &Overrides,
) -> Result<NightSummary>
where
    S: TimingsSource + ?Sized,
{
    overrides.validate()?;

    let anchors = match (&overrides.maghrib, &overrides.fajr) {
        (Some(maghrib), Some(fajr)) => Anchors {
            maghrib: maghrib.clone(),
            fajr: fajr.clone(),
        },
        _ => {
            let remote = source.fetch(query)?;
            resolve_anchors(&remote, overrides)
        }
    };

    summarize(&anchors)
}

/// Turn an outcome into display text. Errors never pass this point.
pub fn render_outcome(outcome: &Result<NightSummary>, language: Language) -> String {
    match outcome {
        Ok(summary) => summary.render(language),
        Err(e) => {
            Log::log_debug(&format!("Computation failed: {}", e));
            failure_message(language).to_string()
        }
    }
}

/// Compute and render in one step.
pub fn run_once<S>(
    source: &S,
    query: &TimingsQuery,
    overrides: &Overrides,
    language: Language,
) -> String
where
    S: TimingsSource + ?Sized,
{
    render_outcome(&compute_summary(source, query, overrides), language)
}

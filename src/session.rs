//! Repeated recomputation with a shared result slot.
//!
//! Each recompute runs on its own worker thread so the interactive loop stays
//! responsive while a request is in flight. Requests are numbered with
//! increasing tickets and the slot only accepts a result whose ticket is newer
//! than the one it already holds: the newest request wins, and a slow stale
//! request that finishes late is discarded instead of overwriting fresher
//! output.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::config::Language;
use crate::signals::WatchEvent;
use crate::summary::{Overrides, run_once};
use crate::timings::{TimingsQuery, TimingsSource};

#[derive(Debug, Default)]
struct Published {
    ticket: u64,
    text: Option<String>,
}

/// Last displayed result plus the ticket counter.
#[derive(Debug, Default)]
pub struct ResultSlot {
    issued: AtomicU64,
    published: Mutex<Published>,
}

impl ResultSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next ticket. Tickets start at 1.
    pub fn issue_ticket(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Store `text` if `ticket` is newer than the published one.
    ///
    /// # Returns
    /// `true` if the text was stored, `false` if it was stale
    pub fn publish(&self, ticket: u64, text: String) -> bool {
        let mut published = self
            .published
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if ticket <= published.ticket {
            return false;
        }
        published.ticket = ticket;
        published.text = Some(text);
        true
    }

    /// The currently published result with its ticket.
    pub fn latest(&self) -> Option<(u64, String)> {
        let published = self
            .published
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        published
            .text
            .as_ref()
            .map(|text| (published.ticket, text.clone()))
    }

    pub fn latest_issued(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }
}

/// Everything a recompute needs, shared with the worker threads.
pub struct Session<S> {
    source: Arc<S>,
    slot: Arc<ResultSlot>,
    query: TimingsQuery,
    language: Language,
    pub overrides: Overrides,
    events: Option<Sender<WatchEvent>>,
}

impl<S> Session<S>
where
    S: TimingsSource + Send + Sync + 'static,
{
    pub fn new(source: S, query: TimingsQuery, overrides: Overrides, language: Language) -> Self {
        Self {
            source: Arc::new(source),
            slot: Arc::new(ResultSlot::new()),
            query,
            language,
            overrides,
            events: None,
        }
    }

    /// Notify `events` with [`WatchEvent::Published`] whenever a result is stored.
    pub fn with_events(mut self, events: Sender<WatchEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn slot(&self) -> &Arc<ResultSlot> {
        &self.slot
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Start a recompute on a worker thread with the current overrides.
    ///
    /// # Returns
    /// The request's ticket and the worker handle
    pub fn request(&self) -> (u64, JoinHandle<()>) {
        let ticket = self.slot.issue_ticket();
        let source = Arc::clone(&self.source);
        let slot = Arc::clone(&self.slot);
        let query = self.query.clone();
        let overrides = self.overrides.clone();
        let language = self.language;
        let events = self.events.clone();

        let handle = thread::spawn(move || {
            let text = run_once(source.as_ref(), &query, &overrides, language);
            if slot.publish(ticket, text) {
                if let Some(events) = events {
                    // Receiver gone means the loop is shutting down
                    let _ = events.send(WatchEvent::Published(ticket));
                }
            }
        });

        (ticket, handle)
    }
}

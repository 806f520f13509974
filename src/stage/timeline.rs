//! Deferred completion scheduling.
//!
//! Nothing in the engine blocks or suspends: "waiting for an animation" is a
//! completion entry on this timeline, fired when the host next calls
//! `Stage::tick` with a timestamp at or past the entry's due time. The host
//! decides where ticks come from (a frame clock, a timer wheel); the engine
//! only orders and fires them.
//!
//! Entries are not cancellable - once scheduled, an entry fires even if the
//! token involved has been despawned or recycled in the interim. Every
//! firing therefore re-validates its token handle before touching anything.

use super::transfer::PendingAction;

#[derive(Debug)]
struct Entry {
    due: u64,
    seq: u64,
    action: PendingAction,
}

/// Ordered queue of scheduled completions on a host-driven clock.
#[derive(Debug, Default)]
pub(crate) struct Timeline {
    now: u64,
    next_seq: u64,
    entries: Vec<Entry>,
}

impl Timeline {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Current timeline time in ms.
    pub(crate) fn now(&self) -> u64 {
        self.now
    }

    /// Number of entries waiting to fire.
    pub(crate) fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Schedule `action` to fire `delay_ms` after the current time.
    pub(crate) fn schedule(&mut self, delay_ms: u64, action: PendingAction) {
        let entry = Entry {
            due: self.now + delay_ms,
            seq: self.next_seq,
            action,
        };
        self.next_seq += 1;
        self.entries.push(entry);
    }

    /// Advance the clock and return every action now due, in (due, seq)
    /// order. The clock never moves backwards.
    pub(crate) fn advance(&mut self, now_ms: u64) -> Vec<PendingAction> {
        self.now = self.now.max(now_ms);

        let mut due = Vec::new();
        let mut rest = Vec::new();
        for entry in self.entries.drain(..) {
            if entry.due <= self.now {
                due.push(entry);
            } else {
                rest.push(entry);
            }
        }
        self.entries = rest;

        due.sort_by_key(|e| (e.due, e.seq));
        due.into_iter().map(|e| e.action).collect()
    }
}

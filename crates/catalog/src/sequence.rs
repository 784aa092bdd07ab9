//! Last-write-wins sequencing for overlapping fetches.
//!
//! When the shopper changes filters faster than the API answers, responses
//! can arrive out of order. Every request gets a ticket from a monotonic
//! counter; a response is only accepted when its ticket is newer than the
//! last accepted one.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Monotonic request number. Tickets start at 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticket(u64);

impl Ticket {
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Issues tickets and filters out stale responses. Shareable across threads.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: AtomicU64,
    accepted: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next ticket.
    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Accept a response for `ticket` unless a newer one was already accepted.
    ///
    /// Returns `false` for stale (or repeated) tickets; the caller must drop
    /// that response.
    pub fn accept(&self, ticket: Ticket) -> bool {
        let previous = self.accepted.fetch_max(ticket.0, Ordering::SeqCst);
        let fresh = previous < ticket.0;
        if !fresh {
            tracing::debug!(ticket = ticket.0, latest = previous, "dropping stale response");
        }
        fresh
    }

    /// Whether `ticket` is the most recently issued one.
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }
}

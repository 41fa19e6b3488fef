//! Stale-render detection for asynchronous hosts.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counter of render requests.
///
/// A host calls [`RenderGeneration::begin`] when a render starts and checks
/// [`RenderGeneration::is_current`] before publishing the result, dropping
/// results that a newer request has superseded.
#[derive(Debug, Default)]
pub struct RenderGeneration {
    counter: AtomicU64,
}

/// Identifies one render request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GenerationTicket(u64);

impl GenerationTicket {
    /// Generation number of the ticket.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl RenderGeneration {
    /// Creates a counter at generation zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// Starts a new generation, superseding every earlier ticket.
    pub fn begin(&self) -> GenerationTicket {
        GenerationTicket(self.counter.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Returns true if no render has started since `ticket` was issued.
    #[must_use]
    pub fn is_current(&self, ticket: GenerationTicket) -> bool {
        self.counter.load(Ordering::Acquire) == ticket.0
    }
}

//! Monotonic request sequencing for race protection
//!
//! Async lookups cannot be cancelled once dispatched; what can be controlled
//! is whether their eventual result is applied. Each dispatch takes a fresh
//! id from the sequencer, and a completed response only mutates state if its
//! id is still the latest. One sequencer per coordinator instance, so
//! concurrent sessions never interfere.

/// Identifier captured at dispatch time, compared on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(u64);

#[derive(Debug, Default)]
pub struct RequestSequencer {
    counter: u64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the next id for a dispatch; every outstanding earlier request
    /// becomes stale.
    pub fn begin(&mut self) -> RequestId {
        self.counter += 1;
        RequestId(self.counter)
    }

    /// Whether a response for `id` is still authoritative.
    pub fn is_current(&self, id: RequestId) -> bool {
        id.0 == self.counter
    }

    /// Make every outstanding request stale without dispatching a new one.
    /// Used when the session resets or a synchronous result supersedes an
    /// in-flight lookup.
    pub fn invalidate(&mut self) {
        self.counter += 1;
    }
}

//! Identifier assignment strategies.
//!
//! Two schemes are supported per collection:
//!
//! - **Sequential**: `max(existing serial ids) + 1`, reconciled against the
//!   loaded snapshot on every assignment. The in-memory counter never
//!   regresses, so deleting the highest document does not recycle its id.
//! - **Random**: a v4 UUID per document; no ordering semantics.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

use tiendita_core::DocumentId;

/// How a collection assigns identifiers to new documents.
#[derive(Debug)]
pub enum IdStrategy {
    /// Monotonic integer counter reconciled with the snapshot.
    Sequential(SequentialCounter),
    /// Opaque random identifier.
    Random,
}

impl IdStrategy {
    /// Sequential counter strategy, starting at 1 for an empty collection.
    #[must_use]
    pub fn sequential() -> Self {
        Self::Sequential(SequentialCounter::new())
    }

    /// Random UUID strategy.
    #[must_use]
    pub const fn random() -> Self {
        Self::Random
    }

    /// Produce the next identifier given the ids already in the collection.
    pub fn next(&self, existing: impl Iterator<Item = DocumentId>) -> DocumentId {
        match self {
            Self::Sequential(counter) => {
                let observed_max = existing.filter_map(|id| id.as_serial()).max().unwrap_or(0);
                DocumentId::Serial(counter.next(observed_max))
            }
            Self::Random => DocumentId::Opaque(Uuid::new_v4()),
        }
    }
}

/// Monotonic counter that never hands out a value at or below the highest
/// identifier observed in a snapshot.
#[derive(Debug)]
pub struct SequentialCounter {
    next: AtomicU64,
}

impl SequentialCounter {
    /// Fresh counter; the first assignment on an empty collection is 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Claim the next value, given the highest serial id currently persisted
    /// (0 for an empty collection). The counter is bumped to
    /// `observed_max + 1` if it has fallen behind, and never moves backwards.
    pub fn next(&self, observed_max: u64) -> u64 {
        let mut current = self.next.load(Ordering::Acquire);
        loop {
            let candidate = current.max(observed_max + 1);
            match self.next.compare_exchange_weak(
                current,
                candidate + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return candidate,
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for SequentialCounter {
    fn default() -> Self {
        Self::new()
    }
}

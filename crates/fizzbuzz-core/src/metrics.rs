//! Usage metrics: hit counts per request shape.
//!
//! `record` and `snapshot` go through one lock, so a snapshot is a
//! point-in-time view and concurrent increments are never lost.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::{FizzBuzzError, Result};
use crate::shape::RequestShape;

/// One row of a metrics snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitEntry {
    pub request: RequestShape,
    pub hits: u64,
}

/// Record and read back service usage.
pub trait MetricsStore: Send + Sync {
    /// Count one more hit for `shape`.
    fn record(&self, shape: RequestShape);

    /// Every recorded shape with its current count. Order is unspecified.
    fn snapshot(&self) -> Vec<HitEntry>;

    /// Number of distinct shapes recorded.
    fn len(&self) -> usize {
        self.snapshot().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of hits across all shapes.
    fn total_hits(&self) -> u64 {
        self.snapshot().iter().map(|e| e.hits).sum()
    }

    /// Entry with the highest hit count.
    ///
    /// Ties resolve to the first maximum met while iterating the snapshot.
    fn top_hit(&self) -> Result<HitEntry> {
        let mut top: Option<HitEntry> = None;
        for entry in self.snapshot() {
            match &top {
                Some(t) if t.hits >= entry.hits => {}
                _ => top = Some(entry),
            }
        }
        top.ok_or_else(|| FizzBuzzError::NotFound("no recorded metrics".into()))
    }
}

/// Process-local metrics store.
#[derive(Debug, Default)]
pub struct InMemoryMetrics {
    hits: Mutex<HashMap<RequestShape, u64>>,
}

impl InMemoryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    // The map only holds counters, so a panic elsewhere cannot leave it
    // half-updated; recover the guard instead of failing every later request.
    fn lock(&self) -> MutexGuard<'_, HashMap<RequestShape, u64>> {
        self.hits.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
            tracing::warn!("metrics lock poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl MetricsStore for InMemoryMetrics {
    fn record(&self, shape: RequestShape) {
        *self.lock().entry(shape).or_insert(0) += 1;
    }

    fn snapshot(&self) -> Vec<HitEntry> {
        self.lock()
            .iter()
            .map(|(request, hits)| HitEntry {
                request: request.clone(),
                hits: *hits,
            })
            .collect()
    }

    fn len(&self) -> usize {
        self.lock().len()
    }

    fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn total_hits(&self) -> u64 {
        self.lock().values().sum()
    }
}

//! Outcome counters.
//!
//! Thread-safe tracking of total, successful and per-category failed URLs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::FailureCategory;

/// Thread-safe outcome counters.
///
/// Every category is initialized to zero on creation, so increments never
/// allocate. The result sink updates these while holding its write lock,
/// which keeps `total_seen == succeeded + Σ failures` observable at any
/// quiescent point.
pub struct FailureCounters {
    total_seen: AtomicUsize,
    succeeded: AtomicUsize,
    failures: HashMap<FailureCategory, AtomicUsize>,
}

/// Point-in-time copy of [`FailureCounters`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    /// URLs with a recorded outcome
    pub total_seen: usize,
    /// URLs recorded as working
    pub succeeded: usize,
    /// Failed URLs per category
    pub failures: HashMap<FailureCategory, usize>,
}

impl CounterSnapshot {
    /// Count for one category (zero when absent).
    pub fn failure_count(&self, category: FailureCategory) -> usize {
        self.failures.get(&category).copied().unwrap_or(0)
    }

    /// Sum of all failure categories.
    pub fn total_failed(&self) -> usize {
        self.failures.values().sum()
    }
}

impl Default for FailureCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl FailureCounters {
    /// Creates counters with every category at zero.
    pub fn new() -> Self {
        let mut failures = HashMap::new();
        for category in FailureCategory::iter() {
            failures.insert(category, AtomicUsize::new(0));
        }

        FailureCounters {
            total_seen: AtomicUsize::new(0),
            succeeded: AtomicUsize::new(0),
            failures,
        }
    }

    /// Records one working URL.
    pub fn increment_success(&self) {
        self.succeeded.fetch_add(1, Ordering::SeqCst);
        self.total_seen.fetch_add(1, Ordering::SeqCst);
    }

    /// Records one failed URL under `category`.
    pub fn increment_failure(&self, category: FailureCategory) {
        if let Some(counter) = self.failures.get(&category) {
            counter.fetch_add(1, Ordering::SeqCst);
        } else {
            log::error!(
                "Attempted to increment failure counter for {:?} which is not in the map. \
                 This indicates a bug in FailureCounters initialization.",
                category
            );
        }
        self.total_seen.fetch_add(1, Ordering::SeqCst);
    }

    /// Get the count for a failure category.
    pub fn failure_count(&self, category: FailureCategory) -> usize {
        self.failures
            .get(&category)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Get total failures across all categories.
    pub fn total_failed(&self) -> usize {
        FailureCategory::iter()
            .map(|c| self.failure_count(c))
            .sum()
    }

    /// URLs recorded so far.
    pub fn total_seen(&self) -> usize {
        self.total_seen.load(Ordering::SeqCst)
    }

    /// URLs recorded as working.
    pub fn succeeded(&self) -> usize {
        self.succeeded.load(Ordering::SeqCst)
    }

    /// Copies every counter.
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            total_seen: self.total_seen(),
            succeeded: self.succeeded(),
            failures: FailureCategory::iter()
                .map(|c| (c, self.failure_count(c)))
                .collect(),
        }
    }
}

//! Activity labels and the bounded transition history.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use crate::sample::TimestampNs;

/// Maximum number of transition records retained in a history.
pub const HISTORY_CAPACITY: usize = 20;

/// Discrete activity classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Stationary,
    Walking,
    Running,
    Unknown,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActivityKind::Stationary => "stationary",
            ActivityKind::Walking => "walking",
            ActivityKind::Running => "running",
            ActivityKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Record of a committed activity transition.
///
/// Created only when a transition commits; immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// The activity that became current.
    pub activity: ActivityKind,

    /// Monotonic nanoseconds since monitoring start.
    pub timestamp_ns: TimestampNs,

    /// Heuristic confidence in `[0.0, 1.0]`.
    pub confidence: f64,
}

/// Bounded, newest-first log of committed transitions.
///
/// Acts as a sliding window: once at capacity, recording a new entry
/// drops the oldest one from the tail.
#[derive(Debug, Clone, Default)]
pub struct ActivityHistory {
    records: VecDeque<ActivityRecord>,
}

impl ActivityHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self {
            records: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Prepend a record, evicting the oldest entry beyond capacity.
    pub fn record(&mut self, entry: ActivityRecord) {
        self.records.push_front(entry);
        while self.records.len() > HISTORY_CAPACITY {
            self.records.pop_back();
        }
    }

    /// Remove all records.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Number of retained records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate newest first.
    pub fn iter(&self) -> impl Iterator<Item = &ActivityRecord> {
        self.records.iter()
    }

    /// The most recent record, if any.
    pub fn latest(&self) -> Option<&ActivityRecord> {
        self.records.front()
    }

    /// Record at the given index, newest first.
    pub fn get(&self, index: usize) -> Option<&ActivityRecord> {
        self.records.get(index)
    }
}

//! End-state sightings recorded by an execution.

use super::state::StateSet;

/// Ordered record of end states seen during a run.
///
/// Each entry is the set of end states newly reached by one step (or by
/// `start`). Empty snapshots are never stored, so a non-empty history
/// means at least one end state was seen at some point.
///
/// # Example
///
/// ```rust
/// use automate::core::{EndStateHistory, State, StateSet};
/// use std::sync::Arc;
///
/// let mut history = EndStateHistory::new();
/// history.record(StateSet::new());
/// assert!(history.is_empty());
///
/// let snapshot: StateSet = [Arc::new(State::new("accept"))].into_iter().collect();
/// history.record(snapshot);
/// assert_eq!(history.len(), 1);
/// assert_eq!(history.names(), vec![vec!["accept"]]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EndStateHistory {
    snapshots: Vec<StateSet>,
}

impl EndStateHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot, skipping it when empty.
    pub fn record(&mut self, snapshot: StateSet) {
        if !snapshot.is_empty() {
            self.snapshots.push(snapshot);
        }
    }

    pub fn snapshots(&self) -> &[StateSet] {
        &self.snapshots
    }

    pub fn latest(&self) -> Option<&StateSet> {
        self.snapshots.last()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// State names per snapshot, in recording order.
    pub fn names(&self) -> Vec<Vec<&str>> {
        self.snapshots
            .iter()
            .map(|snapshot| snapshot.iter().map(|state| state.name()).collect())
            .collect()
    }
}

//! State transition detection.

use std::collections::HashMap;

use crate::checker::{CheckResult, Status};
use crate::store::{CheckStore, StoreError};

/// Direction of a detected status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    WentDown,
    Recovered,
}

impl std::fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionKind::WentDown => write!(f, "went_down"),
            TransitionKind::Recovered => write!(f, "recovered"),
        }
    }
}

/// A status change together with the result that caused it.
#[derive(Debug, Clone)]
pub struct Transition {
    pub result: CheckResult,
    pub kind: TransitionKind,
}

/// Tracks last-known status per service and classifies new results.
#[derive(Debug, Default)]
pub struct StateTracker {
    states: HashMap<String, Status>,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed tracked state from the latest persisted result per service.
    ///
    /// Must run before the current cycle persists new rows; otherwise a
    /// fresh status would be compared against itself and real transitions
    /// suppressed.
    pub fn seed(&mut self, store: &dyn CheckStore) -> Result<(), StoreError> {
        for (service_name, result) in store.latest_per_service()? {
            tracing::debug!(
                service = %service_name,
                status = %result.status,
                "Seeded tracked state"
            );
            self.states.insert(service_name, result.status);
        }
        tracing::info!(services = self.states.len(), "State tracker seeded");
        Ok(())
    }

    /// Last-known status for a service, if it has ever been observed.
    pub fn state(&self, service_name: &str) -> Option<Status> {
        self.states.get(service_name).copied()
    }

    /// Record a new result and classify the change, if any.
    pub fn update_and_get_transition(&mut self, result: &CheckResult) -> Option<TransitionKind> {
        let old_status = self
            .states
            .insert(result.service_name.clone(), result.status);

        match (old_status, result.status) {
            (None, status) => {
                tracing::info!(
                    service = %result.service_name,
                    status = %status,
                    "First check for service"
                );
                None
            }
            (Some(old), new) if old == new => None,
            (Some(Status::Up), Status::Down) => {
                tracing::warn!(service = %result.service_name, "Service went DOWN");
                Some(TransitionKind::WentDown)
            }
            (Some(Status::Down), Status::Up) => {
                tracing::info!(service = %result.service_name, "Service RECOVERED");
                Some(TransitionKind::Recovered)
            }
            // Binary status leaves no other pairs.
            _ => None,
        }
    }

    /// Classify a batch of results, preserving input order.
    pub fn process_results(&mut self, results: &[CheckResult]) -> Vec<Transition> {
        results
            .iter()
            .filter_map(|result| {
                self.update_and_get_transition(result).map(|kind| Transition {
                    result: result.clone(),
                    kind,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn up(name: &str) -> CheckResult {
        CheckResult::up(name, 42, 200)
    }

    fn down(name: &str) -> CheckResult {
        CheckResult::down(name, Some(42), Some(503), "Expected 200, got 503")
    }

    #[test]
    fn first_observation_never_emits() {
        let mut tracker = StateTracker::new();
        assert_eq!(tracker.update_and_get_transition(&up("a")), None);
        assert_eq!(tracker.update_and_get_transition(&down("b")), None);
        assert_eq!(tracker.state("a"), Some(Status::Up));
        assert_eq!(tracker.state("b"), Some(Status::Down));
    }

    #[test]
    fn stable_states_emit_nothing() {
        let mut tracker = StateTracker::new();
        tracker.update_and_get_transition(&up("a"));
        assert_eq!(tracker.update_and_get_transition(&up("a")), None);
        assert_eq!(tracker.update_and_get_transition(&up("a")), None);

        tracker.update_and_get_transition(&down("b"));
        assert_eq!(tracker.update_and_get_transition(&down("b")), None);
    }

    #[test]
    fn transition_table() {
        let mut tracker = StateTracker::new();
        tracker.update_and_get_transition(&up("a"));
        assert_eq!(
            tracker.update_and_get_transition(&down("a")),
            Some(TransitionKind::WentDown)
        );
        assert_eq!(
            tracker.update_and_get_transition(&up("a")),
            Some(TransitionKind::Recovered)
        );
    }

    #[test]
    fn batch_preserves_order_and_drops_non_transitions() {
        let mut tracker = StateTracker::new();
        tracker.update_and_get_transition(&up("a"));
        tracker.update_and_get_transition(&up("b"));
        tracker.update_and_get_transition(&down("c"));

        let transitions =
            tracker.process_results(&[down("a"), up("b"), up("c"), up("never-seen")]);

        assert_eq!(transitions.len(), 2);
        assert_eq!(transitions[0].result.service_name, "a");
        assert_eq!(transitions[0].kind, TransitionKind::WentDown);
        assert_eq!(transitions[1].result.service_name, "c");
        assert_eq!(transitions[1].kind, TransitionKind::Recovered);
    }

    #[test]
    fn seeding_counts_as_first_observation() {
        let store = MemoryStore::new();
        store.save(&up("a")).unwrap();
        store.save(&down("a")).unwrap();

        let mut tracker = StateTracker::new();
        tracker.seed(&store).unwrap();
        assert_eq!(tracker.state("a"), Some(Status::Down));

        // Seeded state is prior knowledge: recovery now emits.
        assert_eq!(
            tracker.update_and_get_transition(&up("a")),
            Some(TransitionKind::Recovered)
        );
    }
}

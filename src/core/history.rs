//! Transition history tracking.
//!
//! Provides immutable tracking of the transitions a flow went through,
//! useful for diagnostics and for checkpointing a session.

use super::state::{Event, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single executed transition.
///
/// # Example
///
/// ```rust
/// use navflow::core::StateTransition;
/// use navflow::{flow_events, flow_states};
///
/// flow_states! {
///     enum Screen { Login, Welcome }
/// }
/// flow_events! {
///     enum Action { Submit }
/// }
///
/// let transition = StateTransition::now(Screen::Login, Action::Submit, Screen::Welcome);
/// assert_eq!(transition.to, Screen::Welcome);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State, E: Event> {
    /// The state being left
    pub from: S,
    /// The event that caused the transition
    pub event: E,
    /// The state being entered
    pub to: S,
    /// When the transition was committed
    pub timestamp: DateTime<Utc>,
}

impl<S: State, E: Event> StateTransition<S, E> {
    /// Record a transition committed right now.
    pub fn now(from: S, event: E, to: S) -> Self {
        Self {
            from,
            event,
            to,
            timestamp: Utc::now(),
        }
    }
}

/// Ordered history of transitions.
///
/// History is immutable: `record` returns a new history with the
/// transition appended and leaves the original untouched.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State, E: Event> {
    transitions: Vec<StateTransition<S, E>>,
}

impl<S: State, E: Event> Default for StateHistory<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, E: Event> StateHistory<S, E> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: StateTransition<S, E>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Keep only the most recent `limit` transitions, returning a new history.
    pub fn keep_last(&self, limit: usize) -> Self {
        let skip = self.transitions.len().saturating_sub(limit);
        Self {
            transitions: self.transitions[skip..].to_vec(),
        }
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the first transition followed by the
    /// `to` state of every transition.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Time between the first and the last recorded transition.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn transitions(&self) -> &[StateTransition<S, E>] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{flow_events, flow_states};

    flow_states! {
        enum TestState {
            Login,
            Welcome,
            Settings,
        }
    }

    flow_events! {
        enum TestEvent {
            Submit,
            OpenSettings,
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<TestState, TestEvent> = StateHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
    }

    #[test]
    fn record_is_immutable() {
        let history = StateHistory::new();
        let new_history = history.record(StateTransition::now(
            TestState::Login,
            TestEvent::Submit,
            TestState::Welcome,
        ));

        assert_eq!(history.len(), 0);
        assert_eq!(new_history.len(), 1);
        assert_eq!(new_history.transitions()[0].event, TestEvent::Submit);
    }

    #[test]
    fn get_path_returns_state_sequence() {
        let history = StateHistory::new()
            .record(StateTransition::now(
                TestState::Login,
                TestEvent::Submit,
                TestState::Welcome,
            ))
            .record(StateTransition::now(
                TestState::Welcome,
                TestEvent::OpenSettings,
                TestState::Settings,
            ));

        let path = history.get_path();
        assert_eq!(
            path,
            vec![&TestState::Login, &TestState::Welcome, &TestState::Settings]
        );
    }

    #[test]
    fn keep_last_drops_oldest_transitions() {
        let history = StateHistory::new()
            .record(StateTransition::now(
                TestState::Login,
                TestEvent::Submit,
                TestState::Welcome,
            ))
            .record(StateTransition::now(
                TestState::Welcome,
                TestEvent::OpenSettings,
                TestState::Settings,
            ));

        let trimmed = history.keep_last(1);
        assert_eq!(trimmed.len(), 1);
        assert_eq!(trimmed.transitions()[0].to, TestState::Settings);
        assert_eq!(history.keep_last(10).len(), 2);
    }

    #[test]
    fn single_transition_has_duration_zero() {
        let history = StateHistory::new().record(StateTransition::now(
            TestState::Login,
            TestEvent::Submit,
            TestState::Welcome,
        ));

        assert_eq!(history.duration(), Some(Duration::from_secs(0)));
    }

    #[test]
    fn history_serializes_correctly() {
        let history = StateHistory::new().record(StateTransition::now(
            TestState::Login,
            TestEvent::Submit,
            TestState::Welcome,
        ));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory<TestState, TestEvent> =
            serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.len(), 1);
        assert_eq!(deserialized.transitions()[0].from, TestState::Login);
    }
}

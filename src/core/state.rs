//! State and Event traits for flow definitions.
//!
//! Every flow is described by two closed enumerations: the states a
//! navigation session can be in, and the events that move it between them.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for flow states.
///
/// A state names one visible screen of the flow. States are plain values:
/// they key the transition table, so they must be hashable, and they are
/// checkpointed, so they must be serializable.
///
/// # Example
///
/// ```rust
/// use navflow::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum CheckoutState {
///     Cart,
///     Payment,
///     Receipt,
/// }
///
/// impl State for CheckoutState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Cart => "Cart",
///             Self::Payment => "Payment",
///             Self::Receipt => "Receipt",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Receipt)
///     }
/// }
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a terminal state.
    ///
    /// Terminal states are allowed to have no outgoing transitions.
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }
}

/// Trait for flow events.
///
/// Events are what the outside world raises (a button press, a back
/// press) to ask the flow to move on.
pub trait Event:
    Clone + Eq + Hash + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Get the event's name for display/logging.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashSet;

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestState {
        Login,
        Welcome,
        Done,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Login => "Login",
                Self::Welcome => "Welcome",
                Self::Done => "Done",
            }
        }

        fn is_final(&self) -> bool {
            matches!(self, Self::Done)
        }
    }

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestEvent {
        Submit,
    }

    impl Event for TestEvent {
        fn name(&self) -> &str {
            "Submit"
        }
    }

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(TestState::Login.name(), "Login");
        assert_eq!(TestState::Welcome.name(), "Welcome");
        assert_eq!(TestState::Done.name(), "Done");
        assert_eq!(TestEvent::Submit.name(), "Submit");
    }

    #[test]
    fn is_final_identifies_terminal_states() {
        assert!(!TestState::Login.is_final());
        assert!(!TestState::Welcome.is_final());
        assert!(TestState::Done.is_final());
    }

    #[test]
    fn states_can_key_hash_collections() {
        let set: HashSet<TestState> = [TestState::Login, TestState::Login, TestState::Done]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn state_serializes_correctly() {
        let json = serde_json::to_string(&TestState::Welcome).unwrap();
        let deserialized: TestState = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, TestState::Welcome);
    }
}

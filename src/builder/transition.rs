//! Builder for transitions and their nested sub-transitions.

use crate::context::ContextArgs;
use crate::core::{Event, Guard, State};

/// Builder for one transition, started with [`on`].
///
/// The source state is implied by where the builder is attached: the
/// initial state for `FlowBuilder::transit`, or the parent's target for a
/// nested `transit`.
pub struct TransitionBuilder<S: State, E: Event> {
    pub(crate) event: E,
    pub(crate) target: Option<S>,
    pub(crate) terminal: bool,
    pub(crate) guard: Option<Guard>,
    pub(crate) children: Vec<TransitionBuilder<S, E>>,
}

/// Start a transition triggered by `event`.
///
/// ```rust
/// use navflow::builder::{from, on};
/// use navflow::{flow_events, flow_states};
///
/// flow_states! {
///     enum Screen { Login, Welcome }
/// }
/// flow_events! {
///     enum Action { LoginProvided, BackClicked }
/// }
///
/// let graph = from(Screen::Login)
///     .transit(
///         on(Action::LoginProvided)
///             .to(Screen::Welcome)
///             .transit(on(Action::BackClicked).to(Screen::Login)),
///     )
///     .build()
///     .unwrap();
///
/// assert_eq!(graph.states().len(), 2);
/// ```
pub fn on<S: State, E: Event>(event: E) -> TransitionBuilder<S, E> {
    TransitionBuilder::new(event)
}

impl<S: State, E: Event> TransitionBuilder<S, E> {
    pub fn new(event: E) -> Self {
        Self {
            event,
            target: None,
            terminal: false,
            guard: None,
            children: Vec::new(),
        }
    }

    /// Set the target state (required, or use [`finish`](Self::finish)).
    pub fn to(mut self, state: S) -> Self {
        self.target = Some(state);
        self
    }

    /// Set a terminal target state, which may have no transitions of its own.
    pub fn finish(mut self, state: S) -> Self {
        self.target = Some(state);
        self.terminal = true;
        self
    }

    /// Add a guard (optional).
    pub fn guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a guard using a closure over the context arguments (optional).
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&ContextArgs) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Nest a transition that leaves from this transition's target.
    pub fn transit(mut self, child: TransitionBuilder<S, E>) -> Self {
        self.children.push(child);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ArgKey;
    use crate::{flow_events, flow_states};

    flow_states! {
        enum TestState {
            Start,
            Middle,
            End,
        }
    }

    flow_events! {
        enum TestEvent {
            Go,
            Back,
        }
    }

    const READY: ArgKey<bool> = ArgKey::new("READY");

    #[test]
    fn builder_records_target_and_children() {
        let builder = on::<TestState, TestEvent>(TestEvent::Go)
            .to(TestState::Middle)
            .transit(on(TestEvent::Back).to(TestState::Start));

        assert_eq!(builder.target, Some(TestState::Middle));
        assert!(!builder.terminal);
        assert_eq!(builder.children.len(), 1);
        assert_eq!(builder.children[0].event, TestEvent::Back);
    }

    #[test]
    fn finish_marks_terminal_target() {
        let builder = on::<TestState, TestEvent>(TestEvent::Go).finish(TestState::End);

        assert_eq!(builder.target, Some(TestState::End));
        assert!(builder.terminal);
    }

    #[test]
    fn when_installs_guard() {
        let builder = on::<TestState, TestEvent>(TestEvent::Go)
            .to(TestState::Middle)
            .when(|args| args.find(&READY).unwrap_or(false));

        let guard = builder.guard.expect("guard should be set");
        let mut args = ContextArgs::new();
        assert!(!guard.check(&args));
        args.put(&READY, true).unwrap();
        assert!(guard.check(&args));
    }
}

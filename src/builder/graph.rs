//! Validated, immutable flow graphs.

use crate::context::ContextArgs;
use crate::core::{Event, Guard, State};
use std::collections::{HashMap, HashSet};

/// One edge of a flow graph.
#[derive(Clone, Debug)]
pub struct TransitionDef<S: State, E: Event> {
    pub from: S,
    pub event: E,
    pub to: S,
    pub guard: Option<Guard>,
}

impl<S: State, E: Event> TransitionDef<S, E> {
    /// Check the guard, if any, against the current arguments (pure).
    pub fn can_fire(&self, args: &ContextArgs) -> bool {
        self.guard.as_ref().map_or(true, |guard| guard.check(args))
    }
}

/// Transition table of a flow, indexed by `(state, event)`.
///
/// Only produced by [`FlowBuilder::build`](super::FlowBuilder::build), so a
/// `FlowGraph` always has an initial state, no duplicate `(state, event)`
/// pairs, no unreachable states and no dead ends.
#[derive(Clone, Debug)]
pub struct FlowGraph<S: State, E: Event> {
    pub(crate) initial: S,
    pub(crate) states: Vec<S>,
    pub(crate) table: HashMap<S, HashMap<E, TransitionDef<S, E>>>,
    pub(crate) terminals: HashSet<S>,
    pub(crate) clear_on_leave: HashSet<S>,
}

impl<S: State, E: Event> FlowGraph<S, E> {
    pub fn initial(&self) -> &S {
        &self.initial
    }

    /// Every state of the flow, in declaration order.
    pub fn states(&self) -> &[S] {
        &self.states
    }

    pub fn contains_state(&self, state: &S) -> bool {
        self.states.contains(state)
    }

    /// The transition leaving `state` on `event`, if declared.
    pub fn transition(&self, state: &S, event: &E) -> Option<&TransitionDef<S, E>> {
        self.table.get(state)?.get(event)
    }

    /// Events accepted in `state`.
    pub fn events_from(&self, state: &S) -> Vec<&E> {
        self.table
            .get(state)
            .map(|outgoing| outgoing.keys().collect())
            .unwrap_or_default()
    }

    /// Whether `state` was declared terminal (via `finish`, `terminal` or
    /// `State::is_final`).
    pub fn is_terminal(&self, state: &S) -> bool {
        state.is_final() || self.terminals.contains(state)
    }

    /// Whether leaving `state` clears the context arguments.
    pub fn clears_args_on_leave(&self, state: &S) -> bool {
        self.clear_on_leave.contains(state)
    }

    pub fn transition_count(&self) -> usize {
        self.table.values().map(HashMap::len).sum()
    }
}

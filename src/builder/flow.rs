//! Builder for constructing flow graphs.

use crate::builder::error::{GraphError, GraphIssue};
use crate::builder::graph::{FlowGraph, TransitionDef};
use crate::builder::transition::TransitionBuilder;
use crate::core::{Event, State};
use std::collections::{HashMap, HashSet, VecDeque};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<GraphIssue>>;

/// Builder for flow graphs with a fluent API.
pub struct FlowBuilder<S: State, E: Event> {
    initial: Option<S>,
    sourced: Vec<(Option<S>, TransitionBuilder<S, E>)>,
    terminals: HashSet<S>,
    clear_on_leave: HashSet<S>,
}

/// Start a flow whose initial state is `initial`.
pub fn from<S: State, E: Event>(initial: S) -> FlowBuilder<S, E> {
    FlowBuilder::new().initial(initial)
}

impl<S: State, E: Event> FlowBuilder<S, E> {
    pub fn new() -> Self {
        Self {
            initial: None,
            sourced: Vec::new(),
            terminals: HashSet::new(),
            clear_on_leave: HashSet::new(),
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Add a transition leaving the initial state.
    pub fn transit(mut self, transition: TransitionBuilder<S, E>) -> Self {
        self.sourced.push((None, transition));
        self
    }

    /// Add a transition leaving `state`.
    pub fn transit_from(mut self, state: S, transition: TransitionBuilder<S, E>) -> Self {
        self.sourced.push((Some(state), transition));
        self
    }

    /// Add a flat `from --event--> to` transition.
    pub fn add_transition(self, from: S, event: E, to: S) -> Self {
        self.transit_from(from, TransitionBuilder::new(event).to(to))
    }

    /// Mark `state` as terminal: it may have no outgoing transitions.
    pub fn terminal(mut self, state: S) -> Self {
        self.terminals.insert(state);
        self
    }

    /// Clear the context arguments whenever `state` is left, after its leave
    /// callbacks ran.
    pub fn clear_args_on_leave(mut self, state: S) -> Self {
        self.clear_on_leave.insert(state);
        self
    }

    /// Validate and build the graph.
    ///
    /// Every issue is collected before failing, so one error lists all the
    /// problems of the declaration.
    pub fn build(self) -> Result<FlowGraph<S, E>, GraphError> {
        let mut checks: Vec<Check> = Vec::new();
        let mut terminals = self.terminals;
        let mut edges = Vec::new();

        for (source, transition) in self.sourced {
            // Without an initial state this is reported as MissingInitialState.
            if let Some(from) = source.or_else(|| self.initial.clone()) {
                flatten(from, transition, &mut edges, &mut terminals, &mut checks);
            }
        }

        let Some(initial) = self.initial else {
            let mut issues = vec![GraphIssue::MissingInitialState];
            if let Err(error) = finish(checks) {
                issues.extend(error.into_issues());
            }
            return Err(GraphError::new(issues));
        };

        if edges.is_empty() {
            checks.push(Validation::fail(GraphIssue::NoTransitions));
        }

        let mut states = vec![initial.clone()];
        let mut table: HashMap<S, HashMap<E, TransitionDef<S, E>>> = HashMap::new();
        for edge in edges {
            for state in [&edge.from, &edge.to] {
                if !states.contains(state) {
                    states.push(state.clone());
                }
            }

            let outgoing = table.entry(edge.from.clone()).or_default();
            if outgoing.contains_key(&edge.event) {
                checks.push(Validation::fail(GraphIssue::DuplicateTransition {
                    state: edge.from.name().to_string(),
                    event: edge.event.name().to_string(),
                }));
            } else {
                outgoing.insert(edge.event.clone(), edge);
            }
        }

        let reachable = reachable_from(&initial, &table);
        for state in &states {
            if !reachable.contains(state) {
                checks.push(Validation::fail(GraphIssue::UnreachableState {
                    state: state.name().to_string(),
                }));
            }

            let has_outgoing = table.get(state).is_some_and(|outgoing| !outgoing.is_empty());
            if !has_outgoing && !state.is_final() && !terminals.contains(state) {
                checks.push(Validation::fail(GraphIssue::DeadEnd {
                    state: state.name().to_string(),
                }));
            }
        }

        finish(checks)?;

        Ok(FlowGraph {
            initial,
            states,
            table,
            terminals,
            clear_on_leave: self.clear_on_leave,
        })
    }
}

impl<S: State, E: Event> Default for FlowBuilder<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Unroll a nested transition into flat edges. Children leave from the
/// parent's target.
fn flatten<S: State, E: Event>(
    from: S,
    transition: TransitionBuilder<S, E>,
    edges: &mut Vec<TransitionDef<S, E>>,
    terminals: &mut HashSet<S>,
    checks: &mut Vec<Check>,
) {
    let Some(to) = transition.target else {
        checks.push(Validation::fail(GraphIssue::MissingTargetState {
            event: transition.event.name().to_string(),
        }));
        return;
    };

    if transition.terminal {
        terminals.insert(to.clone());
    }

    for child in transition.children {
        flatten(to.clone(), child, edges, terminals, checks);
    }

    edges.push(TransitionDef {
        from,
        event: transition.event,
        to,
        guard: transition.guard,
    });
}

fn reachable_from<S: State, E: Event>(
    initial: &S,
    table: &HashMap<S, HashMap<E, TransitionDef<S, E>>>,
) -> HashSet<S> {
    let mut seen = HashSet::from([initial.clone()]);
    let mut queue = VecDeque::from([initial.clone()]);

    while let Some(state) = queue.pop_front() {
        let Some(outgoing) = table.get(&state) else {
            continue;
        };
        for edge in outgoing.values() {
            if seen.insert(edge.to.clone()) {
                queue.push_back(edge.to.clone());
            }
        }
    }

    seen
}

fn finish(checks: Vec<Check>) -> Result<(), GraphError> {
    match Validation::all_vec(checks) {
        Validation::Success(_) => Ok(()),
        Validation::Failure(issues) => Err(GraphError::new(issues.iter().cloned().collect())),
    }
}

//! Build errors for flow graphs.

use thiserror::Error;

/// A single problem found while validating a flow graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphIssue {
    #[error("Initial state not specified. Start with from(state) or call .initial(state)")]
    MissingInitialState,

    #[error("No transitions defined. Add at least one transition")]
    NoTransitions,

    #[error("Transition on '{event}' has no target state. Call .to(state) or .finish(state)")]
    MissingTargetState { event: String },

    #[error("State '{state}' declares event '{event}' more than once")]
    DuplicateTransition { state: String, event: String },

    #[error("State '{state}' cannot be reached from the initial state")]
    UnreachableState { state: String },

    #[error("State '{state}' has no outgoing transitions and is not terminal")]
    DeadEnd { state: String },
}

/// A malformed flow graph. Holds every issue found, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid flow graph: {}", describe(.issues))]
pub struct GraphError {
    issues: Vec<GraphIssue>,
}

impl GraphError {
    pub(crate) fn new(issues: Vec<GraphIssue>) -> Self {
        Self { issues }
    }

    pub(crate) fn into_issues(self) -> Vec<GraphIssue> {
        self.issues
    }

    pub fn issues(&self) -> &[GraphIssue] {
        &self.issues
    }

    pub fn contains(&self, issue: &GraphIssue) -> bool {
        self.issues.contains(issue)
    }
}

fn describe(issues: &[GraphIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

//! Errors raised by a running flow.

use crate::checkpoint::CheckpointError;
use std::fmt;
use thiserror::Error;

/// Misuse of the engine lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("Flow already started. start() and resume() may only be called once")]
    AlreadyStarted,

    #[error("Flow not started. Call start(context) first")]
    NotStarted,

    #[error("Flow context is no longer attached to a running engine")]
    Detached,
}

/// Which side of a transition a callback belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackPhase {
    Enter,
    Leave,
}

impl fmt::Display for CallbackPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enter => f.write_str("enter"),
            Self::Leave => f.write_str("leave"),
        }
    }
}

/// Errors that can occur while driving a flow
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// No transition for the event in the current state. Expected in normal
    /// operation (a back press with nothing to go back to), never fatal.
    #[error("No transition from state '{state}' on event '{event}'")]
    IllegalTransition { state: String, event: String },

    #[error("Guard blocked event '{event}' in state '{state}'")]
    GuardBlocked { state: String, event: String },

    #[error("State '{state}' is not part of this flow")]
    UnknownState { state: String },

    #[error("The {phase} callback of state '{state}' failed: {message}")]
    CallbackFailed {
        state: String,
        phase: CallbackPhase,
        message: String,
    },

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}

impl FlowError {
    /// Whether this is the recoverable "nothing to do for this event" case.
    pub fn is_illegal_transition(&self) -> bool {
        matches!(self, Self::IllegalTransition { .. })
    }
}

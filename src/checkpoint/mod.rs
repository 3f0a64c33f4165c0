//! Checkpoint and resume support for flows.
//!
//! A checkpoint holds the minimum needed to put a navigation session back
//! where it was: the committed state, the transition history and the
//! context arguments. Callbacks, the router stack and the units on it are
//! not part of it; resuming fires the enter callbacks of the saved state,
//! which rebuild whatever presentation that state needs.

use crate::context::ContextArgs;
use crate::core::{Event, State, StateHistory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a running flow.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Checkpoint<S: State, E: Event> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: Uuid,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Initial state of the flow
    pub initial_state: S,

    /// State the flow had committed when the checkpoint was taken
    pub current_state: S,

    /// Transition history up to the checkpoint
    pub history: StateHistory<S, E>,

    /// Context arguments, each value as JSON text
    pub args: BTreeMap<String, String>,
}

impl<S: State, E: Event> Checkpoint<S, E> {
    pub fn new(
        initial_state: S,
        current_state: S,
        history: StateHistory<S, E>,
        args: &ContextArgs,
    ) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            initial_state,
            current_state,
            history,
            args: args.encode(),
        }
    }

    /// Decode the saved context arguments.
    pub fn context_args(&self) -> Result<ContextArgs, CheckpointError> {
        ContextArgs::decode(&self.args)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    /// Compact binary encoding, for platform "saved state" bundles.
    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(())
    }
}

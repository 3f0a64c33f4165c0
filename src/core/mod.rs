//! Core flow types.
//!
//! This module contains the value types every flow is made of:
//! - State and Event definitions via the `State` and `Event` traits
//! - Guard predicates over the shared context
//! - Immutable transition history

mod guard;
mod history;
mod state;

pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use state::{Event, State};

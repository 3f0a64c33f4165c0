//! Flow engine.
//!
//! An [`Engine`] owns a validated [`FlowGraph`](crate::builder::FlowGraph),
//! the enter/leave callbacks registered per state, and the committed state
//! of one navigation session. Events are validated when they are raised and
//! applied later, in order, on the engine's serial executor.

mod error;
mod machine;

pub use error::{CallbackPhase, FlowError, LifecycleError};
pub use machine::{Callback, Engine};

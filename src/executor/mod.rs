//! Serializing executors.
//!
//! All transition work of a flow (leave callbacks, the state change, enter
//! callbacks, router calls) runs on one logical worker, in the order it was
//! queued. The engine does not care what that worker is, only that the
//! [`SerialExecutor`] contract holds:
//!
//! - tasks run in submission order, never concurrently with each other
//! - `execute` never blocks on the task itself
//! - a failing or panicking task is reported to an [`ErrorSink`] and the
//!   worker moves on to the next task
//!
//! Two workers ship with the crate: [`ThreadExecutor`] owns a dedicated
//! thread, [`ManualExecutor`] is drained by the host's own loop.

mod manual;
mod sink;
mod thread;

pub use manual::ManualExecutor;
pub use sink::{ErrorSink, LogSink, TaskFailure};
pub(crate) use sink::panic_message;
pub use thread::ThreadExecutor;

use thiserror::Error;

/// Unit of work queued on an executor.
pub type Task = Box<dyn FnOnce() -> anyhow::Result<()> + Send + 'static>;

/// Single-worker FIFO task runner.
pub trait SerialExecutor: Send + Sync {
    /// Queue `task` behind everything already submitted.
    fn execute(&self, task: Task);
}

/// Errors that can occur while setting up an executor
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Failed to spawn flow worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

//! Reporting of failed tasks.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;

use super::Task;

/// A queued task that did not complete normally.
#[derive(Debug, Error)]
pub enum TaskFailure {
    #[error("Task failed: {0:#}")]
    Failed(anyhow::Error),

    #[error("Task panicked: {0}")]
    Panicked(String),
}

/// Destination for task failures.
///
/// The worker that ran the task is not the thread that queued it, so
/// failures cannot be returned to the caller; they go here instead.
pub trait ErrorSink: Send + Sync {
    fn report(&self, failure: TaskFailure);
}

impl<F> ErrorSink for F
where
    F: Fn(TaskFailure) + Send + Sync,
{
    fn report(&self, failure: TaskFailure) {
        self(failure)
    }
}

/// Default sink: logs every failure at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ErrorSink for LogSink {
    fn report(&self, failure: TaskFailure) {
        tracing::error!(%failure, "queued flow task failed");
    }
}

/// Run one task, routing errors and panics to `sink`.
pub(crate) fn run_task(task: Task, sink: &dyn ErrorSink) {
    match panic::catch_unwind(AssertUnwindSafe(task)) {
        Ok(Ok(())) => {}
        Ok(Err(error)) => sink.report(TaskFailure::Failed(error)),
        Err(payload) => sink.report(TaskFailure::Panicked(panic_message(payload.as_ref()))),
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

//! Serial executor backed by a dedicated worker thread.

use super::sink::{run_task, ErrorSink, LogSink};
use super::{ExecutorError, SerialExecutor, Task};
use crate::config::FlowConfig;
use crossbeam::channel::{self, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};

enum Message {
    Run(Task),
    Flush(Sender<()>),
}

/// Serial executor owning one named worker thread.
///
/// Tasks are sent over an unbounded channel and run one at a time in
/// submission order. Submitting from the worker itself only enqueues, so a
/// callback that triggers another event never jumps ahead of work that
/// was already queued.
///
/// Dropping the executor lets the worker finish the queue and joins it.
pub struct ThreadExecutor {
    sender: Option<Sender<Message>>,
    handle: Option<JoinHandle<()>>,
    worker: ThreadId,
}

impl ThreadExecutor {
    /// Spawn a worker named `name` that reports failures through `sink`.
    pub fn spawn(
        name: impl Into<String>,
        sink: Arc<dyn ErrorSink>,
    ) -> Result<Self, ExecutorError> {
        let (sender, receiver) = channel::unbounded::<Message>();

        let handle = thread::Builder::new().name(name.into()).spawn(move || {
            for message in receiver.iter() {
                match message {
                    Message::Run(task) => run_task(task, sink.as_ref()),
                    Message::Flush(ack) => {
                        let _ = ack.send(());
                    }
                }
            }
            tracing::debug!("flow worker stopped");
        })?;

        Ok(Self {
            sender: Some(sender),
            worker: handle.thread().id(),
            handle: Some(handle),
        })
    }

    /// Spawn a worker using the configured thread name and the logging sink.
    pub fn from_config(config: &FlowConfig) -> Result<Self, ExecutorError> {
        Self::spawn(config.worker_thread_name.clone(), Arc::new(LogSink))
    }

    /// Whether the calling thread is this executor's worker.
    pub fn is_worker_thread(&self) -> bool {
        thread::current().id() == self.worker
    }

    /// Block until every task submitted before this call has run.
    ///
    /// Returns immediately when called from the worker, where waiting
    /// would deadlock.
    pub fn flush(&self) {
        if self.is_worker_thread() {
            return;
        }
        let Some(sender) = &self.sender else {
            return;
        };

        let (ack, done) = channel::bounded(1);
        if sender.send(Message::Flush(ack)).is_ok() {
            let _ = done.recv();
        }
    }
}

impl SerialExecutor for ThreadExecutor {
    fn execute(&self, task: Task) {
        let sent = self
            .sender
            .as_ref()
            .map(|sender| sender.send(Message::Run(task)).is_ok())
            .unwrap_or(false);

        if !sent {
            tracing::warn!("flow worker is gone, dropping task");
        }
    }
}

impl Drop for ThreadExecutor {
    fn drop(&mut self) {
        self.sender.take();
        if self.is_worker_thread() {
            return;
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

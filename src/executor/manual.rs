//! Host-driven serial executor.

use super::sink::{run_task, ErrorSink, LogSink};
use super::{SerialExecutor, Task};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Serial executor whose worker is whatever thread calls
/// [`run_pending`](Self::run_pending).
///
/// This models a UI main loop: any thread may queue work, and the loop
/// drains the queue once per frame. Tests use it to observe the flow
/// between queued and executed states deterministically.
pub struct ManualExecutor {
    queue: Mutex<VecDeque<Task>>,
    draining: AtomicBool,
    sink: Arc<dyn ErrorSink>,
}

impl ManualExecutor {
    pub fn new() -> Self {
        Self::with_sink(Arc::new(LogSink))
    }

    pub fn with_sink(sink: Arc<dyn ErrorSink>) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            draining: AtomicBool::new(false),
            sink,
        }
    }

    /// Run queued tasks in order until the queue is empty, including tasks
    /// queued by the tasks themselves. Returns how many tasks ran.
    ///
    /// Calling this from inside a running task returns 0 immediately; the
    /// outer drain picks up anything newly queued.
    pub fn run_pending(&self) -> usize {
        if self.draining.swap(true, Ordering::AcqRel) {
            return 0;
        }
        // Reset even when the sink panics.
        let _draining = Draining(&self.draining);

        let mut ran = 0;
        loop {
            let next = self.queue.lock().pop_front();
            let Some(task) = next else {
                break;
            };
            run_task(task, self.sink.as_ref());
            ran += 1;
        }
        ran
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }
}

struct Draining<'a>(&'a AtomicBool);

impl Drop for Draining<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for ManualExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialExecutor for ManualExecutor {
    fn execute(&self, task: Task) {
        self.queue.lock().push_back(task);
    }
}

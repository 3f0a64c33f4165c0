//! Shared flow context.
//!
//! A [`FlowContext`] travels with a running flow: every enter/leave
//! callback receives it, screens write their results into its arguments,
//! and `trigger` on it forwards an event to the engine it is bound to.
//!
//! The context does not order anything by itself. Arguments sit behind a
//! lock only so the handle can cross threads; callback ordering comes
//! from the engine's serializing executor.

mod args;
mod error;

pub use args::{ArgKey, ContextArgs};
pub use error::ContextError;

use crate::core::Event;
use crate::engine::{FlowError, LifecycleError};
use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::sync::{Arc, Weak};

/// Receiver of events raised through a context.
pub(crate) trait EventSink<E>: Send + Sync {
    fn trigger(&self, event: E) -> Result<(), FlowError>;
}

struct ContextInner<E> {
    args: Mutex<ContextArgs>,
    engine: Mutex<Option<Weak<dyn EventSink<E>>>>,
}

/// Handle to the arguments and trigger of one navigation session.
///
/// Cloning is cheap and every clone refers to the same session.
pub struct FlowContext<E: Event> {
    inner: Arc<ContextInner<E>>,
}

impl<E: Event> FlowContext<E> {
    pub fn new() -> Self {
        Self::with_args(ContextArgs::new())
    }

    /// Create a context pre-populated with arguments, e.g. restored ones.
    pub fn with_args(args: ContextArgs) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                args: Mutex::new(args),
                engine: Mutex::new(None),
            }),
        }
    }

    /// Lock the arguments for reading or writing.
    ///
    /// Do not hold the guard across a call to [`trigger`](Self::trigger):
    /// guards are evaluated against these arguments. Engine queries such as
    /// `current_state` are fine while the guard is held; the engine never
    /// waits on this lock while holding one of its own.
    pub fn args(&self) -> MutexGuard<'_, ContextArgs> {
        self.inner.args.lock()
    }

    /// Copy of the current arguments.
    pub fn snapshot(&self) -> ContextArgs {
        self.inner.args.lock().clone()
    }

    /// Raise `event` on the engine this context is bound to.
    ///
    /// Fails exactly as [`Engine::trigger`](crate::engine::Engine::trigger)
    /// does, plus [`LifecycleError::NotStarted`] when no engine was started
    /// with this context and [`LifecycleError::Detached`] once that engine
    /// is gone.
    pub fn trigger(&self, event: E) -> Result<(), FlowError> {
        let engine = self
            .inner
            .engine
            .lock()
            .clone()
            .ok_or(LifecycleError::NotStarted)?;
        let engine = engine.upgrade().ok_or(LifecycleError::Detached)?;
        engine.trigger(event)
    }

    /// Whether a live engine is bound to this context.
    pub fn is_bound(&self) -> bool {
        self.inner
            .engine
            .lock()
            .as_ref()
            .is_some_and(|engine| engine.strong_count() > 0)
    }

    pub(crate) fn bind(&self, engine: Weak<dyn EventSink<E>>) -> Result<(), LifecycleError> {
        let mut slot = self.inner.engine.lock();
        if slot.as_ref().is_some_and(|bound| bound.strong_count() > 0) {
            return Err(LifecycleError::AlreadyStarted);
        }
        *slot = Some(engine);
        Ok(())
    }
}

impl<E: Event> Clone for FlowContext<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: Event> Default for FlowContext<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> fmt::Debug for FlowContext<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowContext")
            .field("args", &*self.inner.args.lock())
            .field("bound", &self.is_bound())
            .finish()
    }
}

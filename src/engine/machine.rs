//! Flow engine executing transitions on a serializing executor.

use crate::builder::{FlowBuilder, FlowGraph, GraphError};
use crate::checkpoint::{Checkpoint, CheckpointError};
use crate::config::FlowConfig;
use crate::context::{EventSink, FlowContext};
use crate::core::{Event, State, StateHistory, StateTransition};
use crate::engine::error::{CallbackPhase, FlowError, LifecycleError};
use crate::executor::{panic_message, SerialExecutor};
use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock, Weak};

/// Code run when a state becomes current or stops being current.
pub type Callback<E> = Arc<dyn Fn(&FlowContext<E>) -> anyhow::Result<()> + Send + Sync>;

struct Callbacks<S, E: Event> {
    enter: HashMap<S, Vec<Callback<E>>>,
    leave: HashMap<S, Vec<Callback<E>>>,
}

/// `committed` is what the worker has applied; `projected` is where the
/// queue will leave the flow once every queued transition ran.
struct Cursor<S> {
    committed: Option<S>,
    projected: Option<S>,
}

struct EngineInner<S: State, E: Event> {
    this: Weak<EngineInner<S, E>>,
    graph: FlowGraph<S, E>,
    executor: Arc<dyn SerialExecutor>,
    config: FlowConfig,
    callbacks: RwLock<Callbacks<S, E>>,
    cursor: Mutex<Cursor<S>>,
    context: OnceLock<FlowContext<E>>,
    history: Mutex<StateHistory<S, E>>,
}

/// A flow: one graph, one context, one executor.
///
/// `trigger` may be called from any thread. It validates the event against
/// the state the flow will be in once everything already queued has run,
/// then queues the transition and returns without waiting for it. All
/// callbacks and state changes happen on the executor's worker, one
/// transition at a time, in trigger order.
///
/// Cloning an `Engine` yields another handle to the same flow.
pub struct Engine<S: State, E: Event> {
    inner: Arc<EngineInner<S, E>>,
}

impl<S: State, E: Event> Engine<S, E> {
    /// Validate `definition` and create an engine running on `executor`.
    pub fn build(
        definition: FlowBuilder<S, E>,
        executor: Arc<dyn SerialExecutor>,
    ) -> Result<Self, GraphError> {
        Self::with_config(definition, executor, FlowConfig::default())
    }

    pub fn with_config(
        definition: FlowBuilder<S, E>,
        executor: Arc<dyn SerialExecutor>,
        config: FlowConfig,
    ) -> Result<Self, GraphError> {
        let graph = definition.build()?;
        Ok(Self::from_graph(graph, executor, config))
    }

    /// Create an engine from an already validated graph.
    pub fn from_graph(
        graph: FlowGraph<S, E>,
        executor: Arc<dyn SerialExecutor>,
        config: FlowConfig,
    ) -> Self {
        Self {
            inner: Arc::new_cyclic(|this| EngineInner {
                this: this.clone(),
                graph,
                executor,
                config,
                callbacks: RwLock::new(Callbacks {
                    enter: HashMap::new(),
                    leave: HashMap::new(),
                }),
                cursor: Mutex::new(Cursor {
                    committed: None,
                    projected: None,
                }),
                context: OnceLock::new(),
                history: Mutex::new(StateHistory::new()),
            }),
        }
    }

    /// Register a callback run each time `state` is entered.
    pub fn when_enter<F>(&self, state: S, callback: F) -> Result<&Self, FlowError>
    where
        F: Fn(&FlowContext<E>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(CallbackPhase::Enter, state, Arc::new(callback))
    }

    /// Register a callback run each time `state` is left.
    pub fn when_leave<F>(&self, state: S, callback: F) -> Result<&Self, FlowError>
    where
        F: Fn(&FlowContext<E>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(CallbackPhase::Leave, state, Arc::new(callback))
    }

    fn register(
        &self,
        phase: CallbackPhase,
        state: S,
        callback: Callback<E>,
    ) -> Result<&Self, FlowError> {
        if self.is_started() {
            return Err(LifecycleError::AlreadyStarted.into());
        }
        if !self.inner.graph.contains_state(&state) {
            return Err(FlowError::UnknownState {
                state: state.name().to_string(),
            });
        }

        let mut callbacks = self.inner.callbacks.write();
        let table = match phase {
            CallbackPhase::Enter => &mut callbacks.enter,
            CallbackPhase::Leave => &mut callbacks.leave,
        };
        table.entry(state).or_default().push(callback);
        Ok(self)
    }

    /// Start the flow in its initial state.
    ///
    /// Binds `context` to this engine and queues the enter callbacks of the
    /// initial state. Fails with [`LifecycleError::AlreadyStarted`] on any
    /// call after the first.
    pub fn start(&self, context: FlowContext<E>) -> Result<(), FlowError> {
        let initial = self.inner.graph.initial().clone();
        self.launch(initial, context, None)
    }

    /// Start the flow from a checkpoint instead of the initial state.
    ///
    /// Returns the context rebuilt from the saved arguments; the enter
    /// callbacks of the saved state are queued as for `start`.
    pub fn resume(&self, checkpoint: &Checkpoint<S, E>) -> Result<FlowContext<E>, FlowError> {
        let graph = &self.inner.graph;
        if checkpoint.initial_state != *graph.initial()
            || !graph.contains_state(&checkpoint.current_state)
        {
            return Err(CheckpointError::ValidationFailed(format!(
                "state '{}' of flow starting at '{}' is not part of this flow",
                checkpoint.current_state.name(),
                checkpoint.initial_state.name()
            ))
            .into());
        }

        let context = FlowContext::with_args(checkpoint.context_args()?);
        self.launch(
            checkpoint.current_state.clone(),
            context.clone(),
            Some(checkpoint.history.clone()),
        )?;
        Ok(context)
    }

    fn launch(
        &self,
        state: S,
        context: FlowContext<E>,
        history: Option<StateHistory<S, E>>,
    ) -> Result<(), FlowError> {
        let mut cursor = self.inner.cursor.lock();
        if cursor.committed.is_some() {
            return Err(LifecycleError::AlreadyStarted.into());
        }

        let sink: Arc<dyn EventSink<E>> = self.inner.clone();
        context.bind(Arc::downgrade(&sink))?;
        if self.inner.context.set(context).is_err() {
            return Err(LifecycleError::AlreadyStarted.into());
        }

        if let Some(history) = history {
            *self.inner.history.lock() = self.inner.limit_history(history);
        }
        cursor.committed = Some(state.clone());
        cursor.projected = Some(state.clone());
        tracing::debug!(state = state.name(), "flow started");

        let engine = Arc::downgrade(&self.inner);
        self.inner.executor.execute(Box::new(move || {
            let Some(engine) = engine.upgrade() else {
                return Ok(());
            };
            let mut failures = Vec::new();
            engine.run_callbacks(CallbackPhase::Enter, &state, &mut failures);
            into_result(failures)
        }));
        Ok(())
    }

    /// Queue the transition leaving the current state on `event`.
    ///
    /// Fails with [`FlowError::IllegalTransition`] when the state does not
    /// accept `event`; callers should treat that as "nothing to do". The
    /// state is never changed by a failed trigger.
    pub fn trigger(&self, event: E) -> Result<(), FlowError> {
        self.inner.trigger(event)
    }

    /// The state the worker has committed, `None` before start.
    pub fn current_state(&self) -> Option<S> {
        self.inner.cursor.lock().committed.clone()
    }

    pub fn is_started(&self) -> bool {
        self.inner.cursor.lock().committed.is_some()
    }

    /// Whether the committed state is terminal.
    pub fn is_final(&self) -> bool {
        self.current_state()
            .is_some_and(|state| self.inner.graph.is_terminal(&state))
    }

    pub fn history(&self) -> StateHistory<S, E> {
        self.inner.history.lock().clone()
    }

    /// The context bound by `start`/`resume`.
    pub fn context(&self) -> Option<FlowContext<E>> {
        self.inner.context.get().cloned()
    }

    pub fn graph(&self) -> &FlowGraph<S, E> {
        &self.inner.graph
    }

    pub fn executor(&self) -> Arc<dyn SerialExecutor> {
        Arc::clone(&self.inner.executor)
    }

    /// Snapshot the committed state, history and context arguments.
    pub fn checkpoint(&self) -> Result<Checkpoint<S, E>, FlowError> {
        let current = self.current_state().ok_or(LifecycleError::NotStarted)?;
        let context = self.inner.context.get().ok_or(LifecycleError::NotStarted)?;

        Ok(Checkpoint::new(
            self.inner.graph.initial().clone(),
            current,
            self.history(),
            &context.snapshot(),
        ))
    }
}

impl<S: State, E: Event> EngineInner<S, E> {
    fn apply(&self, mut transition: StateTransition<S, E>) -> anyhow::Result<()> {
        let mut failures = Vec::new();

        self.run_callbacks(CallbackPhase::Leave, &transition.from, &mut failures);
        if self.graph.clears_args_on_leave(&transition.from) {
            if let Some(context) = self.context.get() {
                context.args().clear();
            }
        }

        self.cursor.lock().committed = Some(transition.to.clone());
        transition.timestamp = Utc::now();
        tracing::debug!(
            from = transition.from.name(),
            event = transition.event.name(),
            to = transition.to.name(),
            "transition committed"
        );

        let to = transition.to.clone();
        if self.config.record_history {
            let mut history = self.history.lock();
            *history = self.limit_history(history.record(transition));
        }

        self.run_callbacks(CallbackPhase::Enter, &to, &mut failures);
        into_result(failures)
    }

    fn limit_history(&self, history: StateHistory<S, E>) -> StateHistory<S, E> {
        match (self.config.record_history, self.config.history_limit) {
            (false, _) => StateHistory::new(),
            (true, Some(limit)) => history.keep_last(limit),
            (true, None) => history,
        }
    }

    fn run_callbacks(&self, phase: CallbackPhase, state: &S, failures: &mut Vec<FlowError>) {
        let Some(context) = self.context.get() else {
            return;
        };

        // Cloned so no lock is held while user code runs.
        let callbacks: Vec<Callback<E>> = {
            let callbacks = self.callbacks.read();
            let table = match phase {
                CallbackPhase::Enter => &callbacks.enter,
                CallbackPhase::Leave => &callbacks.leave,
            };
            table.get(state).cloned().unwrap_or_default()
        };

        for callback in callbacks {
            let message = match panic::catch_unwind(AssertUnwindSafe(|| callback(context))) {
                Ok(Ok(())) => continue,
                Ok(Err(error)) => format!("{error:#}"),
                Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
            };

            tracing::warn!(
                state = state.name(),
                %phase,
                error = %message,
                "flow callback failed"
            );
            failures.push(FlowError::CallbackFailed {
                state: state.name().to_string(),
                phase,
                message,
            });
        }
    }
}

impl<S: State, E: Event> EventSink<E> for EngineInner<S, E> {
    fn trigger(&self, event: E) -> Result<(), FlowError> {
        let context = self.context.get().ok_or(LifecycleError::NotStarted)?;

        // Guards run with no engine lock held; if another trigger moved the
        // projection meanwhile, validate again against the new state.
        loop {
            let state = self
                .cursor
                .lock()
                .projected
                .clone()
                .ok_or(LifecycleError::NotStarted)?;

            let Some(transition) = self.graph.transition(&state, &event) else {
                tracing::debug!(
                    state = state.name(),
                    event = event.name(),
                    "no transition for event"
                );
                return Err(FlowError::IllegalTransition {
                    state: state.name().to_string(),
                    event: event.name().to_string(),
                });
            };

            if transition.guard.is_some() && !transition.can_fire(&context.snapshot()) {
                return Err(FlowError::GuardBlocked {
                    state: state.name().to_string(),
                    event: event.name().to_string(),
                });
            }

            // Held until the task is queued so queue order matches projection order.
            let mut cursor = self.cursor.lock();
            if cursor.projected.as_ref() != Some(&state) {
                continue;
            }

            let record = StateTransition::now(state, event, transition.to.clone());
            cursor.projected = Some(record.to.clone());
            tracing::debug!(
                from = record.from.name(),
                event = record.event.name(),
                to = record.to.name(),
                "transition queued"
            );

            let engine = self.this.clone();
            self.executor.execute(Box::new(move || match engine.upgrade() {
                Some(engine) => engine.apply(record),
                None => Ok(()),
            }));
            return Ok(());
        }
    }
}

impl<S: State, E: Event> fmt::Debug for Engine<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("current", &self.current_state())
            .field("initial", self.inner.graph.initial())
            .finish()
    }
}

impl<S: State, E: Event> Clone for Engine<S, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn into_result(mut failures: Vec<FlowError>) -> anyhow::Result<()> {
    if failures.is_empty() {
        Ok(())
    } else {
        // Every failure was logged where it happened; the sink gets the first.
        Err(failures.remove(0).into())
    }
}

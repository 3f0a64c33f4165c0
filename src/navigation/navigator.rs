//! Wiring between a flow, a router and a unit factory.

use super::router::Router;
use super::unit::{TransitionSpec, UnitFactory};
use crate::core::{Event, State};
use crate::engine::{Engine, FlowError};
use std::fmt;
use std::sync::Arc;

type PlatformBack = Arc<dyn Fn() + Send + Sync>;

/// What a back press did to the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    /// The back event was accepted and its transition queued.
    Transitioned,
    /// The current state has no transition for the back event, or its
    /// guard blocked it.
    NotHandled,
}

/// Drives a [`Router`] from the enter callbacks of a flow.
///
/// States bound with [`bind_root`](Self::bind_root) install their unit as
/// the router root; states bound with [`bind_push`](Self::bind_push) push
/// theirs. [`back`](Self::back) turns a platform back press into the flow's
/// back event followed by a router pop, both on the flow's executor.
pub struct Navigator<S: State, E: Event> {
    engine: Engine<S, E>,
    router: Router,
    factory: Arc<dyn UnitFactory<S>>,
    back_event: E,
    platform_back: Option<PlatformBack>,
}

impl<S: State, E: Event> Navigator<S, E> {
    pub fn new(
        engine: Engine<S, E>,
        router: Router,
        factory: Arc<dyn UnitFactory<S>>,
        back_event: E,
    ) -> Self {
        Self {
            engine,
            router,
            factory,
            back_event,
            platform_back: None,
        }
    }

    /// Run `hook` when a back press reaches the root of the router.
    pub fn on_platform_back<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.platform_back = Some(Arc::new(hook));
        self
    }

    /// On entering `state`, make its unit the router root unless one exists.
    pub fn bind_root(&self, state: S) -> Result<&Self, FlowError> {
        let router = self.router.clone();
        let factory = Arc::clone(&self.factory);
        let target = state.clone();

        self.engine.when_enter(state, move |context| {
            if router.has_root() {
                return Ok(());
            }
            let unit = factory.create(&target, &context.snapshot())?;
            router.set_root(unit)?;
            Ok(())
        })?;
        Ok(self)
    }

    /// On entering `state`, push its unit with `spec`.
    pub fn bind_push(&self, state: S, spec: TransitionSpec) -> Result<&Self, FlowError> {
        let router = self.router.clone();
        let factory = Arc::clone(&self.factory);
        let target = state.clone();

        self.engine.when_enter(state, move |context| {
            let unit = factory.create(&target, &context.snapshot())?;
            router.push(unit, spec.clone())?;
            Ok(())
        })?;
        Ok(self)
    }

    /// Handle a platform back press.
    ///
    /// Raises the back event, then queues a router pop behind it. When the
    /// router has nothing left to pop, the platform back hook runs. A state
    /// without a back transition, or whose back transition is guarded off,
    /// is reported as [`BackOutcome::NotHandled`]; the router pop is still
    /// queued. Lifecycle failures are returned and nothing is queued.
    pub fn back(&self) -> Result<BackOutcome, FlowError> {
        let outcome = match self.engine.trigger(self.back_event.clone()) {
            Ok(()) => BackOutcome::Transitioned,
            Err(
                error @ (FlowError::IllegalTransition { .. } | FlowError::GuardBlocked { .. }),
            ) => {
                tracing::warn!(%error, "back press ignored by the flow");
                BackOutcome::NotHandled
            }
            Err(error) => return Err(error),
        };

        let router = self.router.clone();
        let platform_back = self.platform_back.clone();
        self.engine.executor().execute(Box::new(move || {
            if !router.handle_back() {
                tracing::debug!("router at root, falling back to platform back");
                if let Some(hook) = platform_back {
                    hook();
                }
            }
            Ok(())
        }));
        Ok(outcome)
    }

    pub fn engine(&self) -> &Engine<S, E> {
        &self.engine
    }

    pub fn router(&self) -> &Router {
        &self.router
    }
}

impl<S: State, E: Event> fmt::Debug for Navigator<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigator")
            .field("engine", &self.engine)
            .field("router", &self.router)
            .field("back_event", &self.back_event)
            .finish_non_exhaustive()
    }
}

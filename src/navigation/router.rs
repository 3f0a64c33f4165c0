//! Stack-based router.

use super::error::RouterError;
use super::unit::{NavigableUnit, TransitionSpec};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// One entry of the navigation stack.
#[derive(Clone)]
pub struct RouterTransaction {
    pub id: Uuid,
    pub unit: Arc<dyn NavigableUnit>,
    pub spec: TransitionSpec,
}

impl RouterTransaction {
    pub fn new(unit: Arc<dyn NavigableUnit>, spec: TransitionSpec) -> Self {
        Self {
            id: Uuid::new_v4(),
            unit,
            spec,
        }
    }
}

impl fmt::Debug for RouterTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterTransaction")
            .field("id", &self.id)
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// LIFO stack of navigable units; the bottom entry is the root.
///
/// Clones share the same stack, so the router can be handed to flow
/// callbacks and kept by the host at the same time.
#[derive(Clone, Default)]
pub struct Router {
    stack: Arc<Mutex<Vec<RouterTransaction>>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the root unit. Only legal on an empty router.
    pub fn set_root(&self, unit: Arc<dyn NavigableUnit>) -> Result<Uuid, RouterError> {
        let mut stack = self.stack.lock();
        if !stack.is_empty() {
            return Err(RouterError::AlreadyHasRoot);
        }

        let transaction = RouterTransaction::new(unit, TransitionSpec::default());
        let id = transaction.id;
        stack.push(transaction);
        tracing::debug!(%id, "router root set");
        Ok(id)
    }

    /// Push `unit` on top of the stack.
    pub fn push(
        &self,
        unit: Arc<dyn NavigableUnit>,
        spec: TransitionSpec,
    ) -> Result<Uuid, RouterError> {
        let mut stack = self.stack.lock();
        if stack.is_empty() {
            return Err(RouterError::NoRoot);
        }

        let transaction = RouterTransaction::new(unit, spec);
        let id = transaction.id;
        stack.push(transaction);
        tracing::debug!(%id, depth = stack.len(), "unit pushed");
        Ok(id)
    }

    /// Pop the top unit. The root can never be popped.
    pub fn pop(&self) -> Result<RouterTransaction, RouterError> {
        let mut stack = self.stack.lock();
        if stack.len() < 2 {
            return Err(RouterError::InvalidPop);
        }

        let popped = stack.pop().ok_or(RouterError::InvalidPop)?;
        tracing::debug!(id = %popped.id, depth = stack.len(), "unit popped");
        Ok(popped)
    }

    /// Pop everything above the root, returning the popped entries top first.
    pub fn pop_to_root(&self) -> Result<Vec<RouterTransaction>, RouterError> {
        let mut stack = self.stack.lock();
        if stack.is_empty() {
            return Err(RouterError::NoRoot);
        }

        let mut popped: Vec<_> = stack.drain(1..).collect();
        popped.reverse();
        Ok(popped)
    }

    /// Pop the top unit if it is not the root.
    ///
    /// Returns false when there was nothing to pop; the host should fall
    /// back to its own back behavior then.
    pub fn handle_back(&self) -> bool {
        self.pop().is_ok()
    }

    pub fn has_root(&self) -> bool {
        !self.stack.lock().is_empty()
    }

    pub fn depth(&self) -> usize {
        self.stack.lock().len()
    }

    pub fn top(&self) -> Option<RouterTransaction> {
        self.stack.lock().last().cloned()
    }

    /// Copy of the stack, root first.
    pub fn backstack(&self) -> Vec<RouterTransaction> {
        self.stack.lock().clone()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("depth", &self.depth())
            .finish()
    }
}

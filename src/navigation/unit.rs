//! Navigable units and the factory contract producing them.

use crate::context::ContextArgs;
use std::sync::Arc;

/// Something the router can stack: a screen, a page, a panel.
///
/// The router only tracks identity; `render` is for the host.
pub trait NavigableUnit: Send + Sync {
    fn render(&self) -> String;
}

/// Visual change applied when a unit is pushed or popped.
///
/// Passed through untouched; the host decides what each kind means.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChangeKind {
    #[default]
    None,
    Fade,
    Horizontal,
    Vertical,
    Custom(String),
}

/// The push and pop changes of one router transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionSpec {
    pub push: ChangeKind,
    pub pop: ChangeKind,
}

impl TransitionSpec {
    pub fn new(push: ChangeKind, pop: ChangeKind) -> Self {
        Self { push, pop }
    }

    /// Same change in both directions.
    pub fn both(kind: ChangeKind) -> Self {
        Self::new(kind.clone(), kind)
    }

    pub fn fade() -> Self {
        Self::both(ChangeKind::Fade)
    }

    pub fn horizontal() -> Self {
        Self::both(ChangeKind::Horizontal)
    }
}

/// Produces the unit shown for a state.
///
/// `args` is a snapshot of the flow's context arguments at the time the
/// state is entered.
pub trait UnitFactory<S>: Send + Sync {
    fn create(&self, state: &S, args: &ContextArgs) -> anyhow::Result<Arc<dyn NavigableUnit>>;
}

impl<S, F> UnitFactory<S> for F
where
    F: Fn(&S, &ContextArgs) -> anyhow::Result<Arc<dyn NavigableUnit>> + Send + Sync,
{
    fn create(&self, state: &S, args: &ContextArgs) -> anyhow::Result<Arc<dyn NavigableUnit>> {
        self(state, args)
    }
}

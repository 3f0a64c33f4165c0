//! Navigation stack driven by flow callbacks.
//!
//! The [`Router`] is a plain LIFO of units with a root at the bottom. It
//! knows nothing about flows; a [`Navigator`] registers enter callbacks on
//! an [`Engine`](crate::engine::Engine) that ask a [`UnitFactory`] for the
//! unit of the entered state and put it on the router.

mod error;
mod navigator;
mod router;
mod unit;

pub use error::RouterError;
pub use navigator::{BackOutcome, Navigator};
pub use router::{Router, RouterTransaction};
pub use unit::{ChangeKind, NavigableUnit, TransitionSpec, UnitFactory};

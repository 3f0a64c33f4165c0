//! Builder API for declaring flow graphs.
//!
//! A flow is declared as transitions leaving an initial state, each of
//! which may nest the transitions reachable once it fired:
//!
//! ```
//! use navflow::builder::{from, on};
//! use navflow::{flow_events, flow_states};
//!
//! flow_states! {
//!     enum Screen { Cart, Payment, Receipt }
//!     final: [Receipt]
//! }
//! flow_events! {
//!     enum Action { Checkout, Pay, Back }
//! }
//!
//! let graph = from(Screen::Cart)
//!     .transit(
//!         on(Action::Checkout)
//!             .to(Screen::Payment)
//!             .transit(on(Action::Back).to(Screen::Cart))
//!             .transit(on(Action::Pay).to(Screen::Receipt)),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert!(graph.transition(&Screen::Payment, &Action::Pay).is_some());
//! ```
//!
//! Validation happens once, in `build`, and reports every problem of the
//! declaration at the same time.

pub mod error;
pub mod flow;
pub mod graph;
pub mod macros;
pub mod transition;

pub use error::{GraphError, GraphIssue};
pub use flow::{from, FlowBuilder};
pub use graph::{FlowGraph, TransitionDef};
pub use transition::{on, TransitionBuilder};

//! Navflow: state-machine driven navigation
//!
//! Navflow couples a declarative finite state machine to a stack-based
//! router. Entering and leaving states runs callbacks that push and pop
//! navigable units, and every transition runs on one serial executor no
//! matter which thread raised the event.
//!
//! # Core Concepts
//!
//! - **Flow graph**: states, events and (nested) transitions, validated as
//!   a whole by [`FlowBuilder::build`]
//! - **Engine**: holds the current state and the enter/leave callbacks;
//!   `trigger` validates an event and queues its transition
//! - **Context**: typed arguments shared by the callbacks of one session
//! - **Executor**: the single FIFO worker all transitions run on
//! - **Router**: LIFO stack of units, driven by a [`Navigator`]
//!
//! # Example
//!
//! ```rust
//! use navflow::builder::{from, on};
//! use navflow::context::{ArgKey, FlowContext};
//! use navflow::engine::Engine;
//! use navflow::executor::ManualExecutor;
//! use navflow::{flow_events, flow_states};
//! use std::sync::Arc;
//!
//! flow_states! {
//!     enum Screen {
//!         WaitingLogin,
//!         ShowingWelcome,
//!     }
//! }
//!
//! flow_events! {
//!     enum Input {
//!         LoginProvided,
//!         BackClicked,
//!     }
//! }
//!
//! const LOGIN: ArgKey<String> = ArgKey::new("LOGIN");
//!
//! let executor = Arc::new(ManualExecutor::new());
//! let definition = from(Screen::WaitingLogin).transit(
//!     on(Input::LoginProvided)
//!         .to(Screen::ShowingWelcome)
//!         .transit(on(Input::BackClicked).to(Screen::WaitingLogin)),
//! );
//! let engine = Engine::build(definition, executor.clone()).unwrap();
//!
//! let context = FlowContext::new();
//! engine.start(context.clone()).unwrap();
//! context.args().put(&LOGIN, "ada".to_string()).unwrap();
//! context.trigger(Input::LoginProvided).unwrap();
//! executor.run_pending();
//!
//! assert_eq!(engine.current_state(), Some(Screen::ShowingWelcome));
//! ```

pub mod builder;
pub mod checkpoint;
pub mod config;
pub mod context;
pub mod core;
pub mod engine;
pub mod executor;
pub mod navigation;

// Re-export commonly used types
pub use builder::{from, on, FlowBuilder, FlowGraph, GraphError, GraphIssue};
pub use checkpoint::{Checkpoint, CheckpointError};
pub use config::FlowConfig;
pub use context::{ArgKey, ContextArgs, ContextError, FlowContext};
pub use core::{Event, Guard, State, StateHistory, StateTransition};
pub use engine::{Engine, FlowError, LifecycleError};
pub use executor::{ErrorSink, ManualExecutor, SerialExecutor, ThreadExecutor};
pub use navigation::{
    BackOutcome, NavigableUnit, Navigator, Router, RouterError, TransitionSpec, UnitFactory,
};

//! Guard predicates for controlling transitions.
//!
//! Guards are pure boolean functions over the shared context arguments.
//! A guarded transition only fires when its guard holds at the moment the
//! event is triggered.

use crate::context::ContextArgs;
use std::fmt;
use std::sync::Arc;

/// Pure predicate that decides whether a transition can fire.
///
/// # Example
///
/// ```rust
/// use navflow::context::{ArgKey, ContextArgs};
/// use navflow::core::Guard;
///
/// const LOGIN: ArgKey<String> = ArgKey::new("LOGIN");
///
/// let has_login = Guard::new(|args: &ContextArgs| args.contains(&LOGIN));
///
/// let mut args = ContextArgs::new();
/// assert!(!has_login.check(&args));
///
/// args.put(&LOGIN, "ada".to_string()).unwrap();
/// assert!(has_login.check(&args));
/// ```
#[derive(Clone)]
pub struct Guard {
    predicate: Arc<dyn Fn(&ContextArgs) -> bool + Send + Sync>,
}

impl Guard {
    /// Create a guard from a pure predicate function.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&ContextArgs) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Check if the guard allows the transition for these arguments.
    pub fn check(&self, args: &ContextArgs) -> bool {
        (self.predicate)(args)
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}

//! Router error types.

use thiserror::Error;

/// Misuse of the navigation stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("Router already has a root unit")]
    AlreadyHasRoot,

    #[error("Router has no root unit. Call set_root first")]
    NoRoot,

    /// Popping would remove the root unit
    #[error("Cannot pop the root unit")]
    InvalidPop,
}

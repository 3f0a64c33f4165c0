//! Flow configuration.
//!
//! Hosts usually build a [`FlowConfig`] in code, but it can also be read
//! from JSON; every field has a default so partial documents are fine.

use serde::{Deserialize, Serialize};

fn default_worker_thread_name() -> String {
    "navflow-worker".to_string()
}

fn default_record_history() -> bool {
    true
}

fn default_history_limit() -> Option<usize> {
    Some(256)
}

/// Tunables for an engine and the executor it runs on.
///
/// # Example
///
/// ```rust
/// use navflow::config::FlowConfig;
///
/// let config = FlowConfig::from_json_str(r#"{ "history_limit": 10 }"#).unwrap();
/// assert_eq!(config.history_limit, Some(10));
/// assert!(config.record_history);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowConfig {
    /// Name given to the worker spawned by `ThreadExecutor::from_config`.
    #[serde(default = "default_worker_thread_name")]
    pub worker_thread_name: String,

    /// Record every committed transition in the engine history.
    #[serde(default = "default_record_history")]
    pub record_history: bool,

    /// Oldest transitions are dropped beyond this many. `None` keeps all.
    #[serde(default = "default_history_limit")]
    pub history_limit: Option<usize>,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            worker_thread_name: default_worker_thread_name(),
            record_history: default_record_history(),
            history_limit: default_history_limit(),
        }
    }
}

impl FlowConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that keeps no history at all.
    pub fn without_history() -> Self {
        Self {
            record_history: false,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

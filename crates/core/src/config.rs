//! Per-cell configuration
//!
//! ```ignore
//! use settle_core::{CellConfig, SubscriberPolicy};
//!
//! let config = CellConfig::from_json(r#"{"policy": "fanout", "label": "fetch"}"#)?;
//! assert_eq!(config.policy, SubscriberPolicy::Fanout);
//! ```

use crate::error::Result;
use crate::policy::SubscriberPolicy;
use serde::{Deserialize, Serialize};

/// Configuration applied when a cell is created
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CellConfig {
    /// Callback storage policy
    pub policy: SubscriberPolicy,
    /// Label attached to every log event emitted for the cell
    pub label: Option<String>,
}

impl CellConfig {
    /// Create the default configuration (replace policy, no label)
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from a JSON document
    ///
    /// Missing fields take their defaults; unknown fields are rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the subscriber policy
    pub fn with_policy(mut self, policy: SubscriberPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the log label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

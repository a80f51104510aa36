//! Subscriber policies
//!
//! A cell keeps its completion callbacks in one of two shapes:
//!
//! | Policy  | Slots                     | Re-attach          | Late attach after delivery |
//! |---------|---------------------------|--------------------|----------------------------|
//! | Replace | one per outcome, per cell | replaces the slot  | never invoked              |
//! | Fanout  | list of pairs             | appends a pair     | invoked immediately        |
//!
//! `Replace` is the default and reproduces the minimal reference cell:
//! one delivered flag per cell, so at most one callback ever fires.

use crate::error::SettleError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a cell stores completion callbacks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriberPolicy {
    /// Single fulfilment slot and single rejection slot; later registrations replace earlier ones
    #[default]
    Replace,
    /// Every registration is kept and delivered once
    Fanout,
}

impl SubscriberPolicy {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriberPolicy::Replace => "replace",
            SubscriberPolicy::Fanout => "fanout",
        }
    }
}

impl std::fmt::Display for SubscriberPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriberPolicy {
    type Err = SettleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(SubscriberPolicy::Replace),
            "fanout" => Ok(SubscriberPolicy::Fanout),
            other => Err(SettleError::Config(format!(
                "unknown subscriber policy '{}', expected 'replace' or 'fanout'",
                other
            ))),
        }
    }
}

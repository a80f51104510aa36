//! Outcome rendering for the `settle` binary.

use std::fmt::Debug;

use serde::Serialize;
use serde_json::json;
use settle_core::Outcome;

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Render a settled outcome.
///
/// Human output is one line: `fulfilled: <value>` or `rejected: <reason>`.
/// JSON output is an object with `state` plus either `value` or `reason`.
pub fn format_outcome<T>(outcome: &Outcome<T, String>, mode: OutputMode) -> String
where
    T: Serialize + Debug,
{
    match mode {
        OutputMode::Human => match outcome {
            Outcome::Fulfilled(value) => format!("fulfilled: {:?}", value),
            Outcome::Rejected(reason) => format!("rejected: {}", reason),
        },
        OutputMode::Json => {
            let body = match outcome {
                Outcome::Fulfilled(value) => json!({
                    "state": "fulfilled",
                    "value": value,
                }),
                Outcome::Rejected(reason) => json!({
                    "state": "rejected",
                    "reason": reason,
                }),
            };
            body.to_string()
        }
    }
}

/// Render a timeout.
pub fn format_timeout(waited_ms: u128, mode: OutputMode) -> String {
    match mode {
        OutputMode::Human => format!("pending: no settlement after {}ms", waited_ms),
        OutputMode::Json => json!({ "state": "pending", "waited_ms": waited_ms as u64 }).to_string(),
    }
}

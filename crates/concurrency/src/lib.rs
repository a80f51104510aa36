//! Concurrency layer for settle
//!
//! This crate implements deferred-value settlement with:
//! - SettlementCell: pending → fulfilled | rejected, terminal and irreversible
//! - Fulfiller / Rejecter: capability handles, the only way to settle a cell
//! - Subscriber policies: single replaceable slot or multi-subscriber fan-out
//! - all(): ordered fan-in of N cells with first-rejection-wins
//! - Blocking and async waiting that never occupies a callback slot

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cell;
pub mod combinator;
pub mod handle;
mod subscribers;
pub mod timer;
pub mod wait;

pub use cell::{CellBuilder, SettlementCell};
pub use combinator::{all, try_all, Input};
pub use handle::{Fulfiller, Rejecter};
pub use timer::later;
pub use wait::Settled;

// Re-export the core vocabulary for convenience
pub use settle_core::{CellConfig, CellState, Outcome, SettleError, SubscriberPolicy};

//! # Settle
//!
//! Deferred-value settlement cells with ordered fan-in aggregation.
//!
//! A [`SettlementCell`] holds the outcome of one asynchronous computation.
//! Its producer receives a [`Fulfiller`] and a [`Rejecter`] and settles the
//! cell exactly once; consumers attach callbacks that fire once the cell
//! has settled, whether they attached before or after.
//!
//! ## Quick Start
//!
//! ```ignore
//! use settle::prelude::*;
//! use std::time::Duration;
//!
//! let cell = SettlementCell::<u32, String>::new(|fulfill, _reject| {
//!     later(Duration::from_millis(10), move || fulfill.fulfill(42));
//! });
//! cell.then(|v| println!("fulfilled with {}", v))
//!     .catch(|r| eprintln!("rejected with {}", r));
//!
//! // Fan-in: index order, first rejection wins
//! let combined = all(vec![
//!     Input::value(1),
//!     Input::cell(SettlementCell::fulfill_after(2, Duration::from_millis(5))),
//!     Input::value(3),
//! ]);
//! assert_eq!(combined.wait(), Outcome::Fulfilled(vec![1, 2, 3]));
//! ```
//!
//! ## Subscriber Policies
//!
//! - [`SubscriberPolicy::Replace`] (default) - one callback slot per outcome;
//!   re-attaching replaces it and a cell delivers at most once
//! - [`SubscriberPolicy::Fanout`] - every registration is delivered once
//!
//! ## Crates
//!
//! - `settle-core` - lifecycle types, policies, configuration, errors
//! - `settle-concurrency` - cells, capability handles, `all`, waiting

#![warn(missing_docs)]

pub mod prelude;

// Re-export core vocabulary
pub use settle_core::{CellConfig, CellState, Outcome, Result, SettleError, SubscriberPolicy};

// Re-export cells and combinators
pub use settle_concurrency::{
    all, later, try_all, CellBuilder, Fulfiller, Input, Rejecter, SettlementCell, Settled,
};

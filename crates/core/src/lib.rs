//! Core types for settle
//!
//! This crate defines the vocabulary shared by every settle package:
//! - CellState / Outcome: lifecycle tag and settled payload of a cell
//! - SubscriberPolicy: how a cell keeps its completion callbacks
//! - CellConfig: per-cell configuration (policy, log label)
//! - SettleError: the library's own error taxonomy
//!
//! Nothing in here spawns threads or takes locks.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod policy;
pub mod state;

pub use config::CellConfig;
pub use error::{Result, SettleError};
pub use policy::SubscriberPolicy;
pub use state::{CellState, Outcome};

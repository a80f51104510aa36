//! Convenient imports for Settle.
//!
//! ```ignore
//! use settle::prelude::*;
//!
//! let cell = SettlementCell::<u32, String>::fulfilled(1);
//! cell.then(|v| assert_eq!(v, 1));
//! ```

// Cells and capabilities
pub use crate::{CellBuilder, Fulfiller, Rejecter, SettlementCell, Settled};

// Fan-in
pub use crate::{all, try_all, Input};

// Deferred execution
pub use crate::later;

// Core types
pub use crate::{CellConfig, CellState, Outcome, SubscriberPolicy};

// Error handling
pub use crate::{Result, SettleError};

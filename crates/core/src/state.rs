//! Lifecycle types for settlement cells
//!
//! A cell is either pending or settled. A settled cell holds exactly one
//! [`Outcome`]: a value or a reason, never both. Cells store
//! `Option<Outcome<T, E>>`, so "pending" is simply `None`.

use serde::{Deserialize, Serialize};

/// Lifecycle tag of a cell
///
/// Monotonic: once a cell leaves `Pending` its tag never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Not yet settled
    Pending,
    /// Settled with a value
    Fulfilled,
    /// Settled with a reason
    Rejected,
}

impl CellState {
    /// Check if the cell is still pending
    pub fn is_pending(&self) -> bool {
        matches!(self, CellState::Pending)
    }

    /// Check if the cell has settled either way
    pub fn is_settled(&self) -> bool {
        !self.is_pending()
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            CellState::Pending => "Pending",
            CellState::Fulfilled => "Fulfilled",
            CellState::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for CellState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settled payload of a cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome<T, E> {
    /// The cell fulfilled with this value
    Fulfilled(T),
    /// The cell rejected with this reason
    Rejected(E),
}

impl<T, E> Outcome<T, E> {
    /// Lifecycle tag matching this outcome
    pub fn state(&self) -> CellState {
        match self {
            Outcome::Fulfilled(_) => CellState::Fulfilled,
            Outcome::Rejected(_) => CellState::Rejected,
        }
    }

    /// Check if this is a fulfilment
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Outcome::Fulfilled(_))
    }

    /// Check if this is a rejection
    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }

    /// Value, if fulfilled
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Fulfilled(value) => Some(value),
            Outcome::Rejected(_) => None,
        }
    }

    /// Reason, if rejected
    pub fn reason(&self) -> Option<&E> {
        match self {
            Outcome::Fulfilled(_) => None,
            Outcome::Rejected(reason) => Some(reason),
        }
    }

    /// Borrow both payloads
    pub fn as_ref(&self) -> Outcome<&T, &E> {
        match self {
            Outcome::Fulfilled(value) => Outcome::Fulfilled(value),
            Outcome::Rejected(reason) => Outcome::Rejected(reason),
        }
    }

    /// Convert into a `Result`, fulfilment mapping to `Ok`
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Outcome::Fulfilled(value) => Ok(value),
            Outcome::Rejected(reason) => Err(reason),
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Fulfilled(value),
            Err(reason) => Outcome::Rejected(reason),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        outcome.into_result()
    }
}

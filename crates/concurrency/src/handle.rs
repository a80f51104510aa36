//! Settlement capabilities
//!
//! A cell's executor receives one [`Fulfiller`] and one [`Rejecter`]. They
//! carry a back-reference to the cell and are the only way to settle it.
//! Both are cheap to clone and may be moved to other threads; whichever
//! call arrives first wins, every later call is a silent no-op.

use crate::cell::Shared;
use settle_core::Outcome;
use std::fmt;
use std::sync::Arc;

/// Capability to fulfil one cell
pub struct Fulfiller<T, E> {
    shared: Arc<Shared<T, E>>,
}

/// Capability to reject one cell
pub struct Rejecter<T, E> {
    shared: Arc<Shared<T, E>>,
}

impl<T, E> Fulfiller<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    pub(crate) fn new(shared: Arc<Shared<T, E>>) -> Self {
        Self { shared }
    }

    /// Fulfil the cell with `value`
    ///
    /// No-op if the cell has already settled.
    pub fn fulfill(&self, value: T) {
        self.shared.settle(Outcome::Fulfilled(value));
    }

    /// Check if the owning cell has settled
    pub fn is_settled(&self) -> bool {
        self.shared.is_settled()
    }
}

impl<T, E> Rejecter<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    pub(crate) fn new(shared: Arc<Shared<T, E>>) -> Self {
        Self { shared }
    }

    /// Reject the cell with `reason`
    ///
    /// No-op if the cell has already settled.
    pub fn reject(&self, reason: E) {
        self.shared.settle(Outcome::Rejected(reason));
    }

    /// Check if the owning cell has settled
    pub fn is_settled(&self) -> bool {
        self.shared.is_settled()
    }
}

impl<T, E> Clone for Fulfiller<T, E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T, E> Clone for Rejecter<T, E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T, E> fmt::Debug for Fulfiller<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fulfiller")
            .field("label", &self.shared.label)
            .finish()
    }
}

impl<T, E> fmt::Debug for Rejecter<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejecter")
            .field("label", &self.shared.label)
            .finish()
    }
}

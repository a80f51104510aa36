//! Async waiting on a cell
//!
//! [`Settled`] resolves to `Ok(value)` or `Err(reason)` once the cell
//! settles. It parks a [`Waker`](std::task::Waker) in the cell instead of
//! registering a callback, so awaiting never displaces a subscriber. Any
//! number of futures may await the same cell.

use crate::cell::Shared;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Future returned by [`SettlementCell::settled`](crate::SettlementCell::settled)
/// and by `.await` on a cell
pub struct Settled<T, E> {
    shared: Arc<Shared<T, E>>,
}

impl<T, E> Settled<T, E> {
    pub(crate) fn new(shared: Arc<Shared<T, E>>) -> Self {
        Self { shared }
    }
}

impl<T: Clone, E: Clone> Future for Settled<T, E> {
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut inner = self.shared.inner.lock();
        if let Some(outcome) = &inner.outcome {
            return Poll::Ready(outcome.clone().into_result());
        }
        if !inner.wakers.iter().any(|w| w.will_wake(cx.waker())) {
            inner.wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}

impl<T, E> fmt::Debug for Settled<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settled")
            .field("label", &self.shared.label)
            .finish()
    }
}

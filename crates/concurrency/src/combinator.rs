//! All-combinator: ordered fan-in over N cells
//!
//! `all(inputs)` returns one derived cell that:
//! - fulfils with every input's value, in input order, once all inputs fulfil
//! - rejects with the reason of whichever input rejects first in real time
//!
//! Results are written by index, so completion order never affects the
//! order of the fulfilled sequence. Once the derived cell is settled, later
//! arrivals from other inputs are dropped without touching it.
//!
//! Inputs are observed through the cell's internal observer list, never
//! through its subscriber slots. A cell listed twice counts twice, and a
//! cell whose replace slot already delivered to another consumer still
//! reports to `all`. Registrations other consumers hold are left alone.

use crate::cell::SettlementCell;
use parking_lot::Mutex;
use settle_core::{Outcome, SettleError};
use std::fmt;
use std::sync::Arc;

/// One element of an `all` input sequence
pub enum Input<T, E> {
    /// A cell to wait on
    Cell(SettlementCell<T, E>),
    /// A plain value, treated as an already-fulfilled cell
    Value(T),
}

impl<T, E> Input<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Wrap a cell
    pub fn cell(cell: SettlementCell<T, E>) -> Self {
        Input::Cell(cell)
    }

    /// Wrap a plain value
    pub fn value(value: T) -> Self {
        Input::Value(value)
    }

    fn into_cell(self) -> SettlementCell<T, E> {
        match self {
            Input::Cell(cell) => cell,
            Input::Value(value) => SettlementCell::fulfilled(value),
        }
    }
}

impl<T, E> From<SettlementCell<T, E>> for Input<T, E> {
    fn from(cell: SettlementCell<T, E>) -> Self {
        Input::Cell(cell)
    }
}

impl<T: fmt::Debug, E> fmt::Debug for Input<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Cell(cell) => f.debug_tuple("Cell").field(cell).finish(),
            Input::Value(value) => f.debug_tuple("Value").field(value).finish(),
        }
    }
}

/// Bookkeeping private to one `all` invocation
struct AllState<T> {
    results: Vec<Option<T>>,
    remaining: usize,
    settled: bool,
}

impl<T> AllState<T> {
    fn new(total: usize) -> Self {
        Self {
            results: std::iter::repeat_with(|| None).take(total).collect(),
            remaining: total,
            settled: false,
        }
    }

    /// Record the value of input `index`
    ///
    /// Returns the full ordered result set when this was the last input.
    fn record(&mut self, index: usize, value: T) -> Option<Vec<T>> {
        if self.settled {
            return None;
        }
        let slot = &mut self.results[index];
        if slot.is_none() {
            *slot = Some(value);
            self.remaining -= 1;
        }
        if self.remaining > 0 {
            return None;
        }
        self.settled = true;
        self.results.iter_mut().map(Option::take).collect()
    }

    /// Claim the right to reject; only the first caller gets it
    fn fail(&mut self) -> bool {
        if self.settled {
            return false;
        }
        self.settled = true;
        true
    }
}

/// Wait on every input and gather their values in input order
///
/// - Empty input fulfils immediately with an empty vector.
/// - Plain values ([`Input::Value`]) count as already fulfilled.
/// - The first rejection, by arrival time, rejects the derived cell.
///
/// # Example
///
/// ```ignore
/// let combined = all(vec![
///     Input::value(1),
///     Input::cell(SettlementCell::fulfill_after(2, Duration::from_millis(5))),
///     Input::value(3),
/// ]);
/// assert_eq!(combined.wait(), Outcome::Fulfilled(vec![1, 2, 3]));
/// ```
pub fn all<T, E, I>(inputs: I) -> SettlementCell<Vec<T>, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
    I: IntoIterator,
    I::Item: Into<Input<T, E>>,
{
    let inputs: Vec<Input<T, E>> = inputs.into_iter().map(Into::into).collect();

    SettlementCell::<Vec<T>, E>::new(move |fulfill, reject| {
        let total = inputs.len();
        if total == 0 {
            tracing::debug!(inputs = 0, "all: empty input, fulfilling immediately");
            fulfill.fulfill(Vec::new());
            return;
        }

        let state = Arc::new(Mutex::new(AllState::new(total)));
        for (index, input) in inputs.into_iter().enumerate() {
            let state = Arc::clone(&state);
            let fulfill = fulfill.clone();
            let reject = reject.clone();
            input.into_cell().observe(move |outcome| match outcome {
                Outcome::Fulfilled(value) => {
                    let done = state.lock().record(index, value);
                    if let Some(results) = done {
                        tracing::debug!(inputs = total, "all: every input fulfilled");
                        fulfill.fulfill(results);
                    }
                }
                Outcome::Rejected(reason) => {
                    let first = state.lock().fail();
                    if first {
                        tracing::debug!(inputs = total, index, "all: first rejection wins");
                        reject.reject(reason);
                    }
                }
            });
        }
    })
}

/// Like [`all`], for inputs that may not be a sequence at all
///
/// When `inputs` cannot be converted, the returned cell is already
/// rejected with `SettleError::InvalidArgument`; nothing is returned
/// through a synchronous error channel.
pub fn try_all<T, E, S>(inputs: S) -> SettlementCell<Vec<T>, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + From<SettleError> + 'static,
    S: TryInto<Vec<Input<T, E>>>,
    S::Error: fmt::Display,
{
    match inputs.try_into() {
        Ok(inputs) => all(inputs),
        Err(e) => {
            let err = SettleError::InvalidArgument(e.to_string());
            tracing::debug!(error = %err, "all: input is not a sequence");
            SettlementCell::rejected(E::from(err))
        }
    }
}

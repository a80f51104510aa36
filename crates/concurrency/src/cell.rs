//! Settlement cell
//!
//! A cell holds the lifecycle of one deferred computation:
//!
//! ```text
//!            fulfill(value)
//!          ┌──────────────▶ Fulfilled(value)
//! Pending ─┤
//!          └──────────────▶ Rejected(reason)
//!            reject(reason)
//! ```
//!
//! ## Invariants
//!
//! | # | Invariant | Meaning |
//! |---|-----------|---------|
//! | I1 | Terminal once | Only the first fulfill/reject has any effect |
//! | I2 | Exclusive payload | A settled cell holds a value or a reason, never both |
//! | I3 | Single delivery | A registered callback fires at most once |
//! | I4 | Attachment order | Attaching before or after settlement is observed the same way |
//!
//! ## Delivery
//!
//! Callbacks run synchronously on whichever thread triggers them: the
//! settling thread if the callback was registered first, the registering
//! thread otherwise. They always run after the cell lock is released.
//!
//! With [`SubscriberPolicy::Replace`] (the default) `on_settle` overwrites
//! the previous registration and the cell delivers to at most one callback
//! in its lifetime. [`SubscriberPolicy::Fanout`] keeps every registration.
//!
//! Waiting through [`SettlementCell::wait`] or `.await` does not register a
//! callback, so it never displaces one. Neither does the all-combinator: it
//! observes inputs through a separate observer list that always fans out.
//!
//! Threads already blocked in `wait` wake only after the due callbacks have
//! run. A reader that arrives between the outcome being stored and the end
//! of delivery sees the outcome while callbacks may still be running.

use crate::handle::{Fulfiller, Rejecter};
use crate::subscribers::{Delivery, Observer, OnFulfilled, OnRejected, Subscriber, Subscribers};
use crate::timer::later;
use crate::wait::Settled;
use parking_lot::{Condvar, Mutex};
use settle_core::{CellConfig, CellState, Outcome, SubscriberPolicy};
use std::fmt;
use std::future::IntoFuture;
use std::marker::PhantomData;
use std::sync::Arc;
use std::task::Waker;
use std::time::{Duration, Instant};

/// Mutable part of a cell, guarded by [`Shared::inner`]
pub(crate) struct Inner<T, E> {
    /// `None` while pending
    pub(crate) outcome: Option<Outcome<T, E>>,
    pub(crate) subscribers: Subscribers<T, E>,
    /// Internal observers, notified once regardless of policy
    pub(crate) observers: Vec<Observer<T, E>>,
    /// Tasks awaiting the cell through [`Settled`]
    pub(crate) wakers: Vec<Waker>,
}

/// State shared between a cell, its capability handles and its waiters
pub(crate) struct Shared<T, E> {
    pub(crate) inner: Mutex<Inner<T, E>>,
    /// Signalled once, at settlement
    pub(crate) settled: Condvar,
    pub(crate) policy: SubscriberPolicy,
    pub(crate) label: Option<String>,
}

impl<T, E> Shared<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    fn new(config: CellConfig) -> Self {
        Self {
            inner: Mutex::new(Inner {
                outcome: None,
                subscribers: Subscribers::new(config.policy),
                observers: Vec::new(),
                wakers: Vec::new(),
            }),
            settled: Condvar::new(),
            policy: config.policy,
            label: config.label,
        }
    }

    fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("unlabeled")
    }

    pub(crate) fn is_settled(&self) -> bool {
        self.inner.lock().outcome.is_some()
    }

    /// Settle the cell, or do nothing if it already settled
    pub(crate) fn settle(&self, outcome: Outcome<T, E>) {
        let (deliveries, observers, observed, wakers) = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            if let Some(current) = &inner.outcome {
                tracing::debug!(
                    label = self.label(),
                    attempted = %outcome.state(),
                    current = %current.state(),
                    "ignoring settlement of already-settled cell"
                );
                return;
            }
            let deliveries = inner.subscribers.settle(&outcome);
            tracing::debug!(
                label = self.label(),
                state = %outcome.state(),
                deliveries = deliveries.len(),
                "cell settled"
            );
            let observers = std::mem::take(&mut inner.observers);
            let observed = (!observers.is_empty()).then(|| outcome.clone());
            inner.outcome = Some(outcome);
            (
                deliveries,
                observers,
                observed,
                std::mem::take(&mut inner.wakers),
            )
        };

        // Callbacks and observers run before blocked waiters wake. Waiters
        // are still woken if one of them panics.
        let _wake = WakeWaiters {
            settled: &self.settled,
            wakers,
        };
        for delivery in deliveries {
            self.deliver(delivery);
        }
        if let Some(outcome) = observed {
            for observer in observers {
                observer(outcome.clone());
            }
        }
    }

    fn register(&self, subscriber: Subscriber<T, E>) {
        let delivery: Option<Delivery<T, E>> = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            inner.subscribers.register(subscriber, inner.outcome.as_ref())
        };

        tracing::trace!(
            label = self.label(),
            immediate = delivery.is_some(),
            "callback registered"
        );
        if let Some(delivery) = delivery {
            self.deliver(delivery);
        }
    }

    fn deliver(&self, delivery: Delivery<T, E>) {
        tracing::trace!(
            label = self.label(),
            state = %delivery.state(),
            "callback delivered"
        );
        delivery.run();
    }

    /// Notify `observer` once the cell settles, or now if it already has
    ///
    /// Observers never occupy a subscriber slot, so every observer is
    /// notified whatever the policy and whatever was delivered before.
    pub(crate) fn observe(&self, observer: Observer<T, E>) {
        let outcome = {
            let mut inner = self.inner.lock();
            match inner.outcome.clone() {
                Some(outcome) => outcome,
                None => {
                    inner.observers.push(observer);
                    return;
                }
            }
        };
        observer(outcome);
    }
}

/// Wakes blocked and async waiters when dropped
struct WakeWaiters<'a> {
    settled: &'a Condvar,
    wakers: Vec<Waker>,
}

impl Drop for WakeWaiters<'_> {
    fn drop(&mut self) {
        self.settled.notify_all();
        for waker in self.wakers.drain(..) {
            waker.wake();
        }
    }
}

/// One deferred value: pending until its executor's handles settle it
///
/// Cloning a cell produces another consumer handle onto the same state.
/// It does not grant the right to settle.
pub struct SettlementCell<T, E> {
    shared: Arc<Shared<T, E>>,
}

impl<T, E> SettlementCell<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Create a pending cell and run `executor` synchronously with its capabilities
    ///
    /// A panic inside the executor is not converted into a rejection; the
    /// executor is expected to call [`Rejecter::reject`] itself.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let cell = SettlementCell::<u32, String>::new(|fulfill, _reject| {
    ///     later(Duration::from_millis(10), move || fulfill.fulfill(42));
    /// });
    /// cell.then(|v| println!("got {}", v));
    /// ```
    pub fn new<F>(executor: F) -> Self
    where
        F: FnOnce(Fulfiller<T, E>, Rejecter<T, E>),
    {
        Self::with_config(CellConfig::default(), executor)
    }

    /// Create a pending cell with explicit configuration
    pub fn with_config<F>(config: CellConfig, executor: F) -> Self
    where
        F: FnOnce(Fulfiller<T, E>, Rejecter<T, E>),
    {
        let shared = Arc::new(Shared::new(config));
        tracing::trace!(
            label = shared.label(),
            policy = %shared.policy,
            "cell created"
        );
        executor(
            Fulfiller::new(Arc::clone(&shared)),
            Rejecter::new(Arc::clone(&shared)),
        );
        Self { shared }
    }

    /// Start building a cell with non-default configuration
    pub fn builder() -> CellBuilder<T, E> {
        CellBuilder::new()
    }

    /// A cell that is already fulfilled with `value`
    pub fn fulfilled(value: T) -> Self {
        Self::new(|fulfill, _| fulfill.fulfill(value))
    }

    /// A cell that is already rejected with `reason`
    pub fn rejected(reason: E) -> Self {
        Self::new(|_, reject| reject.reject(reason))
    }

    /// A cell fulfilled with `value` from a background thread after `delay`
    pub fn fulfill_after(value: T, delay: Duration) -> Self {
        Self::new(|fulfill, _| {
            later(delay, move || fulfill.fulfill(value));
        })
    }

    /// A cell rejected with `reason` from a background thread after `delay`
    pub fn reject_after(reason: E, delay: Duration) -> Self {
        Self::new(|_, reject| {
            later(delay, move || reject.reject(reason));
        })
    }

    /// Register completion callbacks
    ///
    /// If the cell has settled and the matching callback is due, it runs
    /// before this call returns. Otherwise it is stored for settlement time.
    /// A `None` leaves any existing registration for that outcome in place.
    ///
    /// Returns the same cell, so registrations can be chained. Under the
    /// replace policy a chained registration supersedes the earlier one
    /// unless that one was already delivered.
    pub fn on_settle<F, R>(&self, on_fulfilled: Option<F>, on_rejected: Option<R>) -> &Self
    where
        F: FnOnce(T) + Send + 'static,
        R: FnOnce(E) + Send + 'static,
    {
        self.shared.register(Subscriber::new(
            on_fulfilled.map(|f| Box::new(f) as OnFulfilled<T>),
            on_rejected.map(|r| Box::new(r) as OnRejected<E>),
        ));
        self
    }

    /// Register a fulfilment callback only
    pub fn then<F>(&self, on_fulfilled: F) -> &Self
    where
        F: FnOnce(T) + Send + 'static,
    {
        let on_fulfilled: OnFulfilled<T> = Box::new(on_fulfilled);
        self.shared.register(Subscriber::new(Some(on_fulfilled), None));
        self
    }

    /// Register a rejection callback only
    pub fn catch<R>(&self, on_rejected: R) -> &Self
    where
        R: FnOnce(E) + Send + 'static,
    {
        let on_rejected: OnRejected<E> = Box::new(on_rejected);
        self.shared.register(Subscriber::new(None, Some(on_rejected)));
        self
    }

    /// Current lifecycle tag
    pub fn state(&self) -> CellState {
        self.shared
            .inner
            .lock()
            .outcome
            .as_ref()
            .map_or(CellState::Pending, Outcome::state)
    }

    /// Check if the cell is still pending
    pub fn is_pending(&self) -> bool {
        !self.shared.is_settled()
    }

    /// Settled outcome, or `None` while pending
    pub fn outcome(&self) -> Option<Outcome<T, E>> {
        self.shared.inner.lock().outcome.clone()
    }

    /// Fulfilment value, if fulfilled
    pub fn value(&self) -> Option<T> {
        self.shared.inner.lock().outcome.as_ref()?.value().cloned()
    }

    /// Rejection reason, if rejected
    pub fn reason(&self) -> Option<E> {
        self.shared.inner.lock().outcome.as_ref()?.reason().cloned()
    }

    /// Observe the outcome without touching the subscriber slots
    pub(crate) fn observe<F>(&self, observer: F)
    where
        F: FnOnce(Outcome<T, E>) + Send + 'static,
    {
        self.shared.observe(Box::new(observer));
    }

    /// Callbacks currently waiting for delivery
    pub fn waiting_callbacks(&self) -> usize {
        self.shared.inner.lock().subscribers.waiting()
    }

    /// Block the current thread until the cell settles
    ///
    /// Blocks forever if the producer never settles the cell.
    pub fn wait(&self) -> Outcome<T, E> {
        let mut inner = self.shared.inner.lock();
        loop {
            if let Some(outcome) = &inner.outcome {
                return outcome.clone();
            }
            self.shared.settled.wait(&mut inner);
        }
    }

    /// Block until the cell settles or `timeout` elapses
    ///
    /// Returns `None` if the cell is still pending at the deadline.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Outcome<T, E>> {
        let deadline = Instant::now() + timeout;
        let mut inner = self.shared.inner.lock();
        loop {
            if let Some(outcome) = &inner.outcome {
                return Some(outcome.clone());
            }
            if self.shared.settled.wait_until(&mut inner, deadline).timed_out() {
                return inner.outcome.clone();
            }
        }
    }

    /// Future resolving to the cell's outcome
    pub fn settled(&self) -> Settled<T, E> {
        Settled::new(Arc::clone(&self.shared))
    }
}

impl<T, E> SettlementCell<T, E> {
    /// Subscriber policy the cell was created with
    pub fn policy(&self) -> SubscriberPolicy {
        self.shared.policy
    }

    /// Log label, if one was configured
    pub fn label(&self) -> Option<&str> {
        self.shared.label.as_deref()
    }
}

impl<T, E> Clone for SettlementCell<T, E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T, E> IntoFuture for SettlementCell<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    type Output = Result<T, E>;
    type IntoFuture = Settled<T, E>;

    fn into_future(self) -> Self::IntoFuture {
        Settled::new(self.shared)
    }
}

impl<T, E> fmt::Debug for SettlementCell<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self
            .shared
            .inner
            .lock()
            .outcome
            .as_ref()
            .map_or(CellState::Pending, Outcome::state);
        f.debug_struct("SettlementCell")
            .field("label", &self.shared.label)
            .field("policy", &self.shared.policy)
            .field("state", &state)
            .finish()
    }
}

/// Builder for cells with non-default configuration
///
/// # Example
///
/// ```ignore
/// let cell = SettlementCell::<u32, String>::builder()
///     .policy(SubscriberPolicy::Fanout)
///     .label("fetch")
///     .build(|fulfill, _| fulfill.fulfill(1));
/// ```
pub struct CellBuilder<T, E> {
    config: CellConfig,
    _cell: PhantomData<fn() -> (T, E)>,
}

impl<T, E> CellBuilder<T, E> {
    /// Create a builder with the default configuration
    pub fn new() -> Self {
        Self {
            config: CellConfig::default(),
            _cell: PhantomData,
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: CellConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the subscriber policy
    pub fn policy(mut self, policy: SubscriberPolicy) -> Self {
        self.config = self.config.with_policy(policy);
        self
    }

    /// Set the log label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.config = self.config.with_label(label);
        self
    }
}

impl<T, E> CellBuilder<T, E>
where
    T: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Create the cell and run `executor`
    pub fn build<F>(self, executor: F) -> SettlementCell<T, E>
    where
        F: FnOnce(Fulfiller<T, E>, Rejecter<T, E>),
    {
        SettlementCell::with_config(self.config, executor)
    }
}

impl<T, E> Default for CellBuilder<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Clone for CellBuilder<T, E> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            _cell: PhantomData,
        }
    }
}

impl<T, E> fmt::Debug for CellBuilder<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellBuilder")
            .field("config", &self.config)
            .finish()
    }
}

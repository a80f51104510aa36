//! Callback storage behind a cell's lock
//!
//! Nothing in here invokes a callback. Registration and settlement return
//! [`Delivery`] values that the caller runs after releasing the cell lock,
//! so callbacks are free to touch other cells (or this one).

use settle_core::{CellState, Outcome, SubscriberPolicy};

pub(crate) type OnFulfilled<T> = Box<dyn FnOnce(T) + Send>;
pub(crate) type OnRejected<E> = Box<dyn FnOnce(E) + Send>;
/// Internal observer of the whole outcome; never stored in a slot
pub(crate) type Observer<T, E> = Box<dyn FnOnce(Outcome<T, E>) + Send>;

/// A callback paired with the payload it must receive
pub(crate) enum Delivery<T, E> {
    Fulfilled(OnFulfilled<T>, T),
    Rejected(OnRejected<E>, E),
}

impl<T, E> Delivery<T, E> {
    pub(crate) fn state(&self) -> CellState {
        match self {
            Delivery::Fulfilled(..) => CellState::Fulfilled,
            Delivery::Rejected(..) => CellState::Rejected,
        }
    }

    pub(crate) fn run(self) {
        match self {
            Delivery::Fulfilled(callback, value) => callback(value),
            Delivery::Rejected(callback, reason) => callback(reason),
        }
    }
}

/// One (on_fulfilled, on_rejected) registration
pub(crate) struct Subscriber<T, E> {
    on_fulfilled: Option<OnFulfilled<T>>,
    on_rejected: Option<OnRejected<E>>,
}

impl<T: Clone, E: Clone> Subscriber<T, E> {
    pub(crate) fn new(on_fulfilled: Option<OnFulfilled<T>>, on_rejected: Option<OnRejected<E>>) -> Self {
        Self {
            on_fulfilled,
            on_rejected,
        }
    }

    /// Take the callback matching `outcome`, leaving the other one in place
    fn take_matching(&mut self, outcome: &Outcome<T, E>) -> Option<Delivery<T, E>> {
        match outcome {
            Outcome::Fulfilled(value) => self
                .on_fulfilled
                .take()
                .map(|callback| Delivery::Fulfilled(callback, value.clone())),
            Outcome::Rejected(reason) => self
                .on_rejected
                .take()
                .map(|callback| Delivery::Rejected(callback, reason.clone())),
        }
    }
}

/// Registered callbacks of one cell
pub(crate) enum Subscribers<T, E> {
    /// One slot per outcome; `delivered` flips once and stays set
    Replace {
        slot: Subscriber<T, E>,
        delivered: bool,
    },
    /// Pairs not yet delivered
    Fanout { pending: Vec<Subscriber<T, E>> },
}

impl<T: Clone, E: Clone> Subscribers<T, E> {
    pub(crate) fn new(policy: SubscriberPolicy) -> Self {
        match policy {
            SubscriberPolicy::Replace => Subscribers::Replace {
                slot: Subscriber::new(None, None),
                delivered: false,
            },
            SubscriberPolicy::Fanout => Subscribers::Fanout {
                pending: Vec::new(),
            },
        }
    }

    /// Record a registration
    ///
    /// `outcome` is the cell's current outcome, if it has settled. Returns
    /// the delivery to run immediately, if any.
    pub(crate) fn register(
        &mut self,
        mut subscriber: Subscriber<T, E>,
        outcome: Option<&Outcome<T, E>>,
    ) -> Option<Delivery<T, E>> {
        match self {
            Subscribers::Replace { slot, delivered } => {
                if let Some(callback) = subscriber.on_fulfilled.take() {
                    slot.on_fulfilled = Some(callback);
                }
                if let Some(callback) = subscriber.on_rejected.take() {
                    slot.on_rejected = Some(callback);
                }
                match outcome {
                    Some(outcome) if !*delivered => Self::deliver_once(slot, delivered, outcome),
                    _ => None,
                }
            }
            Subscribers::Fanout { pending } => match outcome {
                Some(outcome) => subscriber.take_matching(outcome),
                None => {
                    pending.push(subscriber);
                    None
                }
            },
        }
    }

    /// Collect the deliveries owed at the moment of settlement
    pub(crate) fn settle(&mut self, outcome: &Outcome<T, E>) -> Vec<Delivery<T, E>> {
        match self {
            Subscribers::Replace { slot, delivered } => {
                if *delivered {
                    return Vec::new();
                }
                Self::deliver_once(slot, delivered, outcome).into_iter().collect()
            }
            Subscribers::Fanout { pending } => pending
                .drain(..)
                .filter_map(|mut subscriber| subscriber.take_matching(outcome))
                .collect(),
        }
    }

    /// Number of callbacks currently waiting for delivery
    pub(crate) fn waiting(&self) -> usize {
        match self {
            Subscribers::Replace { slot, delivered } => {
                if *delivered {
                    0
                } else {
                    usize::from(slot.on_fulfilled.is_some()) + usize::from(slot.on_rejected.is_some())
                }
            }
            Subscribers::Fanout { pending } => pending.len(),
        }
    }

    fn deliver_once(
        slot: &mut Subscriber<T, E>,
        delivered: &mut bool,
        outcome: &Outcome<T, E>,
    ) -> Option<Delivery<T, E>> {
        let delivery = slot.take_matching(outcome);
        if delivery.is_some() {
            *delivered = true;
        }
        delivery
    }
}
